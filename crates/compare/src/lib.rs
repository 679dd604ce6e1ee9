//! Price comparison for the pricewatch system.
//!
//! This crate handles:
//! - Competitive status classification (alert / good / neutral)
//! - Explanation messages per record
//! - Record filters used by dashboards (search, status, top alerts)

pub mod classifier;
pub mod filters;

pub use classifier::{classify, classify_checked, classify_record, status_of};
pub use filters::{last_updated, search, top_alerts, with_status};
