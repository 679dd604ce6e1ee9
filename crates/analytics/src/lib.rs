//! Dashboard analytics for the pricewatch system.
//!
//! This crate provides:
//! - Batch-level aggregate statistics
//! - Alert report composition
//! - Alert sinks (log-file delivery)

pub mod aggregator;
pub mod alerts;

pub use aggregator::{aggregate, StatsAccumulator};
pub use alerts::{AlertLine, AlertReport, AlertSink, Delivery, LogFileSink};
