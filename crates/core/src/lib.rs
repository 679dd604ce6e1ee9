//! Core types and configuration for the pricewatch system.
//!
//! This crate provides shared types used across all other crates:
//! - Price records and their classified form
//! - Aggregate dashboard statistics
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
