//! Storage and ingestion collaborators for the pricewatch system.
//!
//! This crate provides:
//! - The `RecordStore` trait the comparison core reads snapshots through
//! - A SQLite-backed store
//! - CSV ingestion with upstream validation (required columns, no negative prices)

pub mod ingest;
pub mod sqlite;

pub use ingest::{read_csv, read_csv_path, validate_records, REQUIRED_COLUMNS};
pub use sqlite::{delete_database, SqliteStore};

use pricewatch_core::{PriceRecord, Result};

/// Backing store for price records.
pub trait RecordStore {
    /// Load every stored record, in insertion order.
    fn load_all_records(&self) -> Result<Vec<PriceRecord>>;

    /// Append records to the store.
    fn save_records(&mut self, records: &[PriceRecord]) -> Result<()>;
}
