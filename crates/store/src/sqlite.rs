//! SQLite-backed record store.
//!
//! Only this module talks to the database. Records are appended; the table
//! keeps its own autoincrement id so repeated imports of the same product are
//! all retained, in insertion order.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pricewatch_core::{Error, PriceRecord, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::ingest::validate_records;
use crate::RecordStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id TEXT NOT NULL,
    product_name TEXT NOT NULL,
    our_price REAL NOT NULL,
    competitor_name TEXT NOT NULL,
    competitor_price REAL NOT NULL,
    last_updated DATE NOT NULL
);";

const SELECT_COLUMNS: &str =
    "SELECT product_id, product_name, our_price, competitor_name, competitor_price, last_updated \
     FROM products";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn db_err(e: rusqlite::Error) -> Error {
    Error::database(e.to_string())
}

fn parse_stored_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PriceRecord> {
    let raw_date: String = row.get(5)?;
    Ok(PriceRecord {
        product_id: row.get(0)?,
        product_name: row.get(1)?,
        our_price: row.get(2)?,
        competitor_name: row.get(3)?,
        competitor_price: row.get(4)?,
        last_updated: parse_stored_date(5, &raw_date)?,
    })
}

/// Escape LIKE wildcards so a search term matches literally.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Price records stored in a SQLite `products` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(db_err)?;
        let store = Self { conn };
        store.migrate()?;
        debug!(path = %path.display(), "opened price store");
        Ok(store)
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA).map_err(db_err)
    }

    fn query(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<PriceRecord>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_err)?;
        let records = stmt
            .query_map(args, row_to_record)
            .map_err(db_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err)?;
        Ok(records)
    }

    /// Records whose product or competitor name contains `term`.
    ///
    /// Case-insensitive for ASCII.
    pub fn search(&self, term: &str) -> Result<Vec<PriceRecord>> {
        let sql = format!(
            "{} WHERE product_name LIKE ?1 ESCAPE '\\' OR competitor_name LIKE ?1 ESCAPE '\\' \
             ORDER BY id",
            SELECT_COLUMNS
        );
        self.query(&sql, &[&like_pattern(term)])
    }

    /// Records where the competitor undercuts us.
    pub fn competitors_cheaper(&self) -> Result<Vec<PriceRecord>> {
        let sql = format!("{} WHERE competitor_price < our_price ORDER BY id", SELECT_COLUMNS);
        self.query(&sql, &[])
    }

    /// Records where we undercut the competitor.
    pub fn we_are_cheaper(&self) -> Result<Vec<PriceRecord>> {
        let sql = format!("{} WHERE our_price < competitor_price ORDER BY id", SELECT_COLUMNS);
        self.query(&sql, &[])
    }

    /// Most recent `last_updated` in the table.
    pub fn last_update_date(&self) -> Result<Option<NaiveDate>> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT MAX(last_updated) FROM products", [], |row| row.get(0))
            .map_err(db_err)?;
        raw.map(|s| parse_stored_date(0, &s).map_err(db_err))
            .transpose()
    }

    /// Number of stored rows.
    pub fn count(&self) -> Result<usize> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .map_err(db_err)?;
        Ok(n as usize)
    }

    /// Remove every stored record.
    pub fn clear(&self) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM products", [])
            .map_err(db_err)?;
        info!(removed, "cleared price store");
        Ok(removed)
    }
}

impl RecordStore for SqliteStore {
    fn load_all_records(&self) -> Result<Vec<PriceRecord>> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        self.query(&sql, &[])
    }

    fn save_records(&mut self, records: &[PriceRecord]) -> Result<()> {
        validate_records(records)?;

        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO products \
                     (product_id, product_name, our_price, competitor_name, competitor_price, last_updated) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(db_err)?;
            for r in records {
                stmt.execute(params![
                    r.product_id,
                    r.product_name,
                    r.our_price,
                    r.competitor_name,
                    r.competitor_price,
                    r.last_updated.format(DATE_FORMAT).to_string(),
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;

        info!(records = records.len(), "saved price records");
        Ok(())
    }
}

/// Delete the database file at `path`.
///
/// Returns `false` when there was nothing to delete.
pub fn delete_database(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(path)?;
    info!(path = %path.display(), "deleted price database");
    Ok(true)
}
