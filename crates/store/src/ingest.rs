//! CSV ingestion.
//!
//! Rows must carry the six record columns; anything else in the file is
//! ignored. Records that fail validation never reach the comparison core.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pricewatch_core::{Error, PriceRecord, Result};
use serde::Deserialize;
use tracing::{debug, warn};

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "product_id",
    "product_name",
    "our_price",
    "competitor_name",
    "competitor_price",
    "last_updated",
];

/// Raw CSV row before date parsing and validation.
#[derive(Debug, Deserialize)]
struct CsvRow {
    product_id: String,
    product_name: String,
    our_price: f64,
    competitor_name: String,
    competitor_price: f64,
    last_updated: String,
}

impl CsvRow {
    fn into_record(self, line: usize) -> Result<PriceRecord> {
        let last_updated = parse_date(&self.last_updated).ok_or_else(|| {
            Error::validation(format!(
                "line {}: unrecognised date '{}'",
                line, self.last_updated
            ))
        })?;

        Ok(PriceRecord {
            product_id: self.product_id,
            product_name: self.product_name,
            our_price: self.our_price,
            competitor_name: self.competitor_name,
            competitor_price: self.competitor_price,
            last_updated,
        })
    }
}

/// Parse a calendar date, accepting plain dates and timestamps.
///
/// Timestamps keep only their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|ts| ts.date_naive())
}

/// Reject batches the comparison core must not see.
pub fn validate_records(records: &[PriceRecord]) -> Result<()> {
    for record in records {
        if record.product_id.trim().is_empty() {
            return Err(Error::validation("product_id must not be empty"));
        }
        if record.our_price < 0.0 || record.competitor_price < 0.0 {
            warn!(product_id = %record.product_id, "rejecting negative price");
            return Err(Error::validation("Negative prices are not allowed"));
        }
        if !record.has_valid_prices() {
            warn!(product_id = %record.product_id, "rejecting non-finite price");
            return Err(Error::validation(format!(
                "product {}: prices must be finite numbers",
                record.product_id
            )));
        }
    }
    Ok(())
}

/// Read and validate records from CSV data with a header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<PriceRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| Error::csv(e.to_string()))?
        .clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(Error::validation(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header
        let line = idx + 2;
        let row = row.map_err(|e| Error::csv(format!("line {}: {}", line, e)))?;
        records.push(row.into_record(line)?);
    }

    validate_records(&records)?;
    debug!(records = records.len(), "parsed price records from CSV");
    Ok(records)
}

/// Read and validate records from a CSV file.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Vec<PriceRecord>> {
    let file = File::open(path.as_ref())?;
    read_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "product_id,product_name,our_price,competitor_name,competitor_price,last_updated\n";

    #[test]
    fn test_read_valid_csv() {
        let data = format!(
            "{}P001,Wireless Mouse,24.99,TechHub,22.49,2025-03-01\n\
             P002,USB-C Cable,9.99,CableCo,12.00,2025-03-02\n",
            HEADER
        );
        let records = read_csv(data.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_id, "P001");
        assert_eq!(records[0].competitor_name, "TechHub");
        assert!((records[0].our_price - 24.99).abs() < 1e-10);
        assert_eq!(records[1].last_updated, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_extra_columns_and_order_ignored() {
        let data = "sku_note,last_updated,competitor_price,competitor_name,our_price,product_name,product_id\n\
                    x,2025-01-01,5,Rival,6,Pen,P9\n";
        let records = read_csv(data.as_bytes()).unwrap();
        assert_eq!(records[0].product_id, "P9");
        assert!((records[0].competitor_price - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_columns_listed() {
        let data = "product_id,product_name,our_price\nP1,Pen,1.0\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required columns: competitor_name, competitor_price, last_updated"
        );
    }

    #[test]
    fn test_negative_price_rejected() {
        let data = format!("{}P1,Pen,1.00,Rival,-0.50,2025-01-01\n", HEADER);
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Negative prices are not allowed");
    }

    #[test]
    fn test_unparseable_price_is_csv_error() {
        let data = format!("{}P1,Pen,cheap,Rival,1.0,2025-01-01\n", HEADER);
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Csv(_)));
    }

    #[test]
    fn test_empty_product_id_rejected() {
        let data = format!("{},Pen,1.0,Rival,1.0,2025-01-01\n", HEADER);
        assert!(read_csv(data.as_bytes()).unwrap_err().is_validation());
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(read_csv(HEADER.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 4);
        assert_eq!(parse_date("2025-07-04"), expected);
        assert_eq!(parse_date("2025/07/04"), expected);
        assert_eq!(parse_date("2025-07-04 13:45:00"), expected);
        assert_eq!(parse_date("2025-07-04T13:45:00+02:00"), expected);
        assert_eq!(parse_date("04.07.2025"), None);
    }

    #[test]
    fn test_bad_date_rejected() {
        let data = format!("{}P1,Pen,1.0,Rival,1.0,yesterday\n", HEADER);
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
