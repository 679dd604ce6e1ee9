//! Price-drop alert reports and their delivery.
//!
//! A report collects the alert records of a classified batch. Delivery is
//! best-effort and owned by an [`AlertSink`]; the only sink shipped here
//! writes the report to a log file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use pricewatch_core::config::AlertConfig;
use pricewatch_core::{ClassifiedRecord, Price, Result};
use serde::Serialize;
use tracing::info;

/// One product in an alert report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertLine {
    pub product_id: String,
    pub product_name: String,
    pub our_price: Price,
    pub competitor_name: String,
    pub competitor_price: Price,
    /// our_price - competitor_price (positive).
    pub difference: Price,
    /// Difference as a percentage of our price.
    pub difference_pct: f64,
}

impl AlertLine {
    fn from_classified(classified: &ClassifiedRecord) -> Self {
        let r = &classified.record;
        Self {
            product_id: r.product_id.clone(),
            product_name: r.product_name.clone(),
            our_price: r.our_price,
            competitor_name: r.competitor_name.clone(),
            competitor_price: r.competitor_price,
            difference: classified.price_diff(),
            difference_pct: classified.diff_pct(),
        }
    }
}

/// Alert records of one batch, largest price gap first.
#[derive(Debug, Clone, Serialize)]
pub struct AlertReport {
    /// When the report was composed.
    pub generated_at: NaiveDateTime,
    /// Alert lines sorted by difference, descending.
    pub lines: Vec<AlertLine>,
}

impl AlertReport {
    /// Build a report from the alert records of a classified batch.
    pub fn from_classified(records: &[ClassifiedRecord], generated_at: NaiveDateTime) -> Self {
        let mut lines: Vec<AlertLine> = records
            .iter()
            .filter(|c| c.is_alert())
            .map(AlertLine::from_classified)
            .collect();
        lines.sort_by(|a, b| b.difference.total_cmp(&a.difference));

        Self {
            generated_at,
            lines,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Plain-text body used for log files and email.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "PRICE ALERT: {} products with competitor price drops",
            self.lines.len()
        );
        let _ = writeln!(
            out,
            "Generated on: {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        out.push('\n');

        for line in &self.lines {
            let _ = writeln!(out, "Product: {}", line.product_name);
            let _ = writeln!(out, "Our Price: ${:.2}", line.our_price);
            let _ = writeln!(out, "Competitor: {}", line.competitor_name);
            let _ = writeln!(out, "Their Price: ${:.2}", line.competitor_price);
            let _ = writeln!(
                out,
                "Difference: ${:.2} ({:.1}%)",
                line.difference, line.difference_pct
            );
            out.push('\n');
        }
        out
    }
}

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Report written to a log file.
    Logged { path: PathBuf },
    /// Nothing to deliver.
    Skipped,
}

/// Destination for alert reports.
pub trait AlertSink {
    /// Deliver `report` to `recipient`.
    fn deliver(&self, report: &AlertReport, recipient: &str) -> Result<Delivery>;
}

/// Writes each report to `<log_dir>/price_alert_<YYYYmmdd_HHMMSS>.txt`.
#[derive(Debug, Clone)]
pub struct LogFileSink {
    log_dir: PathBuf,
}

impl LogFileSink {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn from_config(config: &AlertConfig) -> Self {
        Self::new(config.log_dir.clone())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    fn path_for(&self, report: &AlertReport) -> PathBuf {
        self.log_dir.join(format!(
            "price_alert_{}.txt",
            report.generated_at.format("%Y%m%d_%H%M%S")
        ))
    }
}

impl AlertSink for LogFileSink {
    fn deliver(&self, report: &AlertReport, recipient: &str) -> Result<Delivery> {
        if report.is_empty() {
            return Ok(Delivery::Skipped);
        }

        fs::create_dir_all(&self.log_dir)?;
        let path = self.path_for(report);
        fs::write(&path, report.render_text())?;

        info!(
            alerts = report.len(),
            recipient,
            path = %path.display(),
            "price alert logged"
        );
        Ok(Delivery::Logged { path })
    }
}
