//! PyO3 bindings for the pricewatch comparison engine.
//!
//! Exposes the Rust implementations to a Python presentation layer:
//! - Price record classification
//! - Dashboard statistics
//! - Top price-drop alerts

use chrono::NaiveDate;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use pricewatch_core::{
    AggregateStats as RustAggregateStats,
    ClassifiedRecord as RustClassifiedRecord,
    PriceRecord as RustPriceRecord,
    PriceStatus as RustPriceStatus,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(raw: &str) -> PyResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| PyValueError::new_err(format!("invalid last_updated '{}': {}", raw, e)))
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// One product's our-price / competitor-price observation.
#[pyclass]
#[derive(Clone)]
pub struct PriceRecord {
    #[pyo3(get, set)]
    pub product_id: String,
    #[pyo3(get, set)]
    pub product_name: String,
    #[pyo3(get, set)]
    pub our_price: f64,
    #[pyo3(get, set)]
    pub competitor_name: String,
    #[pyo3(get, set)]
    pub competitor_price: f64,
    /// ISO date (YYYY-MM-DD).
    #[pyo3(get, set)]
    pub last_updated: String,
}

#[pymethods]
impl PriceRecord {
    #[new]
    fn new(
        product_id: String,
        product_name: String,
        our_price: f64,
        competitor_name: String,
        competitor_price: f64,
        last_updated: String,
    ) -> PyResult<Self> {
        parse_date(&last_updated)?;
        Ok(PriceRecord {
            product_id,
            product_name,
            our_price,
            competitor_name,
            competitor_price,
            last_updated,
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "PriceRecord(product_id={}, our_price={:.2}, competitor_price={:.2})",
            self.product_id, self.our_price, self.competitor_price
        )
    }
}

impl TryFrom<PriceRecord> for RustPriceRecord {
    type Error = PyErr;

    fn try_from(r: PriceRecord) -> PyResult<Self> {
        let last_updated = parse_date(&r.last_updated)?;
        Ok(RustPriceRecord {
            product_id: r.product_id,
            product_name: r.product_name,
            our_price: r.our_price,
            competitor_name: r.competitor_name,
            competitor_price: r.competitor_price,
            last_updated,
        })
    }
}

impl From<RustPriceRecord> for PriceRecord {
    fn from(r: RustPriceRecord) -> Self {
        PriceRecord {
            product_id: r.product_id,
            product_name: r.product_name,
            our_price: r.our_price,
            competitor_name: r.competitor_name,
            competitor_price: r.competitor_price,
            last_updated: r.last_updated.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Competitive status.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, PartialEq)]
pub enum PriceStatus {
    Alert,
    Good,
    Neutral,
}

#[pymethods]
impl PriceStatus {
    /// Lowercase name ("alert", "good", "neutral").
    #[getter]
    fn name(&self) -> &'static str {
        RustPriceStatus::from(*self).as_str()
    }
}

impl From<RustPriceStatus> for PriceStatus {
    fn from(s: RustPriceStatus) -> Self {
        match s {
            RustPriceStatus::Alert => PriceStatus::Alert,
            RustPriceStatus::Good => PriceStatus::Good,
            RustPriceStatus::Neutral => PriceStatus::Neutral,
        }
    }
}

impl From<PriceStatus> for RustPriceStatus {
    fn from(s: PriceStatus) -> Self {
        match s {
            PriceStatus::Alert => RustPriceStatus::Alert,
            PriceStatus::Good => RustPriceStatus::Good,
            PriceStatus::Neutral => RustPriceStatus::Neutral,
        }
    }
}

/// A price record with status and explanation message.
#[pyclass]
#[derive(Clone)]
pub struct ClassifiedRecord {
    #[pyo3(get)]
    pub record: PriceRecord,
    #[pyo3(get)]
    pub status: PriceStatus,
    #[pyo3(get)]
    pub message: String,
}

#[pymethods]
impl ClassifiedRecord {
    /// our_price - competitor_price.
    #[getter]
    fn price_diff(&self) -> f64 {
        self.record.our_price - self.record.competitor_price
    }

    fn __repr__(&self) -> String {
        format!(
            "ClassifiedRecord(product_id={}, status={}, message={:?})",
            self.record.product_id,
            RustPriceStatus::from(self.status).as_str(),
            self.message
        )
    }
}

impl From<RustClassifiedRecord> for ClassifiedRecord {
    fn from(c: RustClassifiedRecord) -> Self {
        ClassifiedRecord {
            record: c.record.into(),
            status: c.status.into(),
            message: c.message,
        }
    }
}

impl TryFrom<ClassifiedRecord> for RustClassifiedRecord {
    type Error = PyErr;

    fn try_from(c: ClassifiedRecord) -> PyResult<Self> {
        Ok(RustClassifiedRecord {
            record: c.record.try_into()?,
            status: c.status.into(),
            message: c.message,
        })
    }
}

/// Dashboard statistics for a classified batch.
#[pyclass]
#[derive(Clone)]
pub struct AggregateStats {
    #[pyo3(get)]
    pub total_products: usize,
    #[pyo3(get)]
    pub competitors_cheaper: usize,
    #[pyo3(get)]
    pub we_are_cheaper: usize,
    #[pyo3(get)]
    pub identical_prices: usize,
    #[pyo3(get)]
    pub avg_competitor_advantage: f64,
    #[pyo3(get)]
    pub avg_our_advantage: f64,
}

#[pymethods]
impl AggregateStats {
    /// Plain dict for templating and JSON export.
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        dict.set_item("total_products", self.total_products)?;
        dict.set_item("competitors_cheaper", self.competitors_cheaper)?;
        dict.set_item("we_are_cheaper", self.we_are_cheaper)?;
        dict.set_item("identical_prices", self.identical_prices)?;
        dict.set_item("avg_competitor_advantage", self.avg_competitor_advantage)?;
        dict.set_item("avg_our_advantage", self.avg_our_advantage)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "AggregateStats(total={}, cheaper_competitors={}, we_cheaper={}, identical={})",
            self.total_products, self.competitors_cheaper, self.we_are_cheaper, self.identical_prices
        )
    }
}

impl From<RustAggregateStats> for AggregateStats {
    fn from(s: RustAggregateStats) -> Self {
        AggregateStats {
            total_products: s.total_products,
            competitors_cheaper: s.competitors_cheaper,
            we_are_cheaper: s.we_are_cheaper,
            identical_prices: s.identical_prices,
            avg_competitor_advantage: s.avg_competitor_advantage,
            avg_our_advantage: s.avg_our_advantage,
        }
    }
}

// ============================================================================
// Python-exposed Functions
// ============================================================================

fn to_rust_records(records: Vec<PriceRecord>) -> PyResult<Vec<RustPriceRecord>> {
    records.into_iter().map(RustPriceRecord::try_from).collect()
}

fn to_rust_classified(classified: Vec<ClassifiedRecord>) -> PyResult<Vec<RustClassifiedRecord>> {
    classified
        .into_iter()
        .map(RustClassifiedRecord::try_from)
        .collect()
}

/// Classify records, preserving order.
#[pyfunction]
fn classify(records: Vec<PriceRecord>) -> PyResult<Vec<ClassifiedRecord>> {
    let rust_records = to_rust_records(records)?;
    Ok(pricewatch_compare::classify(&rust_records)
        .into_iter()
        .map(|c| c.into())
        .collect())
}

/// Classify records, raising ValueError on negative or non-finite prices.
#[pyfunction]
fn classify_checked(records: Vec<PriceRecord>) -> PyResult<Vec<ClassifiedRecord>> {
    let rust_records = to_rust_records(records)?;
    let classified = pricewatch_compare::classify_checked(&rust_records)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(classified.into_iter().map(|c| c.into()).collect())
}

/// Dashboard statistics for a classified batch.
#[pyfunction]
fn aggregate(classified: Vec<ClassifiedRecord>) -> PyResult<AggregateStats> {
    let rust_classified = to_rust_classified(classified)?;
    Ok(pricewatch_analytics::aggregate(&rust_classified).into())
}

/// The `n` largest price-drop alerts, largest gap first.
#[pyfunction]
fn top_alerts(classified: Vec<ClassifiedRecord>, n: usize) -> PyResult<Vec<ClassifiedRecord>> {
    let rust_classified = to_rust_classified(classified)?;
    Ok(pricewatch_compare::top_alerts(&rust_classified, n)
        .into_iter()
        .map(|c| c.clone().into())
        .collect())
}

// ============================================================================
// Module Definition
// ============================================================================

/// Pricewatch - Rust price comparison engine for Python.
#[pymodule]
fn pricewatch_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<PriceRecord>()?;
    m.add_class::<PriceStatus>()?;
    m.add_class::<ClassifiedRecord>()?;
    m.add_class::<AggregateStats>()?;

    // Functions
    m.add_function(wrap_pyfunction!(classify, m)?)?;
    m.add_function(wrap_pyfunction!(classify_checked, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate, m)?)?;
    m.add_function(wrap_pyfunction!(top_alerts, m)?)?;

    Ok(())
}
