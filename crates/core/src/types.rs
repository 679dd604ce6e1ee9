//! Core data types for the pricewatch system.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Price in the seller's currency.
pub type Price = f64;

/// One product's paired our-price / competitor-price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Opaque product identifier, unique within a batch.
    pub product_id: String,
    /// Display name.
    pub product_name: String,
    /// Our listed price.
    pub our_price: Price,
    /// Competitor display name.
    pub competitor_name: String,
    /// Competitor's listed price.
    pub competitor_price: Price,
    /// Date the observation was taken.
    pub last_updated: NaiveDate,
}

impl PriceRecord {
    /// Create a new record.
    pub fn new(
        product_id: impl Into<String>,
        product_name: impl Into<String>,
        our_price: Price,
        competitor_name: impl Into<String>,
        competitor_price: Price,
        last_updated: NaiveDate,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            our_price,
            competitor_name: competitor_name.into(),
            competitor_price,
            last_updated,
        }
    }

    /// Signed difference: positive when the competitor is cheaper.
    #[inline]
    pub fn price_diff(&self) -> Price {
        self.our_price - self.competitor_price
    }

    /// Whether both prices are finite and non-negative.
    #[inline]
    pub fn has_valid_prices(&self) -> bool {
        is_valid_price(self.our_price) && is_valid_price(self.competitor_price)
    }
}

/// A price accepted at ingestion: finite and non-negative.
#[inline]
pub fn is_valid_price(price: Price) -> bool {
    price.is_finite() && price >= 0.0
}

/// Competitive status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceStatus {
    /// Competitor is cheaper than us.
    Alert,
    /// We are cheaper than the competitor.
    Good,
    /// Prices are identical.
    Neutral,
}

impl PriceStatus {
    /// Lowercase name used in exports and row styling.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceStatus::Alert => "alert",
            PriceStatus::Good => "good",
            PriceStatus::Neutral => "neutral",
        }
    }
}

impl fmt::Display for PriceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A price record with its competitive status and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// Original record.
    #[serde(flatten)]
    pub record: PriceRecord,
    /// Competitive status.
    pub status: PriceStatus,
    /// Human-readable explanation derived from status and prices.
    pub message: String,
}

impl ClassifiedRecord {
    /// Signed difference: positive when the competitor is cheaper.
    #[inline]
    pub fn price_diff(&self) -> Price {
        self.record.price_diff()
    }

    /// Absolute difference as a percentage of the higher price.
    ///
    /// Zero for identical prices.
    pub fn diff_pct(&self) -> f64 {
        let r = &self.record;
        match self.status {
            PriceStatus::Alert => (r.our_price - r.competitor_price) / r.our_price * 100.0,
            PriceStatus::Good => (r.competitor_price - r.our_price) / r.competitor_price * 100.0,
            PriceStatus::Neutral => 0.0,
        }
    }

    #[inline]
    pub fn is_alert(&self) -> bool {
        self.status == PriceStatus::Alert
    }
}

/// Dashboard summary of one classified batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Count of all records.
    pub total_products: usize,
    /// Records where the competitor is cheaper.
    pub competitors_cheaper: usize,
    /// Records where we are cheaper.
    pub we_are_cheaper: usize,
    /// Records with identical prices.
    pub identical_prices: usize,
    /// Mean (our - competitor) over alert records, 2dp.
    pub avg_competitor_advantage: f64,
    /// Mean (competitor - our) over good records, 2dp.
    pub avg_our_advantage: f64,
}

/// Round to `dp` decimal places, halves away from zero.
#[inline]
pub fn round_dp(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn test_price_diff_sign() {
        let r = PriceRecord::new("P1", "Kettle", 10.0, "ShopA", 8.0, date());
        assert!((r.price_diff() - 2.0).abs() < 1e-10);
        let r = PriceRecord::new("P2", "Kettle", 8.0, "ShopA", 10.0, date());
        assert!((r.price_diff() + 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_valid_prices() {
        assert!(PriceRecord::new("P1", "A", 0.0, "B", 0.0, date()).has_valid_prices());
        assert!(!PriceRecord::new("P1", "A", -1.0, "B", 0.0, date()).has_valid_prices());
        assert!(!PriceRecord::new("P1", "A", 1.0, "B", f64::NAN, date()).has_valid_prices());
    }

    #[test]
    fn test_status_serde_lowercase() {
        assert_eq!(serde_json::to_string(&PriceStatus::Alert).unwrap(), "\"alert\"");
        let s: PriceStatus = serde_json::from_str("\"neutral\"").unwrap();
        assert_eq!(s, PriceStatus::Neutral);
        assert_eq!(PriceStatus::Good.to_string(), "good");
    }

    #[test]
    fn test_classified_flattens_to_row() {
        let classified = ClassifiedRecord {
            record: PriceRecord::new("P1", "Kettle", 10.0, "ShopA", 8.0, date()),
            status: PriceStatus::Alert,
            message: "x".to_string(),
        };
        let row = serde_json::to_value(&classified).unwrap();
        assert_eq!(row["product_id"], "P1");
        assert_eq!(row["last_updated"], "2025-03-14");
        assert_eq!(row["status"], "alert");
    }

    #[test]
    fn test_diff_pct_relative_to_higher_price() {
        let alert = ClassifiedRecord {
            record: PriceRecord::new("P1", "A", 10.0, "B", 8.0, date()),
            status: PriceStatus::Alert,
            message: String::new(),
        };
        approx::assert_abs_diff_eq!(alert.diff_pct(), 20.0, epsilon = 1e-9);

        let good = ClassifiedRecord {
            record: PriceRecord::new("P2", "A", 8.0, "B", 10.0, date()),
            status: PriceStatus::Good,
            message: String::new(),
        };
        approx::assert_abs_diff_eq!(good.diff_pct(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(1.234, 2), 1.23);
        assert_eq!(round_dp(1.0, 2), 1.0);
        assert_eq!(round_dp(0.0, 2), 0.0);
        assert_eq!(round_dp(2.6666, 2), 2.67);
    }
}
