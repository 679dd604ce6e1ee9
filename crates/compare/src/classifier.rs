//! Competitive status classification.
//!
//! Compares our price against the competitor's for every record and attaches
//! a status plus an explanation message. Classification is a pure mapping:
//! the output has the same length and order as the input and nothing is
//! mutated in place.

use pricewatch_core::{
    is_valid_price, ClassifiedRecord, Error, Price, PriceRecord, PriceStatus, Result,
};
use tracing::debug;

/// Status for a pair of prices.
///
/// Incomparable prices (NaN) fall through to `Neutral`.
#[inline]
pub fn status_of(our_price: Price, competitor_price: Price) -> PriceStatus {
    if competitor_price < our_price {
        PriceStatus::Alert
    } else if our_price < competitor_price {
        PriceStatus::Good
    } else {
        PriceStatus::Neutral
    }
}

/// Classify a single record.
///
/// Negative prices are tolerated: the arithmetic still runs, the result is
/// just not meaningful. Use [`classify_checked`] to reject them instead.
pub fn classify_record(record: &PriceRecord) -> ClassifiedRecord {
    let our = record.our_price;
    let comp = record.competitor_price;
    let status = status_of(our, comp);

    let message = match status {
        PriceStatus::Alert => {
            // comp >= 0 && comp < our implies our > 0
            debug_assert!(
                our > 0.0 || comp < 0.0,
                "zero divisor with non-negative prices for {}",
                record.product_id
            );
            let diff = our - comp;
            let pct = diff / our * 100.0;
            format!("Price Drop Alert (${:.2} / {:.1}% cheaper)", diff, pct)
        }
        PriceStatus::Good => {
            debug_assert!(
                comp > 0.0 || our < 0.0,
                "zero divisor with non-negative prices for {}",
                record.product_id
            );
            let diff = comp - our;
            let pct = diff / comp * 100.0;
            format!("We are cheaper (${:.2} / {:.1}% cheaper)", diff, pct)
        }
        PriceStatus::Neutral => "Prices are identical".to_string(),
    };

    ClassifiedRecord {
        record: record.clone(),
        status,
        message,
    }
}

/// Classify a batch of records, preserving order.
pub fn classify(records: &[PriceRecord]) -> Vec<ClassifiedRecord> {
    let classified: Vec<ClassifiedRecord> = records.iter().map(classify_record).collect();
    debug!(records = classified.len(), "classified price records");
    classified
}

/// Classify a batch, rejecting records with negative or non-finite prices.
pub fn classify_checked(records: &[PriceRecord]) -> Result<Vec<ClassifiedRecord>> {
    for record in records {
        if !is_valid_price(record.our_price) {
            return Err(Error::validation(format!(
                "product {}: invalid our_price {}",
                record.product_id, record.our_price
            )));
        }
        if !is_valid_price(record.competitor_price) {
            return Err(Error::validation(format!(
                "product {}: invalid competitor_price {}",
                record.product_id, record.competitor_price
            )));
        }
    }
    Ok(classify(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_record(id: &str, our: f64, comp: f64) -> PriceRecord {
        PriceRecord::new(
            id,
            format!("Product {}", id),
            our,
            "RivalMart",
            comp,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_competitor_cheaper_is_alert() {
        let classified = classify_record(&make_record("P1", 10.0, 8.0));
        assert_eq!(classified.status, PriceStatus::Alert);
        assert_eq!(classified.message, "Price Drop Alert ($2.00 / 20.0% cheaper)");
    }

    #[test]
    fn test_we_are_cheaper_is_good() {
        let classified = classify_record(&make_record("P1", 8.0, 10.0));
        assert_eq!(classified.status, PriceStatus::Good);
        assert_eq!(classified.message, "We are cheaper ($2.00 / 20.0% cheaper)");
    }

    #[test]
    fn test_identical_is_neutral() {
        let classified = classify_record(&make_record("P1", 5.0, 5.0));
        assert_eq!(classified.status, PriceStatus::Neutral);
        assert_eq!(classified.message, "Prices are identical");
    }

    #[test]
    fn test_zero_prices() {
        assert_eq!(classify_record(&make_record("P1", 0.0, 0.0)).status, PriceStatus::Neutral);

        // Free competitor: 100% cheaper
        let classified = classify_record(&make_record("P2", 4.0, 0.0));
        assert_eq!(classified.message, "Price Drop Alert ($4.00 / 100.0% cheaper)");

        let classified = classify_record(&make_record("P3", 0.0, 4.0));
        assert_eq!(classified.message, "We are cheaper ($4.00 / 100.0% cheaper)");
    }

    #[test]
    fn test_percentage_rounding() {
        // 1/3 of 3.00 -> 33.3%
        let classified = classify_record(&make_record("P1", 3.0, 2.0));
        assert_eq!(classified.message, "Price Drop Alert ($1.00 / 33.3% cheaper)");

        // 0.5 / 19.99 = 2.501...%
        let classified = classify_record(&make_record("P2", 19.49, 19.99));
        assert_eq!(classified.message, "We are cheaper ($0.50 / 2.5% cheaper)");
    }

    #[test]
    fn test_batch_preserves_length_and_order() {
        let records = vec![
            make_record("A", 5.0, 6.0),
            make_record("B", 10.0, 8.0),
            make_record("C", 7.0, 7.0),
            make_record("D", 1.0, 0.5),
        ];
        let classified = classify(&records);

        assert_eq!(classified.len(), records.len());
        for (input, output) in records.iter().zip(&classified) {
            assert_eq!(&output.record, input);
        }
        let statuses: Vec<_> = classified.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                PriceStatus::Good,
                PriceStatus::Alert,
                PriceStatus::Neutral,
                PriceStatus::Alert
            ]
        );
    }

    #[test]
    fn test_empty_batch() {
        assert!(classify(&[]).is_empty());
        assert!(classify_checked(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_idempotent() {
        let records = vec![make_record("A", 12.5, 9.99), make_record("B", 3.0, 3.5)];
        assert_eq!(classify(&records), classify(&records));
    }

    #[test]
    fn test_status_matches_price_order() {
        let prices = [0.0, 0.01, 1.0, 9.99, 10.0, 250.0];
        for &our in &prices {
            for &comp in &prices {
                let c = classify_record(&make_record("X", our, comp));
                assert_eq!(c.status == PriceStatus::Alert, comp < our);
                assert_eq!(c.status == PriceStatus::Good, our < comp);
                assert_eq!(c.status == PriceStatus::Neutral, our == comp);
            }
        }
    }

    #[test]
    fn test_message_matches_diff() {
        let c = classify_record(&make_record("X", 24.99, 19.95));
        let expected = format!(
            "Price Drop Alert (${:.2} / {:.1}% cheaper)",
            c.price_diff().abs(),
            c.diff_pct()
        );
        assert_eq!(c.message, expected);
        approx::assert_abs_diff_eq!(c.price_diff(), 5.04, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_prices_tolerated() {
        let classified = classify(&[make_record("N1", -5.0, -10.0), make_record("N2", 0.0, -1.0)]);
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].status, PriceStatus::Alert);
        assert_eq!(classified[1].status, PriceStatus::Alert);
    }

    #[test]
    fn test_checked_rejects_negative() {
        let err = classify_checked(&[make_record("OK", 1.0, 2.0), make_record("BAD", 1.0, -2.0)])
            .unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("BAD"));
    }

    #[test]
    fn test_checked_rejects_nan() {
        let err = classify_checked(&[make_record("NAN", f64::NAN, 2.0)]).unwrap_err();
        assert!(err.is_validation());
    }
}
