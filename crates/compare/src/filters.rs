//! Record filters used by dashboards and alert previews.
//!
//! All filters borrow the classified batch and keep input order unless they
//! say otherwise.

use std::cmp::Reverse;

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use pricewatch_core::{ClassifiedRecord, PriceRecord, PriceStatus};

/// Records whose product or competitor name contains `term`, ignoring case.
///
/// An empty term matches everything.
pub fn search<'a>(records: &'a [ClassifiedRecord], term: &str) -> Vec<&'a ClassifiedRecord> {
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|c| {
            c.record.product_name.to_lowercase().contains(&needle)
                || c.record.competitor_name.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Records with the given status.
pub fn with_status(records: &[ClassifiedRecord], status: PriceStatus) -> Vec<&ClassifiedRecord> {
    records.iter().filter(|c| c.status == status).collect()
}

/// The `n` alert records with the largest price gap, largest first.
///
/// Ties keep input order.
pub fn top_alerts(records: &[ClassifiedRecord], n: usize) -> Vec<&ClassifiedRecord> {
    let mut alerts = with_status(records, PriceStatus::Alert);
    // sort_by_key is stable
    alerts.sort_by_key(|c| Reverse(OrderedFloat(c.price_diff())));
    alerts.truncate(n);
    alerts
}

/// Most recent observation date in the batch.
pub fn last_updated(records: &[PriceRecord]) -> Option<NaiveDate> {
    records.iter().map(|r| r.last_updated).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;

    fn make_record(id: &str, name: &str, competitor: &str, our: f64, comp: f64, day: u32) -> PriceRecord {
        PriceRecord::new(
            id,
            name,
            our,
            competitor,
            comp,
            NaiveDate::from_ymd_opt(2025, 2, day).unwrap(),
        )
    }

    fn sample() -> Vec<PriceRecord> {
        vec![
            make_record("P1", "Wireless Mouse", "TechHub", 25.0, 22.0, 3),
            make_record("P2", "USB-C Cable", "CableCo", 9.0, 12.0, 7),
            make_record("P3", "Mechanical Keyboard", "TechHub", 89.0, 79.0, 5),
            make_record("P4", "Laptop Stand", "DeskWorks", 40.0, 40.0, 1),
            make_record("P5", "Webcam", "StreamGear", 55.0, 52.0, 2),
        ]
    }

    #[test]
    fn test_search_case_insensitive() {
        let classified = classify(&sample());

        let hits = search(&classified, "techhub");
        let ids: Vec<_> = hits.iter().map(|c| c.record.product_id.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P3"]);

        let hits = search(&classified, "CABLE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.product_id, "P2");

        assert!(search(&classified, "nothing-like-this").is_empty());
        assert_eq!(search(&classified, "").len(), 5);
    }

    #[test]
    fn test_with_status() {
        let classified = classify(&sample());
        assert_eq!(with_status(&classified, PriceStatus::Alert).len(), 3);
        assert_eq!(with_status(&classified, PriceStatus::Good).len(), 1);
        assert_eq!(with_status(&classified, PriceStatus::Neutral).len(), 1);
    }

    #[test]
    fn test_top_alerts_sorted_by_gap() {
        let classified = classify(&sample());
        let top = top_alerts(&classified, 2);
        let ids: Vec<_> = top.iter().map(|c| c.record.product_id.as_str()).collect();
        // P3 gap 10, then P1 and P5 tie at 3 -> P1 first
        assert_eq!(ids, vec!["P3", "P1"]);

        assert_eq!(top_alerts(&classified, 10).len(), 3);
        assert!(top_alerts(&classified, 0).is_empty());
    }

    #[test]
    fn test_last_updated() {
        assert_eq!(
            last_updated(&sample()),
            NaiveDate::from_ymd_opt(2025, 2, 7)
        );
        assert_eq!(last_updated(&[]), None);
    }
}
