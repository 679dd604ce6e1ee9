//! Plain-text rendering of classified batches and dashboard metrics.

use std::fmt::Write as _;

use chrono::NaiveDate;
use pricewatch_core::{AggregateStats, ClassifiedRecord};

/// Product table with the status message as the last column.
pub fn price_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ClassifiedRecord>,
{
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<28} {:>10} {:<16} {:>11} {:<12} {}",
        "Product ID", "Product Name", "Our Price", "Competitor", "Their Price", "Last Updated", "Status"
    );
    for c in records {
        let r = &c.record;
        let _ = writeln!(
            out,
            "{:<10} {:<28} {:>10} {:<16} {:>11} {:<12} {}",
            r.product_id,
            r.product_name,
            format!("${:.2}", r.our_price),
            r.competitor_name,
            format!("${:.2}", r.competitor_price),
            r.last_updated,
            c.message
        );
    }
    out
}

/// Top-alert table: product, both prices and the gap.
pub fn alert_table(records: &[&ClassifiedRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<28} {:>10} {:<16} {:>11} {:>16}",
        "Product", "Our Price", "Competitor", "Their Price", "Price Difference"
    );
    for c in records {
        let r = &c.record;
        let _ = writeln!(
            out,
            "{:<28} {:>10} {:<16} {:>11} {:>16}",
            r.product_name,
            format!("${:.2}", r.our_price),
            r.competitor_name,
            format!("${:.2}", r.competitor_price),
            format!("${:.2}", c.price_diff())
        );
    }
    out
}

/// Dashboard metrics; averages are shown only when positive.
pub fn dashboard(stats: &AggregateStats, last_update: Option<NaiveDate>) -> String {
    let mut out = String::new();
    let last = last_update
        .map(|d| d.to_string())
        .unwrap_or_else(|| "No data available".to_string());

    let _ = writeln!(out, "Total Products Monitored:        {}", stats.total_products);
    let _ = writeln!(out, "Price Drop Alerts:               {}", stats.competitors_cheaper);
    let _ = writeln!(out, "Last Data Update:                {}", last);
    let _ = writeln!(out, "Products Where We're Cheaper:    {}", stats.we_are_cheaper);
    let _ = writeln!(out, "Identical Prices:                {}", stats.identical_prices);
    if stats.avg_competitor_advantage > 0.0 {
        let _ = writeln!(
            out,
            "Avg. Competitor Price Advantage: ${:.2}",
            stats.avg_competitor_advantage
        );
    }
    if stats.avg_our_advantage > 0.0 {
        let _ = writeln!(out, "Avg. Our Price Advantage:        ${:.2}", stats.avg_our_advantage);
    }
    out
}
