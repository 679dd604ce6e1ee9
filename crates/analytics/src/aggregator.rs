//! Aggregate statistics over a classified batch.
//!
//! Counts records per status and averages the price gap on each side.

use pricewatch_core::{round_dp, AggregateStats, ClassifiedRecord, PriceStatus};
use tracing::debug;

/// Running totals for a classified batch.
///
/// Feed records with [`push`](Self::push) and call [`finish`](Self::finish)
/// for the rounded statistics.
#[derive(Debug, Clone, Default)]
pub struct StatsAccumulator {
    total: usize,
    alerts: usize,
    good: usize,
    neutral: usize,
    /// Sum of (our - competitor) over alert records.
    competitor_advantage_sum: f64,
    /// Sum of (competitor - our) over good records.
    our_advantage_sum: f64,
}

impl StatsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one classified record.
    pub fn push(&mut self, classified: &ClassifiedRecord) {
        let r = &classified.record;
        self.total += 1;

        match classified.status {
            PriceStatus::Alert => {
                self.alerts += 1;
                self.competitor_advantage_sum += r.our_price - r.competitor_price;
            }
            PriceStatus::Good => {
                self.good += 1;
                self.our_advantage_sum += r.competitor_price - r.our_price;
            }
            PriceStatus::Neutral => {
                self.neutral += 1;
            }
        }
    }

    /// Number of records seen so far.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Build the statistics; averages are 0 for empty subsets.
    pub fn finish(&self) -> AggregateStats {
        let avg_competitor_advantage = if self.alerts > 0 {
            self.competitor_advantage_sum / self.alerts as f64
        } else {
            0.0
        };

        let avg_our_advantage = if self.good > 0 {
            self.our_advantage_sum / self.good as f64
        } else {
            0.0
        };

        AggregateStats {
            total_products: self.total,
            competitors_cheaper: self.alerts,
            we_are_cheaper: self.good,
            identical_prices: self.neutral,
            avg_competitor_advantage: round_dp(avg_competitor_advantage, 2),
            avg_our_advantage: round_dp(avg_our_advantage, 2),
        }
    }

    /// Reset to empty.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<'a> Extend<&'a ClassifiedRecord> for StatsAccumulator {
    fn extend<I: IntoIterator<Item = &'a ClassifiedRecord>>(&mut self, iter: I) {
        for classified in iter {
            self.push(classified);
        }
    }
}

/// Compute dashboard statistics for a classified batch.
pub fn aggregate(classified: &[ClassifiedRecord]) -> AggregateStats {
    let mut acc = StatsAccumulator::new();
    acc.extend(classified);
    let stats = acc.finish();
    debug!(
        total = stats.total_products,
        alerts = stats.competitors_cheaper,
        good = stats.we_are_cheaper,
        neutral = stats.identical_prices,
        "aggregated price statistics"
    );
    stats
}
