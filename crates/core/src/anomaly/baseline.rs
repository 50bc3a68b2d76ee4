//! Quartile-based statistical baseline over per-category amounts.

use super::anomaly_model::AnomalyConfig;

/// Fitted quartile statistics for one category's expense amounts.
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileBaseline {
    q1: f64,
    median: f64,
    q3: f64,
    iqr: f64,
}

/// Quartile by linear interpolation over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let position = q * (n - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

impl QuartileBaseline {
    /// Fits the baseline. Returns `None` for an empty sample.
    pub fn fit(amounts: &[f64]) -> Option<Self> {
        if amounts.is_empty() {
            return None;
        }
        let mut sorted = amounts.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        Some(Self {
            q1,
            median,
            q3,
            iqr: q3 - q1,
        })
    }

    pub fn median(&self) -> f64 {
        self.median
    }

    /// Tolerance beyond the quartile bounds before an amount counts as
    /// unusual. Tight distributions would otherwise flag routine variation,
    /// so the IQR term is floored both absolutely and relative to the median.
    fn tolerance(&self, config: &AnomalyConfig) -> f64 {
        (config.iqr_multiplier * self.iqr)
            .max(config.absolute_floor)
            .max(self.median.abs() * config.relative_floor)
    }

    /// Baseline signal in [0, 1]. Zero inside the tolerated band; grows with
    /// the excess beyond it, saturating at twice the tolerance past the band.
    pub fn score(&self, amount: f64, config: &AnomalyConfig) -> f64 {
        let tolerance = self.tolerance(config);
        let excess = if amount > self.q3 {
            amount - self.q3 - tolerance
        } else if amount < self.q1 {
            self.q1 - tolerance - amount
        } else {
            return 0.0;
        };
        if excess <= 0.0 {
            return 0.0;
        }
        (excess / (2.0 * tolerance)).min(1.0)
    }

    /// How many times the typical (median) amount the given amount is.
    pub fn spend_ratio(&self, amount: f64) -> f64 {
        if self.median.abs() <= f64::EPSILON {
            return 0.0;
        }
        amount / self.median
    }
}
