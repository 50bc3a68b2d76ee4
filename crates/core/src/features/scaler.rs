//! Min/max scaling for the numeric features.

use serde::{Deserialize, Serialize};

/// Min/max scaler fitted on training amounts.
///
/// Day-of-week and day-of-month have fixed ranges, so only the amount needs
/// fitted bounds. Out-of-range amounts at inference are clamped to [0, 1]
/// rather than extrapolated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NumericScaler {
    amount_min: f64,
    amount_max: f64,
}

impl NumericScaler {
    pub fn fit(amounts: &[f64]) -> Self {
        let mut amount_min = f64::INFINITY;
        let mut amount_max = f64::NEG_INFINITY;
        for &amount in amounts {
            amount_min = amount_min.min(amount);
            amount_max = amount_max.max(amount);
        }
        if !amount_min.is_finite() || !amount_max.is_finite() {
            amount_min = 0.0;
            amount_max = 0.0;
        }
        Self {
            amount_min,
            amount_max,
        }
    }

    pub fn scale_amount(&self, amount: f64) -> f64 {
        let span = self.amount_max - self.amount_min;
        if span <= f64::EPSILON {
            return 0.5;
        }
        ((amount - self.amount_min) / span).clamp(0.0, 1.0)
    }

    /// Monday = 0 maps to 0.0, Sunday = 6 maps to 1.0.
    pub fn scale_day_of_week(day: u32) -> f64 {
        (day.min(6) as f64) / 6.0
    }

    /// Day 1 maps to 0.0, day 31 maps to 1.0.
    pub fn scale_day_of_month(day: u32) -> f64 {
        ((day.clamp(1, 31) - 1) as f64) / 30.0
    }
}
