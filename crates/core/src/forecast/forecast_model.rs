//! Forecast domain models.

use serde::{Deserialize, Serialize};

use crate::errors::InsufficientData;

/// Direction of the fitted spending trend, judged relative to the mean
/// bucket total so that a $2/week drift means something different for a
/// $20 category than for a $2000 one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    Stable,
}

/// A projection for one category (or the overall aggregate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Category name, or [`crate::constants::OVERALL_CATEGORY_ID`] for the
    /// all-expenses aggregate.
    pub category: String,
    /// Point forecast for the requested period, never negative.
    pub predicted: f64,
    /// Lower bound of the 95% interval, clamped at zero.
    pub lower: f64,
    /// Upper bound of the 95% interval.
    pub upper: f64,
    pub trend: TrendLabel,
    /// Number of buckets the line was fitted over.
    pub periods_observed: usize,
}

/// Outcome of a forecast request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum ForecastOutcome {
    Forecast(ForecastResult),
    /// Fewer usable periods than the configured minimum.
    InsufficientData(InsufficientData),
}

/// Tunable forecast parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastConfig {
    /// Width of one aggregation bucket in days.
    pub bucket_days: u32,
    /// Minimum number of buckets required before fitting a line.
    pub min_buckets: usize,
    /// Relative slope (per period, against the mean bucket total) beyond
    /// which the trend stops being "stable".
    pub trend_threshold: f64,
    /// Interval half-width in residual standard deviations.
    pub confidence_z: f64,
    /// Periods ahead to project when the caller does not specify one.
    pub default_horizon: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            bucket_days: 7,
            min_buckets: 4,
            trend_threshold: 0.05,
            confidence_z: 1.96,
            default_horizon: 1,
        }
    }
}
