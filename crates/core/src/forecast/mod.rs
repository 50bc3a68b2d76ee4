//! Forecast module - spending trend estimation per category and overall.
//!
//! Aggregates expense history into fixed-width weekly buckets, fits a least
//! squares line over the bucket totals, and projects it forward with a 95%
//! interval. Short histories are an expected outcome, not an error.

mod forecast_model;
mod forecast_service;
mod regression;

pub use forecast_model::{ForecastConfig, ForecastOutcome, ForecastResult, TrendLabel};
pub use forecast_service::{ForecastService, ForecastServiceTrait};
pub use regression::{bucket_totals, trend_label, LinearTrend};
