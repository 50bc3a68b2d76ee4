//! Anomaly domain models and configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ordinal severity of a flagged transaction.
///
/// Ordered lowest to highest; the ordering is used when summarizing a
/// detection run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalySeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnomalySeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalySeverity::Low => "LOW",
            AnomalySeverity::Medium => "MEDIUM",
            AnomalySeverity::High => "HIGH",
            AnomalySeverity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One flagged transaction. Computed on demand, never persisted by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRecord {
    pub entry_id: String,
    pub category: String,
    pub date: NaiveDate,
    /// Combined score from both signals, in [0, 1].
    pub score: f64,
    pub severity: AnomalySeverity,
    pub explanation: String,
}

/// Detection policy parameters.
///
/// The weights, floors, and cut points are empirical constants carried over
/// from observed behavior, not tuned invariants; override as needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyConfig {
    /// Trailing window of history to inspect, in months.
    pub window_months: u32,
    /// Categories with fewer expense entries than this in the window are
    /// skipped.
    pub min_category_samples: usize,
    /// Weight of the quartile-baseline signal in the combined score.
    pub baseline_weight: f64,
    /// Weight of the multi-feature outlier signal in the combined score.
    pub outlier_weight: f64,
    /// IQR multiplier for the baseline bounds.
    pub iqr_multiplier: f64,
    /// Absolute floor on the baseline tolerance, in account currency units.
    pub absolute_floor: f64,
    /// Relative floor on the baseline tolerance, as a fraction of the median.
    pub relative_floor: f64,
    /// Combined-score cut points, lowest severity first.
    pub low_threshold: f64,
    pub medium_threshold: f64,
    pub high_threshold: f64,
    pub critical_threshold: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            window_months: 6,
            min_category_samples: 12,
            baseline_weight: 0.6,
            outlier_weight: 0.4,
            iqr_multiplier: 1.5,
            absolute_floor: 5.0,
            relative_floor: 0.25,
            low_threshold: 0.25,
            medium_threshold: 0.45,
            high_threshold: 0.65,
            critical_threshold: 0.85,
        }
    }
}
