//! Scoring policy: combines the two signals into one graded severity.

use super::anomaly_model::{AnomalyConfig, AnomalySeverity};

/// Weighted combination of the baseline and outlier signals, clamped to
/// [0, 1]. Both inputs are expected to already be in [0, 1].
pub fn combine_scores(baseline: f64, outlier: f64, config: &AnomalyConfig) -> f64 {
    let total_weight = config.baseline_weight + config.outlier_weight;
    if total_weight <= f64::EPSILON {
        return 0.0;
    }
    ((config.baseline_weight * baseline + config.outlier_weight * outlier) / total_weight)
        .clamp(0.0, 1.0)
}

/// Maps a combined score onto a severity. Scores below the low cut point are
/// not anomalies at all.
pub fn severity_for_score(score: f64, config: &AnomalyConfig) -> Option<AnomalySeverity> {
    if score >= config.critical_threshold {
        Some(AnomalySeverity::Critical)
    } else if score >= config.high_threshold {
        Some(AnomalySeverity::High)
    } else if score >= config.medium_threshold {
        Some(AnomalySeverity::Medium)
    } else if score >= config.low_threshold {
        Some(AnomalySeverity::Low)
    } else {
        None
    }
}
