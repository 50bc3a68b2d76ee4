//! Health score section.
//!
//! Weighted combination of the savings rate and the overall expense-trend
//! direction, mapped onto 0-100 and a named band. A falling expense trend is
//! good news; a rising one costs points.

use crate::forecast::TrendLabel;
use crate::insights::insights_model::{HealthBand, HealthScore, InsightsConfig, InsightsSnapshot};

/// Trend component values: how the direction of overall spending reads on a
/// 0-1 scale.
fn trend_component(trend: Option<TrendLabel>) -> f64 {
    match trend {
        Some(TrendLabel::Decreasing) => 1.0,
        Some(TrendLabel::Increasing) => 0.2,
        // Stable, or no forecast to judge by.
        _ => 0.6,
    }
}

fn band_for_score(score: f64, config: &InsightsConfig) -> HealthBand {
    if score >= config.excellent_cutoff {
        HealthBand::Excellent
    } else if score >= config.good_cutoff {
        HealthBand::Good
    } else if score >= config.fair_cutoff {
        HealthBand::Fair
    } else {
        HealthBand::Poor
    }
}

/// Computes the health score, or `None` when the scoring window holds no
/// activity at all.
pub fn compute_health(snapshot: &InsightsSnapshot, config: &InsightsConfig) -> Option<HealthScore> {
    let savings_rate = snapshot.savings_rate(config.window_days)?;
    let savings_component = (savings_rate / config.full_marks_savings_rate).clamp(0.0, 1.0);
    let trend = trend_component(snapshot.overall_trend());

    let weight_total = config.health_savings_weight + config.health_trend_weight;
    if weight_total <= f64::EPSILON {
        return None;
    }
    let score = 100.0
        * (config.health_savings_weight * savings_component + config.health_trend_weight * trend)
        / weight_total;

    Some(HealthScore {
        score,
        band: band_for_score(score, config),
        savings_rate,
    })
}
