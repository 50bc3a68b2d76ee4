//! Recommendations section.
//!
//! A fixed, ordered decision table keyed on health band, overall expense
//! trend, and anomaly presence. No free text generation: every message in
//! the output comes from this table.

use crate::anomaly::AnomalySeverity;
use crate::forecast::TrendLabel;
use crate::insights::insights_model::{
    HealthBand, HealthScore, InsightsSnapshot, Priority, Recommendation,
};

fn recommendation(priority: Priority, message: &str) -> Recommendation {
    Recommendation {
        priority,
        message: message.to_string(),
    }
}

/// Walks the decision table top to bottom. Output order follows the table,
/// which puts high priorities first.
pub fn build_recommendations(
    snapshot: &InsightsSnapshot,
    health: Option<&HealthScore>,
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();
    let band = health.map(|h| h.band);
    let trend = snapshot.overall_trend();
    let serious_anomalies = snapshot
        .anomalies
        .iter()
        .filter(|a| a.severity >= AnomalySeverity::High)
        .count();

    if band == Some(HealthBand::Poor) {
        recommendations.push(recommendation(
            Priority::High,
            "Spending is outpacing income. Review your largest expense categories \
             and set a monthly budget.",
        ));
    }
    if serious_anomalies > 0 {
        recommendations.push(recommendation(
            Priority::High,
            "Some recent transactions look unusual for you. Review the flagged \
             entries to confirm they are expected.",
        ));
    }
    if trend == Some(TrendLabel::Increasing) {
        recommendations.push(recommendation(
            Priority::Medium,
            "Overall spending has been trending upward. Revisit recurring costs \
             and subscriptions.",
        ));
    }
    if band == Some(HealthBand::Fair) {
        recommendations.push(recommendation(
            Priority::Medium,
            "You are close to a comfortable savings rate. Nudging it toward 20% \
             would move you into good shape.",
        ));
    }
    if matches!(band, Some(HealthBand::Good | HealthBand::Excellent))
        && serious_anomalies == 0
        && trend != Some(TrendLabel::Increasing)
    {
        recommendations.push(recommendation(
            Priority::Low,
            "Your finances look steady. Keep the current plan going.",
        ));
    }

    recommendations
}
