//! Alerts section: threshold-based warnings over the current window.

use crate::anomaly::AnomalySeverity;
use crate::insights::insights_model::{Alert, InsightsConfig, InsightsSnapshot};

/// Raises alerts for overspending, per-category spikes against the trailing
/// average, and critical anomalies. Category alerts come out in category
/// order.
pub fn raise_alerts(snapshot: &InsightsSnapshot, config: &InsightsConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();

    let income = snapshot.income_total(0, config.window_days);
    let expenses = snapshot.expense_total(0, config.window_days);
    if expenses > 0.0 && expenses > income {
        alerts.push(Alert {
            severity: AnomalySeverity::High,
            message: format!(
                "You spent {expenses:.2} against {income:.2} of income this month."
            ),
        });
    }

    // Category spend vs its trailing average over the preceding windows.
    let current = snapshot.category_spend(0, config);
    for (category, spend) in &current {
        let mut trailing_total = 0.0;
        for back in 1..=config.trailing_windows {
            if let Some(past) = snapshot.category_spend(back, config).get(category.as_str()) {
                trailing_total += past.total;
            }
        }
        let trailing_average = trailing_total / f64::from(config.trailing_windows.max(1));
        if trailing_average > 0.0 && spend.total > config.alert_spike_ratio * trailing_average {
            alerts.push(Alert {
                severity: AnomalySeverity::Medium,
                message: format!(
                    "{category} spending is {:.1}x its usual monthly level.",
                    spend.total / trailing_average
                ),
            });
        }
    }

    let critical_count = snapshot
        .anomalies
        .iter()
        .filter(|a| a.severity == AnomalySeverity::Critical)
        .count();
    if critical_count > 0 {
        alerts.push(Alert {
            severity: AnomalySeverity::Critical,
            message: format!(
                "{critical_count} transaction(s) look highly unusual for you. \
                 Review them to make sure nothing is wrong."
            ),
        });
    }

    alerts
}
