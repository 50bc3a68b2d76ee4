//! Achievements section: positive reinforcement rules.

use crate::insights::insights_model::{Achievement, InsightsConfig, InsightsSnapshot};

/// Earned achievements for the current snapshot. Rules fire independently;
/// output order follows the rule order.
pub fn earned_achievements(
    snapshot: &InsightsSnapshot,
    config: &InsightsConfig,
) -> Vec<Achievement> {
    let mut achievements = Vec::new();

    if let Some(rate) = snapshot.savings_rate(config.window_days) {
        if rate >= config.achievement_savings_rate {
            achievements.push(Achievement {
                title: "Strong saver".to_string(),
                description: format!(
                    "You saved {:.0}% of your income this month.",
                    rate * 100.0
                ),
            });
        }
    }

    // Spending down two windows in a row.
    let current = snapshot.expense_total(0, config.window_days);
    let previous = snapshot.expense_total(1, config.window_days);
    let before_that = snapshot.expense_total(2, config.window_days);
    if before_that > 0.0 && previous < before_that && current < previous {
        achievements.push(Achievement {
            title: "Trending lean".to_string(),
            description: "Your spending has gone down two months in a row.".to_string(),
        });
    }

    achievements
}
