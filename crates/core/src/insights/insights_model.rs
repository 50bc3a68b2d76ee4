//! Insights domain models and the input snapshot they are derived from.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyRecord, AnomalySeverity};
use crate::entries::Entry;
use crate::forecast::{ForecastResult, TrendLabel};

/// Named health band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthBand {
    Poor,
    Fair,
    Good,
    Excellent,
}

/// Composite financial health score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Score in [0, 100].
    pub score: f64,
    pub band: HealthBand,
    /// Savings rate over the scoring window, clamped to [0, 1].
    pub savings_rate: f64,
}

/// Priority tag shared by opportunities and recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Shape of a saving opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityKind {
    /// High-volume category where a percentage reduction is suggested.
    Reduction,
    /// Many small transactions that could be consolidated.
    Consolidation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingOpportunity {
    pub category: String,
    pub kind: OpportunityKind,
    pub monthly_spend: f64,
    pub transaction_count: usize,
    /// Dollar amount the suggestion would free up if followed.
    pub estimated_saving: f64,
    pub priority: Priority,
}

/// Pass-through trend label for one category (or the overall aggregate).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrend {
    pub category: String,
    pub trend: TrendLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
}

/// Threshold-based warning. Severity reuses the anomaly grading vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub severity: AnomalySeverity,
    pub message: String,
}

/// The full composed output of [`crate::insights::InsightsServiceTrait::get_insights`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct InsightsBundle {
    pub health: Option<HealthScore>,
    pub opportunities: Vec<SavingOpportunity>,
    pub trends: Vec<CategoryTrend>,
    pub recommendations: Vec<Recommendation>,
    pub achievements: Vec<Achievement>,
    pub alerts: Vec<Alert>,
    /// Section names whose upstream input failed. The rest of the bundle is
    /// still valid.
    pub unavailable_sections: Vec<String>,
}

/// Tunable thresholds. Empirical constants, not invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsConfig {
    /// Width of one aggregation window in days ("a month").
    pub window_days: u32,
    /// Windows of history used for trailing averages.
    pub trailing_windows: u32,
    /// Weight of the savings-rate component in the health score.
    pub health_savings_weight: f64,
    /// Weight of the expense-trend component in the health score.
    pub health_trend_weight: f64,
    /// Savings rate that earns full marks on the savings component.
    pub full_marks_savings_rate: f64,
    /// Band cut points on the 0-100 score.
    pub excellent_cutoff: f64,
    pub good_cutoff: f64,
    pub fair_cutoff: f64,
    /// Monthly category spend above which a reduction is suggested.
    pub opportunity_min_monthly_spend: f64,
    /// Monthly category spend above which the suggestion becomes high
    /// priority.
    pub opportunity_high_priority_spend: f64,
    /// Transaction count a category needs before a reduction is suggested.
    pub opportunity_min_transactions: usize,
    /// Fraction of monthly spend suggested as the reduction target.
    pub reduction_target_ratio: f64,
    /// Small-transaction count above which consolidation is suggested.
    pub consolidation_min_count: usize,
    /// Upper bound of a "small" transaction amount.
    pub small_transaction_limit: f64,
    /// Savings rate that earns the saver achievement.
    pub achievement_savings_rate: f64,
    /// Category month spend above this multiple of its trailing average
    /// raises an alert.
    pub alert_spike_ratio: f64,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            trailing_windows: 3,
            health_savings_weight: 0.7,
            health_trend_weight: 0.3,
            full_marks_savings_rate: 0.3,
            excellent_cutoff: 80.0,
            good_cutoff: 60.0,
            fair_cutoff: 40.0,
            opportunity_min_monthly_spend: 200.0,
            opportunity_high_priority_spend: 500.0,
            opportunity_min_transactions: 10,
            reduction_target_ratio: 0.15,
            consolidation_min_count: 15,
            small_transaction_limit: 10.0,
            achievement_savings_rate: 0.2,
            alert_spike_ratio: 1.5,
        }
    }
}

/// Per-category aggregate over one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategorySpend {
    pub total: f64,
    pub transaction_count: usize,
    /// Transactions under the configured small-transaction limit.
    pub small_count: usize,
}

/// Immutable input to every insights section. The bundle is a pure function
/// of this snapshot.
#[derive(Debug, Clone)]
pub struct InsightsSnapshot {
    pub entries: Vec<Entry>,
    pub anomalies: Vec<AnomalyRecord>,
    pub forecasts: Vec<ForecastResult>,
    pub as_of: NaiveDate,
}

impl InsightsSnapshot {
    /// Half-open window `windows_back` windows before `as_of`; 0 is the most
    /// recent window, ending at `as_of` inclusive.
    fn window_bounds(&self, windows_back: u32, window_days: u32) -> (NaiveDate, NaiveDate) {
        let width = Duration::days(i64::from(window_days));
        let end = self.as_of - width * windows_back as i32;
        (end - width, end)
    }

    fn entries_in_window(
        &self,
        windows_back: u32,
        window_days: u32,
    ) -> impl Iterator<Item = &Entry> {
        let (start, end) = self.window_bounds(windows_back, window_days);
        self.entries
            .iter()
            .filter(move |e| e.date > start && e.date <= end)
    }

    pub fn expense_total(&self, windows_back: u32, window_days: u32) -> f64 {
        self.entries_in_window(windows_back, window_days)
            .filter(|e| e.is_expense())
            .map(|e| e.amount.to_f64().unwrap_or(0.0))
            .sum()
    }

    pub fn income_total(&self, windows_back: u32, window_days: u32) -> f64 {
        self.entries_in_window(windows_back, window_days)
            .filter(|e| !e.is_expense())
            .map(|e| e.amount.to_f64().unwrap_or(0.0))
            .sum()
    }

    /// Per-category expense aggregates for one window. Uncategorized entries
    /// are left out; the sections reason about named categories only.
    pub fn category_spend(
        &self,
        windows_back: u32,
        config: &InsightsConfig,
    ) -> BTreeMap<String, CategorySpend> {
        let mut by_category: BTreeMap<String, CategorySpend> = BTreeMap::new();
        for entry in self
            .entries_in_window(windows_back, config.window_days)
            .filter(|e| e.is_expense())
        {
            let Some(category) = entry.category.as_deref() else {
                continue;
            };
            let amount = entry.amount.to_f64().unwrap_or(0.0);
            let spend = by_category.entry(category.to_string()).or_default();
            spend.total += amount;
            spend.transaction_count += 1;
            if amount < config.small_transaction_limit {
                spend.small_count += 1;
            }
        }
        by_category
    }

    /// Savings rate over the most recent window: (income - expenses) / income,
    /// clamped to [0, 1]. Zero income with spending reads as a zero rate;
    /// `None` only when the window is completely empty.
    pub fn savings_rate(&self, window_days: u32) -> Option<f64> {
        let income = self.income_total(0, window_days);
        let expenses = self.expense_total(0, window_days);
        if income <= 0.0 && expenses <= 0.0 {
            return None;
        }
        if income <= 0.0 {
            return Some(0.0);
        }
        Some(((income - expenses) / income).clamp(0.0, 1.0))
    }

    /// Trend label of the overall expense aggregate, when a forecast for it
    /// exists.
    pub fn overall_trend(&self) -> Option<TrendLabel> {
        self.forecasts
            .iter()
            .find(|f| f.category == crate::constants::OVERALL_CATEGORY_ID)
            .map(|f| f.trend)
    }
}
