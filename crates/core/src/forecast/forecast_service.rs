//! Forecast service: per-category and overall expense projections.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use super::forecast_model::{ForecastConfig, ForecastOutcome, ForecastResult};
use super::regression::{bucket_totals, trend_label, LinearTrend};
use crate::constants::OVERALL_CATEGORY_ID;
use crate::entries::{Entry, EntryRepositoryTrait};
use crate::errors::{InsufficientData, Result};

/// Service interface for spending forecasts.
pub trait ForecastServiceTrait: Send + Sync {
    /// Projects spending `horizon_periods` buckets ahead for one category, or
    /// for the overall expense aggregate when `category` is `None`.
    fn forecast(
        &self,
        user_id: &str,
        category: Option<&str>,
        horizon_periods: Option<usize>,
    ) -> Result<ForecastOutcome>;

    /// Forecasts every category with enough history, plus the overall
    /// aggregate, at the default horizon. Categories with too little history
    /// are silently left out.
    fn forecast_all(&self, user_id: &str) -> Result<Vec<ForecastResult>>;
}

pub struct ForecastService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    config: ForecastConfig,
}

impl ForecastService {
    pub fn new(entry_repository: Arc<dyn EntryRepositoryTrait>, config: ForecastConfig) -> Self {
        Self {
            entry_repository,
            config,
        }
    }

    /// Fits and projects one bucket series. `None` when the series is too
    /// short for the configured minimum.
    fn project(&self, label: &str, entries: &[&Entry], horizon: usize) -> Option<ForecastResult> {
        let totals = bucket_totals(entries, self.config.bucket_days);
        if totals.len() < self.config.min_buckets {
            debug!(
                "not forecasting {label}: {} buckets, {} required",
                totals.len(),
                self.config.min_buckets
            );
            return None;
        }
        let trend = LinearTrend::fit(&totals)?;
        let mean = totals.iter().sum::<f64>() / totals.len() as f64;

        let target = (totals.len() - 1 + horizon.max(1)) as f64;
        let point = trend.predict(target);
        let half_width = self.config.confidence_z * trend.residual_std();

        Some(ForecastResult {
            category: label.to_string(),
            predicted: point.max(0.0),
            lower: (point - half_width).max(0.0),
            upper: point + half_width,
            trend: trend_label(trend.slope(), mean, self.config.trend_threshold),
            periods_observed: trend.observations(),
        })
    }

    fn expenses_for<'a>(&self, entries: &'a [Entry], category: Option<&str>) -> Vec<&'a Entry> {
        entries
            .iter()
            .filter(|e| e.is_expense())
            .filter(|e| match category {
                Some(wanted) => e.category.as_deref() == Some(wanted),
                None => true,
            })
            .collect()
    }
}

impl ForecastServiceTrait for ForecastService {
    fn forecast(
        &self,
        user_id: &str,
        category: Option<&str>,
        horizon_periods: Option<usize>,
    ) -> Result<ForecastOutcome> {
        let entries = self.entry_repository.get_entries(user_id)?;
        let selected = self.expenses_for(&entries, category);
        let label = category.unwrap_or(OVERALL_CATEGORY_ID);
        let horizon = horizon_periods.unwrap_or(self.config.default_horizon);

        match self.project(label, &selected, horizon) {
            Some(result) => Ok(ForecastOutcome::Forecast(result)),
            None => Ok(ForecastOutcome::InsufficientData(InsufficientData::new(
                format!(
                    "fewer than {} periods of expense history for {label}",
                    self.config.min_buckets
                ),
            ))),
        }
    }

    fn forecast_all(&self, user_id: &str) -> Result<Vec<ForecastResult>> {
        let entries = self.entry_repository.get_entries(user_id)?;
        let horizon = self.config.default_horizon;

        let mut by_category: BTreeMap<&str, Vec<&Entry>> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.is_expense()) {
            if let Some(category) = entry.category.as_deref() {
                by_category.entry(category).or_default().push(entry);
            }
        }

        let mut results = Vec::new();
        for (category, group) in &by_category {
            if let Some(result) = self.project(category, group, horizon) {
                results.push(result);
            }
        }
        let all_expenses = self.expenses_for(&entries, None);
        if let Some(overall) = self.project(OVERALL_CATEGORY_ID, &all_expenses, horizon) {
            results.push(overall);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryType;
    use crate::forecast::TrendLabel;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    struct MockEntryRepository {
        entries: Vec<Entry>,
    }

    impl EntryRepositoryTrait for MockEntryRepository {
        fn get_entries(&self, user_id: &str) -> Result<Vec<Entry>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| e.user_id == user_id)
                .cloned()
                .collect())
        }

        fn get_entries_in_range(
            &self,
            user_id: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<Entry>> {
            Ok(self
                .entries
                .iter()
                .filter(|e| e.user_id == user_id && e.date >= start && e.date <= end)
                .cloned()
                .collect())
        }
    }

    fn entry(id: &str, category: &str, amount: Decimal, week: u32) -> Entry {
        Entry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .checked_add_days(chrono::Days::new(u64::from(week) * 7))
                .unwrap(),
            entry_type: EntryType::Expense,
            category: Some(category.to_string()),
            note: format!("{category} purchase"),
            currency: "USD".to_string(),
        }
    }

    fn make_service(entries: Vec<Entry>) -> ForecastService {
        ForecastService::new(
            Arc::new(MockEntryRepository { entries }),
            ForecastConfig::default(),
        )
    }

    #[test]
    fn test_sustained_growth_is_labeled_increasing() {
        // Roughly +10% per week over four weeks.
        let entries = vec![
            entry("w0", "dining", dec!(100), 0),
            entry("w1", "dining", dec!(110), 1),
            entry("w2", "dining", dec!(121), 2),
            entry("w3", "dining", dec!(133), 3),
        ];
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("dining"), None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert_eq!(result.trend, TrendLabel::Increasing);
        assert_eq!(result.periods_observed, 4);
        assert!(result.predicted > 133.0);
        assert!(result.lower <= result.predicted && result.predicted <= result.upper);
    }

    #[test]
    fn test_sustained_decline_is_labeled_decreasing() {
        let entries = vec![
            entry("w0", "dining", dec!(133), 0),
            entry("w1", "dining", dec!(121), 1),
            entry("w2", "dining", dec!(110), 2),
            entry("w3", "dining", dec!(100), 3),
        ];
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("dining"), None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert_eq!(result.trend, TrendLabel::Decreasing);
    }

    #[test]
    fn test_flat_series_is_labeled_stable() {
        let entries = vec![
            entry("w0", "groceries", dec!(100), 0),
            entry("w1", "groceries", dec!(101), 1),
            entry("w2", "groceries", dec!(100), 2),
            entry("w3", "groceries", dec!(99), 3),
        ];
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("groceries"), None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert_eq!(result.trend, TrendLabel::Stable);
    }

    #[test]
    fn test_short_history_is_insufficient_data() {
        let entries = vec![
            entry("w0", "dining", dec!(100), 0),
            entry("w1", "dining", dec!(110), 1),
            entry("w2", "dining", dec!(121), 2),
        ];
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("dining"), None).unwrap();
        assert!(matches!(outcome, ForecastOutcome::InsufficientData(_)));
    }

    #[test]
    fn test_lower_bound_never_goes_negative() {
        // Noisy series with a steep downward fit.
        let entries = vec![
            entry("w0", "misc", dec!(400), 0),
            entry("w1", "misc", dec!(5), 1),
            entry("w2", "misc", dec!(300), 2),
            entry("w3", "misc", dec!(2), 3),
        ];
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("misc"), None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert!(result.lower >= 0.0);
        assert!(result.predicted >= 0.0);
    }

    #[test]
    fn test_overall_aggregates_across_categories() {
        let mut entries = Vec::new();
        for week in 0..4 {
            entries.push(entry(&format!("a{week}"), "groceries", dec!(50), week));
            entries.push(entry(&format!("b{week}"), "transport", dec!(30), week));
        }
        let service = make_service(entries);

        let outcome = service.forecast("u1", None, None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert_eq!(result.category, OVERALL_CATEGORY_ID);
        assert_eq!(result.trend, TrendLabel::Stable);
        assert!((result.predicted - 80.0).abs() < 1e-6);
    }

    #[test]
    fn test_income_is_excluded_from_expense_forecasts() {
        let mut entries = vec![
            entry("w0", "groceries", dec!(80), 0),
            entry("w1", "groceries", dec!(80), 1),
            entry("w2", "groceries", dec!(80), 2),
            entry("w3", "groceries", dec!(80), 3),
        ];
        entries.push(Entry {
            id: "salary".to_string(),
            user_id: "u1".to_string(),
            amount: dec!(5000),
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            entry_type: EntryType::Income,
            category: Some("groceries".to_string()),
            note: "payroll".to_string(),
            currency: "USD".to_string(),
        });
        let service = make_service(entries);

        let outcome = service.forecast("u1", Some("groceries"), None).unwrap();
        let ForecastOutcome::Forecast(result) = outcome else {
            panic!("expected a forecast, got {outcome:?}");
        };
        assert!((result.predicted - 80.0).abs() < 1e-6);
    }

    #[test]
    fn test_forecast_all_includes_overall_and_skips_thin_categories() {
        let mut entries = Vec::new();
        for week in 0..4 {
            entries.push(entry(&format!("a{week}"), "groceries", dec!(50), week));
        }
        // Only two weeks of dining: skipped on its own, folded into overall.
        entries.push(entry("d0", "dining", dec!(20), 0));
        entries.push(entry("d1", "dining", dec!(20), 1));
        let service = make_service(entries);

        let results = service.forecast_all("u1").unwrap();
        let categories: Vec<&str> = results.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["groceries", OVERALL_CATEGORY_ID]);
    }
}
