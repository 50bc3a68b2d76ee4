//! Insights service: builds the snapshot and composes the sections.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::warn;

use super::insights_model::{CategoryTrend, InsightsBundle, InsightsConfig, InsightsSnapshot};
use super::sections;
use crate::anomaly::AnomalyServiceTrait;
use crate::entries::EntryRepositoryTrait;
use crate::errors::Result;
use crate::forecast::ForecastServiceTrait;

/// Service interface for composed insights.
pub trait InsightsServiceTrait: Send + Sync {
    /// Composes the full insights bundle for one user. Upstream failures
    /// disable individual sections (named in `unavailable_sections`) rather
    /// than failing the whole call.
    fn get_insights(&self, user_id: &str) -> Result<InsightsBundle>;
}

pub struct InsightsService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    anomaly_service: Arc<dyn AnomalyServiceTrait>,
    forecast_service: Arc<dyn ForecastServiceTrait>,
    config: InsightsConfig,
}

impl InsightsService {
    pub fn new(
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        anomaly_service: Arc<dyn AnomalyServiceTrait>,
        forecast_service: Arc<dyn ForecastServiceTrait>,
        config: InsightsConfig,
    ) -> Self {
        Self {
            entry_repository,
            anomaly_service,
            forecast_service,
            config,
        }
    }

    /// Composition with an explicit reference date, used directly by tests.
    pub fn get_insights_as_of(&self, user_id: &str, as_of: NaiveDate) -> Result<InsightsBundle> {
        // Entry history is the root input; without it there is no snapshot.
        let entries = self.entry_repository.get_entries(user_id)?;
        let mut unavailable_sections = Vec::new();

        let anomalies = match self.anomaly_service.detect_anomalies(user_id, None) {
            Ok(anomalies) => anomalies,
            Err(e) => {
                warn!("anomaly input unavailable for insights: {e}");
                unavailable_sections.push("anomalies".to_string());
                Vec::new()
            }
        };
        let forecasts = match self.forecast_service.forecast_all(user_id) {
            Ok(forecasts) => forecasts,
            Err(e) => {
                warn!("forecast input unavailable for insights: {e}");
                unavailable_sections.push("trends".to_string());
                Vec::new()
            }
        };

        let snapshot = InsightsSnapshot {
            entries,
            anomalies,
            forecasts,
            as_of,
        };

        let health = sections::compute_health(&snapshot, &self.config);
        let opportunities = sections::find_opportunities(&snapshot, &self.config);
        let trends: Vec<CategoryTrend> = snapshot
            .forecasts
            .iter()
            .map(|f| CategoryTrend {
                category: f.category.clone(),
                trend: f.trend,
            })
            .collect();
        let recommendations = sections::build_recommendations(&snapshot, health.as_ref());
        let achievements = sections::earned_achievements(&snapshot, &self.config);
        let alerts = sections::raise_alerts(&snapshot, &self.config);

        Ok(InsightsBundle {
            health,
            opportunities,
            trends,
            recommendations,
            achievements,
            alerts,
            unavailable_sections,
        })
    }
}

impl InsightsServiceTrait for InsightsService {
    fn get_insights(&self, user_id: &str) -> Result<InsightsBundle> {
        self.get_insights_as_of(user_id, Utc::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::{AnomalyRecord, AnomalySeverity};
    use crate::entries::{Entry, EntryType};
    use crate::errors::{Error, StoreError};
    use crate::forecast::{ForecastOutcome, ForecastResult, TrendLabel};
    use rust_decimal::Decimal;

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

    struct MockAnomalyService {
        result: Result<Vec<AnomalyRecord>>,
    }

    impl AnomalyServiceTrait for MockAnomalyService {
        fn detect_anomalies(
            &self,
            _user_id: &str,
            _window_months: Option<u32>,
        ) -> Result<Vec<AnomalyRecord>> {
            match &self.result {
                Ok(records) => Ok(records.clone()),
                Err(_) => Err(Error::Store(StoreError::ReadFailed("down".to_string()))),
            }
        }
    }

    struct MockForecastService {
        result: Result<Vec<ForecastResult>>,
    }

    impl ForecastServiceTrait for MockForecastService {
        fn forecast(
            &self,
            _user_id: &str,
            _category: Option<&str>,
            _horizon_periods: Option<usize>,
        ) -> Result<ForecastOutcome> {
            unimplemented!("not used by the insights service")
        }

        fn forecast_all(&self, _user_id: &str) -> Result<Vec<ForecastResult>> {
            match &self.result {
                Ok(results) => Ok(results.clone()),
                Err(_) => Err(Error::Store(StoreError::ReadFailed("down".to_string()))),
            }
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn entry(id: &str, category: &str, amount: i64, entry_type: EntryType) -> Entry {
        Entry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount: Decimal::from(amount),
            date: as_of() - chrono::Duration::days(10),
            entry_type,
            category: Some(category.to_string()),
            note: format!("{category} entry"),
            currency: "USD".to_string(),
        }
    }

    fn base_entries() -> Vec<Entry> {
        vec![
            entry("i", "salary", 5000, EntryType::Income),
            entry("e1", "rent", 1500, EntryType::Expense),
            entry("e2", "groceries", 400, EntryType::Expense),
        ]
    }

    fn critical_anomaly() -> AnomalyRecord {
        AnomalyRecord {
            entry_id: "e2".to_string(),
            category: "groceries".to_string(),
            date: as_of() - chrono::Duration::days(4),
            score: 0.9,
            severity: AnomalySeverity::Critical,
            explanation: "5.0x your typical groceries spend".to_string(),
        }
    }

    fn overall_forecast(trend: TrendLabel) -> ForecastResult {
        ForecastResult {
            category: crate::constants::OVERALL_CATEGORY_ID.to_string(),
            predicted: 1900.0,
            lower: 1700.0,
            upper: 2100.0,
            trend,
            periods_observed: 8,
        }
    }

    fn make_service(
        anomalies: Result<Vec<AnomalyRecord>>,
        forecasts: Result<Vec<ForecastResult>>,
    ) -> InsightsService {
        InsightsService::new(
            Arc::new(MockEntryRepository {
                entries: base_entries(),
            }),
            Arc::new(MockAnomalyService { result: anomalies }),
            Arc::new(MockForecastService { result: forecasts }),
            InsightsConfig::default(),
        )
    }

    #[test]
    fn test_full_bundle_composition() {
        let service = make_service(
            Ok(vec![critical_anomaly()]),
            Ok(vec![overall_forecast(TrendLabel::Stable)]),
        );

        let bundle = service.get_insights_as_of("u1", as_of()).unwrap();
        assert!(bundle.unavailable_sections.is_empty());
        let health = bundle.health.expect("health score");
        assert!((0.0..=100.0).contains(&health.score));
        assert_eq!(bundle.trends.len(), 1);
        assert!(bundle
            .alerts
            .iter()
            .any(|a| a.severity == AnomalySeverity::Critical));
        assert!(!bundle.recommendations.is_empty());
    }

    #[test]
    fn test_failing_anomaly_input_disables_only_that_section() {
        let service = make_service(
            Err(Error::Store(StoreError::ReadFailed("down".to_string()))),
            Ok(vec![overall_forecast(TrendLabel::Stable)]),
        );

        let bundle = service.get_insights_as_of("u1", as_of()).unwrap();
        assert_eq!(bundle.unavailable_sections, vec!["anomalies"]);
        assert!(bundle.health.is_some());
        assert_eq!(bundle.trends.len(), 1);
        assert!(bundle
            .alerts
            .iter()
            .all(|a| a.severity != AnomalySeverity::Critical));
    }

    #[test]
    fn test_failing_forecast_input_disables_trends() {
        let service = make_service(
            Ok(Vec::new()),
            Err(Error::Store(StoreError::ReadFailed("down".to_string()))),
        );

        let bundle = service.get_insights_as_of("u1", as_of()).unwrap();
        assert_eq!(bundle.unavailable_sections, vec!["trends"]);
        assert!(bundle.trends.is_empty());
        assert!(bundle.health.is_some());
    }

    #[test]
    fn test_same_snapshot_yields_identical_bundles() {
        let service = make_service(
            Ok(vec![critical_anomaly()]),
            Ok(vec![overall_forecast(TrendLabel::Increasing)]),
        );

        let first = service.get_insights_as_of("u1", as_of()).unwrap();
        let second = service.get_insights_as_of("u1", as_of()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_user_yields_an_empty_bundle() {
        let service = make_service(Ok(Vec::new()), Ok(Vec::new()));

        let bundle = service.get_insights_as_of("nobody", as_of()).unwrap();
        assert!(bundle.health.is_none());
        assert!(bundle.opportunities.is_empty());
        assert!(bundle.alerts.is_empty());
        assert!(bundle.achievements.is_empty());
    }
}
