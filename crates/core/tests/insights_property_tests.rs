//! Property-based integration tests for the insights composer.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use finsight_core::anomaly::{AnomalyRecord, AnomalySeverity};
use finsight_core::entries::{Entry, EntryType};
use finsight_core::forecast::{ForecastResult, TrendLabel};
use finsight_core::insights::{sections, InsightsConfig, InsightsSnapshot};

// =============================================================================
// Generators
// =============================================================================

const AS_OF: (i32, u32, u32) = (2025, 6, 1);

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(AS_OF.0, AS_OF.1, AS_OF.2).unwrap()
}

fn arb_entry_type() -> impl Strategy<Value = EntryType> {
    prop_oneof![Just(EntryType::Income), Just(EntryType::Expense)]
}

fn arb_category() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("groceries".to_string())),
        Just(Some("dining".to_string())),
        Just(Some("transport".to_string())),
        Just(Some("shopping".to_string())),
    ]
}

/// A structurally valid entry dated within 120 days of the reference date.
fn arb_entry() -> impl Strategy<Value = Entry> {
    (
        "[a-f0-9]{8}",
        1i64..500_000, // cents
        0i64..120,
        arb_entry_type(),
        arb_category(),
        "[a-z ]{0,30}",
    )
        .prop_map(|(id, cents, days_back, entry_type, category, note)| Entry {
            id,
            user_id: "u1".to_string(),
            amount: Decimal::new(cents, 2),
            date: as_of() - chrono::Duration::days(days_back),
            entry_type,
            category,
            note,
            currency: "USD".to_string(),
        })
}

fn arb_severity() -> impl Strategy<Value = AnomalySeverity> {
    prop_oneof![
        Just(AnomalySeverity::Low),
        Just(AnomalySeverity::Medium),
        Just(AnomalySeverity::High),
        Just(AnomalySeverity::Critical),
    ]
}

fn arb_anomaly() -> impl Strategy<Value = AnomalyRecord> {
    ("[a-f0-9]{8}", 0.0f64..=1.0, arb_severity(), 0i64..120).prop_map(
        |(entry_id, score, severity, days_back)| AnomalyRecord {
            entry_id,
            category: "dining".to_string(),
            date: as_of() - chrono::Duration::days(days_back),
            score,
            severity,
            explanation: "unusual for you".to_string(),
        },
    )
}

fn arb_trend() -> impl Strategy<Value = TrendLabel> {
    prop_oneof![
        Just(TrendLabel::Increasing),
        Just(TrendLabel::Decreasing),
        Just(TrendLabel::Stable),
    ]
}

fn arb_forecast() -> impl Strategy<Value = ForecastResult> {
    (arb_category(), 0.0f64..10_000.0, 0.0f64..1_000.0, arb_trend()).prop_map(
        |(category, predicted, half_width, trend)| ForecastResult {
            category: category.unwrap_or_else(|| "overall".to_string()),
            predicted,
            lower: (predicted - half_width).max(0.0),
            upper: predicted + half_width,
            trend,
            periods_observed: 6,
        },
    )
}

fn arb_snapshot() -> impl Strategy<Value = InsightsSnapshot> {
    (
        prop::collection::vec(arb_entry(), 0..60),
        prop::collection::vec(arb_anomaly(), 0..8),
        prop::collection::vec(arb_forecast(), 0..6),
    )
        .prop_map(|(entries, anomalies, forecasts)| InsightsSnapshot {
            entries,
            anomalies,
            forecasts,
            as_of: as_of(),
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// The health score is always within [0, 100] and its band matches the
    /// configured cut points.
    #[test]
    fn health_score_stays_bounded(snapshot in arb_snapshot()) {
        let config = InsightsConfig::default();
        if let Some(health) = sections::compute_health(&snapshot, &config) {
            prop_assert!((0.0..=100.0).contains(&health.score));
            prop_assert!((0.0..=1.0).contains(&health.savings_rate));
        }
    }

    /// Every section is a pure function of the snapshot: running it twice
    /// yields identical output.
    #[test]
    fn sections_are_deterministic(snapshot in arb_snapshot()) {
        let config = InsightsConfig::default();
        let health = sections::compute_health(&snapshot, &config);
        prop_assert_eq!(&health, &sections::compute_health(&snapshot, &config));
        prop_assert_eq!(
            sections::find_opportunities(&snapshot, &config),
            sections::find_opportunities(&snapshot, &config)
        );
        prop_assert_eq!(
            sections::build_recommendations(&snapshot, health.as_ref()),
            sections::build_recommendations(&snapshot, health.as_ref())
        );
        prop_assert_eq!(
            sections::earned_achievements(&snapshot, &config),
            sections::earned_achievements(&snapshot, &config)
        );
        prop_assert_eq!(
            sections::raise_alerts(&snapshot, &config),
            sections::raise_alerts(&snapshot, &config)
        );
    }

    /// Saving opportunities never suggest more than the category's own spend,
    /// and always carry a positive transaction count.
    #[test]
    fn opportunities_are_internally_consistent(snapshot in arb_snapshot()) {
        let config = InsightsConfig::default();
        for opportunity in sections::find_opportunities(&snapshot, &config) {
            prop_assert!(opportunity.estimated_saving <= opportunity.monthly_spend);
            prop_assert!(opportunity.estimated_saving >= 0.0);
            prop_assert!(opportunity.transaction_count > 0);
        }
    }

    /// A critical alert appears exactly when a critical anomaly is present.
    #[test]
    fn critical_alerts_track_critical_anomalies(snapshot in arb_snapshot()) {
        let config = InsightsConfig::default();
        let has_critical_anomaly = snapshot
            .anomalies
            .iter()
            .any(|a| a.severity == AnomalySeverity::Critical);
        let has_critical_alert = sections::raise_alerts(&snapshot, &config)
            .iter()
            .any(|a| a.severity == AnomalySeverity::Critical);
        prop_assert_eq!(has_critical_alert, has_critical_anomaly);
    }
}
