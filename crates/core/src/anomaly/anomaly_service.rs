//! Anomaly detection service.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use log::debug;
use num_traits::ToPrimitive;

use super::anomaly_model::{AnomalyConfig, AnomalyRecord};
use super::baseline::QuartileBaseline;
use super::outlier::{feature_rows, MultiFeatureOutlier};
use super::scoring::{combine_scores, severity_for_score};
use crate::entries::{Entry, EntryRepositoryTrait};
use crate::errors::Result;

/// Service interface for anomaly detection.
pub trait AnomalyServiceTrait: Send + Sync {
    /// Detects anomalies in the user's trailing spending window. The window
    /// length defaults to the configured value when not given.
    fn detect_anomalies(
        &self,
        user_id: &str,
        window_months: Option<u32>,
    ) -> Result<Vec<AnomalyRecord>>;
}

pub struct AnomalyService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    config: AnomalyConfig,
}

impl AnomalyService {
    pub fn new(entry_repository: Arc<dyn EntryRepositoryTrait>, config: AnomalyConfig) -> Self {
        Self {
            entry_repository,
            config,
        }
    }

    fn explanation(baseline: &QuartileBaseline, entry: &Entry) -> String {
        let amount = entry.amount.to_f64().unwrap_or(0.0);
        let ratio = baseline.spend_ratio(amount);
        let category = entry.category.as_deref().unwrap_or("this category");
        if ratio >= 1.5 {
            format!("{ratio:.1}x your typical {category} spend")
        } else if ratio > 0.0 && ratio <= 0.5 {
            format!(
                "Unusually small for {category} (typical is {:.2})",
                baseline.median()
            )
        } else {
            format!("Unusual combination of amount, timing, and merchant for {category}")
        }
    }

    /// Detection with an explicit reference date, used directly by tests.
    pub fn detect_as_of(
        &self,
        user_id: &str,
        window_months: Option<u32>,
        as_of: NaiveDate,
    ) -> Result<Vec<AnomalyRecord>> {
        let months = window_months.unwrap_or(self.config.window_months);
        let start = as_of
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        let entries = self
            .entry_repository
            .get_entries_in_range(user_id, start, as_of)?;

        // Group categorized expenses; BTreeMap keeps category order stable.
        let mut by_category: BTreeMap<&str, Vec<&Entry>> = BTreeMap::new();
        for entry in entries.iter().filter(|e| e.is_expense()) {
            if let Some(category) = entry.category.as_deref() {
                by_category.entry(category).or_default().push(entry);
            }
        }

        let mut records = Vec::new();
        for (category, group) in by_category {
            if group.len() < self.config.min_category_samples {
                // Normal outcome: not enough history to judge this category.
                debug!(
                    "skipping anomaly detection for category {category}: \
                     {} entries, {} required",
                    group.len(),
                    self.config.min_category_samples
                );
                continue;
            }

            let amounts: Vec<f64> = group
                .iter()
                .map(|e| e.amount.to_f64().unwrap_or(0.0))
                .collect();
            let Some(baseline) = QuartileBaseline::fit(&amounts) else {
                continue;
            };
            let rows = feature_rows(&group);
            let Some(outlier) = MultiFeatureOutlier::fit(&rows) else {
                continue;
            };

            for (entry, row) in group.iter().zip(&rows) {
                let amount = entry.amount.to_f64().unwrap_or(0.0);
                let score = combine_scores(
                    baseline.score(amount, &self.config),
                    outlier.score(row),
                    &self.config,
                );
                let Some(severity) = severity_for_score(score, &self.config) else {
                    continue;
                };
                records.push(AnomalyRecord {
                    entry_id: entry.id.clone(),
                    category: category.to_string(),
                    date: entry.date,
                    score,
                    severity,
                    explanation: Self::explanation(&baseline, entry),
                });
            }
        }

        records.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.category.cmp(&b.category))
                .then_with(|| a.entry_id.cmp(&b.entry_id))
        });
        Ok(records)
    }
}

impl AnomalyServiceTrait for AnomalyService {
    fn detect_anomalies(
        &self,
        user_id: &str,
        window_months: Option<u32>,
    ) -> Result<Vec<AnomalyRecord>> {
        self.detect_as_of(user_id, window_months, Utc::now().date_naive())
    }
}
