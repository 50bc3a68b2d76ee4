//! Unsupervised multi-feature outlier signal.
//!
//! Looks at more than the amount: an entry can be anomalous because it lands
//! on an unusual day, at an unfamiliar merchant, or at an odd amount, even
//! when no single feature is extreme on its own. The signal is the mean
//! absolute z-score over the feature set, normalized so that three standard
//! deviations saturate it.

use std::collections::HashMap;

use chrono::Datelike;
use num_traits::ToPrimitive;

use crate::entries::Entry;
use crate::features::normalize_note;

/// Z-scores saturate the signal at this many standard deviations.
const Z_SATURATION: f64 = 3.0;

/// Feature row derived from one entry within the detection window.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierFeatures {
    amount: f64,
    day_of_week: f64,
    day_of_month: f64,
    note_frequency: f64,
}

impl OutlierFeatures {
    fn as_array(&self) -> [f64; 4] {
        [
            self.amount,
            self.day_of_week,
            self.day_of_month,
            self.note_frequency,
        ]
    }
}

/// Per-feature mean/standard-deviation statistics for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiFeatureOutlier {
    means: [f64; 4],
    std_devs: [f64; 4],
}

/// Builds the feature rows for a category's entries. Note frequency is the
/// share of window entries with the same normalized note.
pub fn feature_rows(entries: &[&Entry]) -> Vec<OutlierFeatures> {
    let mut note_counts: HashMap<String, usize> = HashMap::new();
    for entry in entries {
        *note_counts.entry(normalize_note(&entry.note)).or_insert(0) += 1;
    }
    let total = entries.len().max(1) as f64;

    entries
        .iter()
        .map(|entry| {
            let count = note_counts
                .get(&normalize_note(&entry.note))
                .copied()
                .unwrap_or(0);
            OutlierFeatures {
                amount: entry.amount.to_f64().unwrap_or(0.0),
                day_of_week: entry.date.weekday().num_days_from_monday() as f64,
                day_of_month: entry.date.day() as f64,
                note_frequency: count as f64 / total,
            }
        })
        .collect()
}

impl MultiFeatureOutlier {
    /// Fits per-feature statistics. Returns `None` for an empty sample.
    pub fn fit(rows: &[OutlierFeatures]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let n = rows.len() as f64;
        let mut means = [0.0; 4];
        for row in rows {
            for (mean, value) in means.iter_mut().zip(row.as_array()) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n;
        }

        let mut variances = [0.0; 4];
        for row in rows {
            for ((variance, value), mean) in
                variances.iter_mut().zip(row.as_array()).zip(means)
            {
                *variance += (value - mean) * (value - mean);
            }
        }
        let mut std_devs = [0.0; 4];
        for (std_dev, variance) in std_devs.iter_mut().zip(variances) {
            *std_dev = (variance / n).sqrt();
        }

        Some(Self { means, std_devs })
    }

    /// Outlier signal in [0, 1]: mean |z| over the features, divided by the
    /// saturation point. Features with zero variance contribute nothing.
    pub fn score(&self, row: &OutlierFeatures) -> f64 {
        let mut total = 0.0;
        let mut counted = 0usize;
        for ((value, mean), std_dev) in
            row.as_array().iter().zip(self.means).zip(self.std_devs)
        {
            if std_dev <= f64::EPSILON {
                continue;
            }
            total += ((value - mean) / std_dev).abs();
            counted += 1;
        }
        if counted == 0 {
            return 0.0;
        }
        (total / counted as f64 / Z_SATURATION).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryType;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn entry(id: &str, amount: Decimal, day: u32, note: &str) -> Entry {
        Entry {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            entry_type: EntryType::Expense,
            category: Some("groceries".to_string()),
            note: note.to_string(),
            currency: "USD".to_string(),
        }
    }

    #[test]
    fn test_routine_entries_score_low() {
        let entries: Vec<Entry> = (1..=12)
            .map(|i| entry(&format!("e{i}"), dec!(80) + Decimal::from(i % 3), i * 2, "Fresh Mart"))
            .collect();
        let refs: Vec<&Entry> = entries.iter().collect();
        let rows = feature_rows(&refs);
        let model = MultiFeatureOutlier::fit(&rows).unwrap();
        for row in &rows {
            assert!(model.score(row) < 0.6, "routine row scored {}", model.score(row));
        }
    }

    #[test]
    fn test_deviant_amount_scores_higher_than_routine() {
        let mut entries: Vec<Entry> = (1..=12)
            .map(|i| entry(&format!("e{i}"), dec!(80), i * 2, "Fresh Mart"))
            .collect();
        entries.push(entry("spike", dec!(400), 15, "Fancy Boutique"));
        let refs: Vec<&Entry> = entries.iter().collect();
        let rows = feature_rows(&refs);
        let model = MultiFeatureOutlier::fit(&rows).unwrap();

        let routine = model.score(&rows[0]);
        let spike = model.score(rows.last().unwrap());
        assert!(spike > routine);
        assert!((0.0..=1.0).contains(&spike));
    }

    #[test]
    fn test_zero_variance_features_are_skipped() {
        let entries: Vec<Entry> = (1..=5)
            .map(|i| entry(&format!("e{i}"), dec!(80), 10, "Fresh Mart"))
            .collect();
        let refs: Vec<&Entry> = entries.iter().collect();
        let rows = feature_rows(&refs);
        let model = MultiFeatureOutlier::fit(&rows).unwrap();
        assert_eq!(model.score(&rows[0]), 0.0);
    }

    #[test]
    fn test_empty_sample_has_no_model() {
        assert!(MultiFeatureOutlier::fit(&[]).is_none());
    }
}
