//! The fitted feature pipeline: text + numeric + historical-frequency features.

use std::collections::HashMap;

use chrono::Datelike;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::scaler::NumericScaler;
use super::vectorizer::{normalize_note, TextVectorizer};
use crate::entries::Entry;

/// Version of the feature vector schema.
///
/// Bumped whenever the layout or semantics of the produced vector change.
/// Persisted alongside the model and enforced at load time: a mismatch means
/// the stored classifier was trained against a different fitting and must not
/// be used for inference.
pub const FEATURE_SCHEMA_VERSION: u32 = 1;

/// How often each normalized note key appeared in the training history.
///
/// The derived feature is ln(1 + count) scaled by the largest observed count,
/// i.e. "how routine is this merchant for this user" in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteFrequencyTable {
    counts: HashMap<String, u32>,
    max_log_count: f64,
}

impl NoteFrequencyTable {
    pub fn fit(notes: &[&str]) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for note in notes {
            let key = normalize_note(note);
            if key.is_empty() {
                continue;
            }
            *counts.entry(key).or_insert(0) += 1;
        }
        let max_log_count = counts
            .values()
            .map(|&c| (1.0 + c as f64).ln())
            .fold(0.0, f64::max);
        Self {
            counts,
            max_log_count,
        }
    }

    pub fn frequency(&self, note: &str) -> f64 {
        if self.max_log_count <= f64::EPSILON {
            return 0.0;
        }
        let count = self
            .counts
            .get(&normalize_note(note))
            .copied()
            .unwrap_or(0);
        (1.0 + count as f64).ln() / self.max_log_count
    }
}

/// Fitted feature pipeline, serialized as part of the model blob.
///
/// Layout of the produced vector (fixed once fitted):
/// `[text weights (vectorizer width)..., amount, day_of_week, day_of_month, note_frequency]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeaturePipeline {
    pub schema_version: u32,
    vectorizer: TextVectorizer,
    scaler: NumericScaler,
    note_table: NoteFrequencyTable,
}

/// Number of numeric features appended after the text section.
const NUMERIC_FEATURES: usize = 4;

impl FeaturePipeline {
    /// Fits the vectorizer, scaler, and note table on training entries.
    pub fn fit(entries: &[Entry], max_vocabulary: usize) -> Self {
        let notes: Vec<&str> = entries.iter().map(|e| e.note.as_str()).collect();
        let amounts: Vec<f64> = entries
            .iter()
            .map(|e| e.amount.to_f64().unwrap_or(0.0))
            .collect();

        let mut vectorizer = TextVectorizer::new(max_vocabulary);
        vectorizer.fit(&notes);

        Self {
            schema_version: FEATURE_SCHEMA_VERSION,
            vectorizer,
            scaler: NumericScaler::fit(&amounts),
            note_table: NoteFrequencyTable::fit(&notes),
        }
    }

    /// Width of the produced feature vector.
    pub fn width(&self) -> usize {
        self.vectorizer.width() + NUMERIC_FEATURES
    }

    /// Transforms one entry into the fixed-schema feature vector.
    pub fn transform(&self, entry: &Entry) -> Vec<f64> {
        let mut features = self.vectorizer.transform(&entry.note);
        features.reserve(NUMERIC_FEATURES);
        features.push(
            self.scaler
                .scale_amount(entry.amount.to_f64().unwrap_or(0.0)),
        );
        features.push(NumericScaler::scale_day_of_week(
            entry.date.weekday().num_days_from_monday(),
        ));
        features.push(NumericScaler::scale_day_of_month(entry.date.day()));
        features.push(self.note_table.frequency(&entry.note));
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::EntryType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn entry(note: &str, amount: rust_decimal::Decimal, day: u32) -> Entry {
        Entry {
            id: format!("e-{note}-{day}"),
            user_id: "u1".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            entry_type: EntryType::Expense,
            category: Some("groceries".to_string()),
            note: note.to_string(),
            currency: "USD".to_string(),
        }
    }

    fn fixture() -> Vec<Entry> {
        vec![
            entry("Fresh Mart", dec!(42.10), 3),
            entry("Fresh Mart", dec!(38.55), 10),
            entry("Corner Cafe", dec!(6.25), 11),
            entry("Fresh Mart", dec!(44.80), 17),
        ]
    }

    #[test]
    fn test_width_is_fixed_after_fit() {
        let pipeline = FeaturePipeline::fit(&fixture(), 32);
        let width = pipeline.width();
        for e in fixture() {
            assert_eq!(pipeline.transform(&e).len(), width);
        }
        // Unseen merchant still produces the same width.
        let unseen = entry("Brand New Merchant", dec!(12.00), 20);
        assert_eq!(pipeline.transform(&unseen).len(), width);
    }

    #[test]
    fn test_all_features_are_bounded() {
        let pipeline = FeaturePipeline::fit(&fixture(), 32);
        for e in fixture() {
            for value in pipeline.transform(&e) {
                assert!(value.is_finite());
                assert!(value >= 0.0, "feature {value} below zero");
            }
        }
    }

    #[test]
    fn test_repeated_merchant_has_higher_note_frequency() {
        let pipeline = FeaturePipeline::fit(&fixture(), 32);
        let routine = pipeline.transform(&entry("Fresh Mart", dec!(40.00), 20));
        let rare = pipeline.transform(&entry("One Off Shop", dec!(40.00), 20));
        let last = routine.len() - 1;
        assert!(routine[last] > rare[last]);
    }

    #[test]
    fn test_pipeline_round_trips_through_serde() {
        let pipeline = FeaturePipeline::fit(&fixture(), 32);
        let blob = serde_json::to_vec(&pipeline).unwrap();
        let restored: FeaturePipeline = serde_json::from_slice(&blob).unwrap();
        assert_eq!(restored, pipeline);
        let probe = entry("Fresh Mart", dec!(41.00), 21);
        assert_eq!(restored.transform(&probe), pipeline.transform(&probe));
    }
}
