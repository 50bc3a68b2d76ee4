//! Categorization domain models: suggestions, trained model state, outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::classifier::ForestClassifier;
use crate::errors::{InsufficientData, Result};
use crate::features::{FeaturePipeline, FEATURE_SCHEMA_VERSION};

/// Tri-state feedback on a suggestion. Set exactly once, by the feedback
/// recorder, when the user responds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackState {
    #[default]
    Unset,
    Accepted,
    Rejected,
}

/// A category suggestion produced for one entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizationSuggestion {
    pub id: String,
    pub user_id: String,
    pub entry_id: String,
    pub category: String,
    /// Model-estimated probability of the suggested category, in [0, 1].
    pub confidence: f64,
    /// True when the suggestion came from the keyword rule table rather than
    /// a trained model.
    pub from_fallback: bool,
    pub feedback: FeedbackState,
    pub created_at: DateTime<Utc>,
}

/// Metadata recorded with every successful training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    /// Cross-validation accuracy estimate, in [0, 1].
    pub accuracy: f64,
    /// Number of categorized entries the model was fitted on.
    pub sample_count: usize,
    pub trained_at: DateTime<Utc>,
    /// Feedback events observed since this training run. Zero at training
    /// time; derived from the feedback log afterwards.
    pub feedback_count_since_training: u64,
}

/// The complete trained pipeline, persisted as one opaque blob.
///
/// Pipeline and classifier are versioned together: inference must never run
/// a classifier against a differently-fitted pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainedModel {
    pub schema_version: u32,
    pub pipeline: FeaturePipeline,
    pub classifier: ForestClassifier,
    /// Class set fixed at training time; predictions index into this list.
    pub classes: Vec<String>,
    pub metadata: ModelMetadata,
}

impl TrainedModel {
    /// Serializes to the opaque blob handed to the model store.
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserializes a blob, returning `None` when the blob is unreadable or
    /// was produced under a different feature schema version. Both cases are
    /// recoverable: the caller falls back to the keyword rules.
    pub fn from_blob_compatible(blob: &[u8]) -> Option<TrainedModel> {
        let model: TrainedModel = serde_json::from_slice(blob).ok()?;
        if model.schema_version != FEATURE_SCHEMA_VERSION
            || model.pipeline.schema_version != FEATURE_SCHEMA_VERSION
        {
            return None;
        }
        if model.classes.is_empty() || model.classes.len() != model.classifier.class_count() {
            return None;
        }
        Some(model)
    }
}

/// Report returned by a successful training run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    pub accuracy: f64,
    pub sample_count: usize,
    pub trained_at: DateTime<Utc>,
}

/// Outcome of a training request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum TrainOutcome {
    /// A new model was trained and stored.
    Trained(TrainingReport),
    /// Not enough usable history; any existing model is untouched.
    InsufficientData(InsufficientData),
    /// Another training run for this user is already in flight; this request
    /// was a no-op.
    AlreadyInProgress,
}
