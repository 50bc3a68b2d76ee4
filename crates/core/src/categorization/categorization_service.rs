//! Categorization service: training orchestration and suggestion.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use log::{debug, warn};
use uuid::Uuid;

use super::categorization_model::{
    CategorizationSuggestion, FeedbackState, ModelMetadata, TrainOutcome, TrainedModel,
    TrainingReport,
};
use super::categorization_traits::{
    CategorizationServiceTrait, ModelStateStoreTrait, SuggestionRepositoryTrait,
};
use super::classifier::{cross_validate, ForestClassifier, ForestConfig};
use super::rules::rule_based_category;
use crate::constants::{
    LOW_CONFIDENCE_FLOOR, MIN_TRAINING_CATEGORIES, MIN_TRAINING_SAMPLES,
    RULE_FALLBACK_CONFIDENCE, TRAINING_TIMEOUT_SECS,
};
use crate::entries::{Entry, EntryRepositoryTrait};
use crate::errors::{Error, InsufficientData, Result};
use crate::features::FeaturePipeline;

/// Training configuration. Defaults carry the documented policy values.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub min_samples: usize,
    pub min_categories: usize,
    pub max_vocabulary: usize,
    pub cv_folds: usize,
    pub forest: ForestConfig,
    pub timeout_secs: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            min_samples: MIN_TRAINING_SAMPLES,
            min_categories: MIN_TRAINING_CATEGORIES,
            max_vocabulary: 128,
            cv_folds: 5,
            forest: ForestConfig::default(),
            timeout_secs: TRAINING_TIMEOUT_SECS,
        }
    }
}

/// Removes the per-user in-flight marker on every exit path.
struct InFlightGuard {
    map: Arc<DashMap<String, ()>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.map.remove(&self.key);
    }
}

pub struct CategorizationService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    suggestion_repository: Arc<dyn SuggestionRepositoryTrait>,
    model_store: Arc<dyn ModelStateStoreTrait>,
    config: TrainingConfig,
    pub(crate) in_flight: Arc<DashMap<String, ()>>,
}

impl CategorizationService {
    pub fn new(
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        suggestion_repository: Arc<dyn SuggestionRepositoryTrait>,
        model_store: Arc<dyn ModelStateStoreTrait>,
        config: TrainingConfig,
    ) -> Self {
        Self {
            entry_repository,
            suggestion_repository,
            model_store,
            config,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Loads the user's model, treating unreadable, corrupt, or
    /// version-skewed state as "no model". All three are recoverable: the
    /// caller falls back to the keyword rules.
    fn load_model(&self, user_id: &str) -> Option<TrainedModel> {
        let blob = match self.model_store.load(user_id) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(err) => {
                warn!("model load failed for user {user_id}, using rule fallback: {err}");
                return None;
            }
        };
        match TrainedModel::from_blob_compatible(&blob) {
            Some(model) => Some(model),
            None => {
                warn!(
                    "stored model for user {user_id} is corrupt or from another \
                     feature schema version, using rule fallback"
                );
                None
            }
        }
    }

    fn fallback_suggestion(entry: &Entry) -> (String, f64, bool) {
        (
            rule_based_category(&entry.note).to_string(),
            RULE_FALLBACK_CONFIDENCE,
            true,
        )
    }
}

/// Fits the feature pipeline and classifier on categorized history.
///
/// Runs on a blocking thread; pure CPU work with no I/O.
fn fit_model(entries: &[Entry], config: &TrainingConfig) -> Result<TrainedModel> {
    let classes: Vec<String> = entries
        .iter()
        .filter_map(|e| e.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let pipeline = FeaturePipeline::fit(entries, config.max_vocabulary);
    let data: Vec<Vec<f64>> = entries.iter().map(|e| pipeline.transform(e)).collect();
    let labels: Vec<usize> = entries
        .iter()
        .map(|e| {
            let category = e.category.as_deref().unwrap_or_default();
            classes
                .iter()
                .position(|c| c == category)
                .ok_or_else(|| Error::Unexpected(format!("unknown training label {category}")))
        })
        .collect::<Result<_>>()?;

    let accuracy = cross_validate(
        &data,
        &labels,
        classes.len(),
        config.cv_folds,
        &config.forest,
    )?;
    let classifier = ForestClassifier::fit(&data, &labels, classes.len(), &config.forest)?;

    Ok(TrainedModel {
        schema_version: pipeline.schema_version,
        pipeline,
        classifier,
        metadata: ModelMetadata {
            accuracy,
            sample_count: entries.len(),
            trained_at: Utc::now(),
            feedback_count_since_training: 0,
        },
        classes,
    })
}

#[async_trait]
impl CategorizationServiceTrait for CategorizationService {
    async fn suggest(&self, entry: &Entry) -> Result<CategorizationSuggestion> {
        let (category, confidence, from_fallback) = match self.load_model(&entry.user_id) {
            Some(model) => {
                let features = model.pipeline.transform(entry);
                match model.classifier.predict(&features) {
                    Ok((class_index, probability)) => (
                        model.classes[class_index].clone(),
                        probability.clamp(0.0, 1.0),
                        false,
                    ),
                    Err(err) => {
                        warn!(
                            "prediction failed for entry {}, using rule fallback: {err}",
                            entry.id
                        );
                        Self::fallback_suggestion(entry)
                    }
                }
            }
            None => Self::fallback_suggestion(entry),
        };
        if confidence < LOW_CONFIDENCE_FLOOR {
            debug!(
                "low-confidence suggestion ({confidence:.2}) for entry {}",
                entry.id
            );
        }

        let suggestion = CategorizationSuggestion {
            id: Uuid::new_v4().to_string(),
            user_id: entry.user_id.clone(),
            entry_id: entry.id.clone(),
            category,
            confidence,
            from_fallback,
            feedback: FeedbackState::Unset,
            created_at: Utc::now(),
        };
        self.suggestion_repository
            .create_suggestion(suggestion)
            .await
    }

    async fn train(&self, user_id: &str) -> Result<TrainOutcome> {
        match self.in_flight.entry(user_id.to_string()) {
            MapEntry::Occupied(_) => {
                debug!("training already in flight for user {user_id}, skipping");
                return Ok(TrainOutcome::AlreadyInProgress);
            }
            MapEntry::Vacant(slot) => {
                slot.insert(());
            }
        }
        let _guard = InFlightGuard {
            map: Arc::clone(&self.in_flight),
            key: user_id.to_string(),
        };

        let entries = self.entry_repository.get_categorized_entries(user_id)?;
        if entries.len() < self.config.min_samples {
            return Ok(TrainOutcome::InsufficientData(InsufficientData::new(
                format!(
                    "{} categorized entries available, {} required",
                    entries.len(),
                    self.config.min_samples
                ),
            )));
        }
        let distinct: BTreeSet<&str> = entries
            .iter()
            .filter_map(|e| e.category.as_deref())
            .collect();
        if distinct.len() < self.config.min_categories {
            return Ok(TrainOutcome::InsufficientData(InsufficientData::new(
                format!(
                    "history spans {} categories, {} required",
                    distinct.len(),
                    self.config.min_categories
                ),
            )));
        }

        debug!(
            "training model for user {user_id} on {} entries across {} categories",
            entries.len(),
            distinct.len()
        );

        let config = self.config.clone();
        let timeout_secs = config.timeout_secs;
        let fitted = tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            tokio::task::spawn_blocking(move || fit_model(&entries, &config)),
        )
        .await
        .map_err(|_| Error::TrainingTimeout(timeout_secs))???;

        let report = TrainingReport {
            accuracy: fitted.metadata.accuracy,
            sample_count: fitted.metadata.sample_count,
            trained_at: fitted.metadata.trained_at,
        };

        // Single store call: the previous model stays served until this
        // blob is fully written.
        let blob = fitted.to_blob()?;
        self.model_store.store(user_id, &blob)?;

        debug!(
            "trained model for user {user_id}: accuracy {:.3}, {} samples",
            report.accuracy, report.sample_count
        );
        Ok(TrainOutcome::Trained(report))
    }
}
