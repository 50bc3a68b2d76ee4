//! Feedback service: records suggestion outcomes and assembles retrain checks.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use uuid::Uuid;

use super::feedback_model::{should_retrain, FeedbackRecord, RetrainCheck, RetrainPolicy};
use super::feedback_traits::{FeedbackRepositoryTrait, FeedbackServiceTrait};
use crate::categorization::{
    FeedbackState, ModelStateStoreTrait, SuggestionRepositoryTrait, TrainedModel,
};
use crate::errors::Result;

pub struct FeedbackService {
    suggestion_repository: Arc<dyn SuggestionRepositoryTrait>,
    feedback_repository: Arc<dyn FeedbackRepositoryTrait>,
    model_store: Arc<dyn ModelStateStoreTrait>,
    policy: RetrainPolicy,
}

impl FeedbackService {
    pub fn new(
        suggestion_repository: Arc<dyn SuggestionRepositoryTrait>,
        feedback_repository: Arc<dyn FeedbackRepositoryTrait>,
        model_store: Arc<dyn ModelStateStoreTrait>,
        policy: RetrainPolicy,
    ) -> Self {
        Self {
            suggestion_repository,
            feedback_repository,
            model_store,
            policy,
        }
    }

    /// Last successful training time, if a readable model exists.
    fn last_trained_at(&self, user_id: &str) -> Option<chrono::DateTime<Utc>> {
        let blob = match self.model_store.load(user_id) {
            Ok(Some(blob)) => blob,
            Ok(None) => return None,
            Err(err) => {
                warn!("model load failed for user {user_id} while checking retrain status: {err}");
                return None;
            }
        };
        TrainedModel::from_blob_compatible(&blob).map(|model| model.metadata.trained_at)
    }
}

#[async_trait]
impl FeedbackServiceTrait for FeedbackService {
    async fn record_feedback(
        &self,
        suggestion_id: &str,
        accepted: bool,
    ) -> Result<FeedbackRecord> {
        let state = if accepted {
            FeedbackState::Accepted
        } else {
            FeedbackState::Rejected
        };
        // Fails on a second response; the suggestion mutates exactly once.
        let suggestion = self
            .suggestion_repository
            .set_feedback(suggestion_id, state)
            .await?;

        let record = FeedbackRecord {
            id: Uuid::new_v4().to_string(),
            user_id: suggestion.user_id.clone(),
            suggestion_id: suggestion_id.to_string(),
            accepted,
            created_at: Utc::now(),
        };
        debug!(
            "recorded {} feedback on suggestion {suggestion_id} for user {}",
            if accepted { "accept" } else { "reject" },
            suggestion.user_id
        );
        self.feedback_repository.append(record).await
    }

    fn retraining_status(&self, user_id: &str) -> Result<RetrainCheck> {
        let trained_at = self.last_trained_at(user_id);
        let feedback_count_since_training =
            self.feedback_repository.count_since(user_id, trained_at)?;
        let days_since_last_training =
            trained_at.map(|at| Utc::now().signed_duration_since(at).num_days());

        Ok(RetrainCheck {
            feedback_count_since_training,
            days_since_last_training,
            should_retrain: should_retrain(
                feedback_count_since_training,
                days_since_last_training,
                &self.policy,
            ),
        })
    }
}
