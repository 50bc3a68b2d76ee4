//! Traits for the feedback subsystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::feedback_model::{FeedbackRecord, RetrainCheck};
use crate::errors::Result;

/// Append-only log of suggestion outcomes, implemented by the storage layer.
#[async_trait]
pub trait FeedbackRepositoryTrait: Send + Sync {
    /// Appends one record. Records are immutable once written.
    async fn append(&self, record: FeedbackRecord) -> Result<FeedbackRecord>;

    /// Number of records for a user strictly after `since`; all records when
    /// `since` is `None`.
    fn count_since(&self, user_id: &str, since: Option<DateTime<Utc>>) -> Result<u64>;
}

/// Service interface for recording feedback and assembling retrain checks.
#[async_trait]
pub trait FeedbackServiceTrait: Send + Sync {
    /// Records the user's response to a suggestion. The suggestion flips away
    /// from `Unset` exactly once; a second response is a constraint violation.
    async fn record_feedback(&self, suggestion_id: &str, accepted: bool)
        -> Result<FeedbackRecord>;

    /// Assembles the counters an external worker needs to decide whether to
    /// trigger retraining.
    fn retraining_status(&self, user_id: &str) -> Result<RetrainCheck>;
}
