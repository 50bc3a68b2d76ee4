//! Feedback domain models and the pure retraining policy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one suggestion outcome. Never updated once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: String,
    pub user_id: String,
    pub suggestion_id: String,
    pub accepted: bool,
    pub created_at: DateTime<Utc>,
}

/// Thresholds governing when accumulated feedback warrants retraining.
///
/// Empirical values, not invariants; override per deployment as needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrainPolicy {
    /// Retrain immediately once this much feedback has accumulated.
    pub high_feedback_count: u64,
    /// Retrain at this lower count once the model has also gone stale.
    pub low_feedback_count: u64,
    /// Days after which a model counts as stale.
    pub stale_after_days: i64,
}

impl Default for RetrainPolicy {
    fn default() -> Self {
        Self {
            high_feedback_count: 50,
            low_feedback_count: 20,
            stale_after_days: 7,
        }
    }
}

/// Pure retraining decision. No I/O, no clock reads; everything the decision
/// needs comes in as arguments so the function is trivially testable.
///
/// `days_since_last_training` of `None` means the user has never had a
/// trained model, which counts as maximally stale.
pub fn should_retrain(
    feedback_count_since_training: u64,
    days_since_last_training: Option<i64>,
    policy: &RetrainPolicy,
) -> bool {
    if feedback_count_since_training >= policy.high_feedback_count {
        return true;
    }
    let stale = days_since_last_training
        .map(|days| days > policy.stale_after_days)
        .unwrap_or(true);
    feedback_count_since_training >= policy.low_feedback_count && stale
}

/// Snapshot assembled for an external worker to branch on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RetrainCheck {
    pub feedback_count_since_training: u64,
    pub days_since_last_training: Option<i64>,
    pub should_retrain: bool,
}
