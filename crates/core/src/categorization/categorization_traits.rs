//! Traits for the categorization subsystem.

use async_trait::async_trait;

use super::categorization_model::{CategorizationSuggestion, FeedbackState, TrainOutcome};
use crate::entries::Entry;
use crate::errors::Result;

/// Durable key-value store for the per-user trained model blob.
///
/// Implementations must provide atomic overwrite semantics: `load` returns
/// the latest fully `store`d blob, never a partially written one. The core
/// treats the blob as opaque bytes.
pub trait ModelStateStoreTrait: Send + Sync {
    fn load(&self, user_id: &str) -> Result<Option<Vec<u8>>>;
    fn store(&self, user_id: &str, blob: &[u8]) -> Result<()>;
    fn delete(&self, user_id: &str) -> Result<()>;
}

/// Persistence for suggestion records.
#[async_trait]
pub trait SuggestionRepositoryTrait: Send + Sync {
    fn get_suggestion(&self, suggestion_id: &str) -> Result<CategorizationSuggestion>;

    async fn create_suggestion(
        &self,
        suggestion: CategorizationSuggestion,
    ) -> Result<CategorizationSuggestion>;

    /// Sets the feedback state of a suggestion. Must fail with a constraint
    /// violation if the suggestion already carries a response; the tri-state
    /// flips away from `Unset` exactly once.
    async fn set_feedback(
        &self,
        suggestion_id: &str,
        state: FeedbackState,
    ) -> Result<CategorizationSuggestion>;
}

/// Service interface for category suggestion and training.
#[async_trait]
pub trait CategorizationServiceTrait: Send + Sync {
    /// Suggests a category for one entry. Uses the trained model when one is
    /// loadable, otherwise the keyword rule fallback; always returns a
    /// suggestion.
    async fn suggest(&self, entry: &Entry) -> Result<CategorizationSuggestion>;

    /// Trains (or retrains) the user's model from categorized history.
    /// Serialized per user; bounded by the configured timeout.
    async fn train(&self, user_id: &str) -> Result<TrainOutcome>;
}
