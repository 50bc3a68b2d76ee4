//! Categorization module - adaptive per-user transaction categorization.
//!
//! A trained ensemble classifier when enough categorized history exists,
//! a deterministic keyword rule table otherwise. Training runs are
//! serialized per user and time-bounded; the persisted model is swapped
//! atomically and never mutated in place.

mod categorization_model;
mod categorization_service;
mod categorization_traits;
mod classifier;
mod rules;


pub use categorization_model::{
    CategorizationSuggestion, FeedbackState, ModelMetadata, TrainOutcome, TrainedModel,
    TrainingReport,
};
pub use categorization_service::{CategorizationService, TrainingConfig};
pub use categorization_traits::{
    CategorizationServiceTrait, ModelStateStoreTrait, SuggestionRepositoryTrait,
};
pub use classifier::{cross_validate, ForestClassifier, ForestConfig};
pub use rules::{rule_based_category, FALLBACK_CATEGORY};
