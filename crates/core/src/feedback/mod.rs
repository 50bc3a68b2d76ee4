//! Feedback module - suggestion outcomes and the retraining trigger policy.
//!
//! Feedback records are append-only and immutable; the retraining decision is
//! a pure function over accumulated counts, invoked by an external worker.
//! The core performs no scheduling of its own.

mod feedback_model;
mod feedback_service;
mod feedback_traits;

pub use feedback_model::{should_retrain, FeedbackRecord, RetrainCheck, RetrainPolicy};
pub use feedback_service::FeedbackService;
pub use feedback_traits::{FeedbackRepositoryTrait, FeedbackServiceTrait};
