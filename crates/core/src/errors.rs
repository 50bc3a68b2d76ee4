//! Core error types for the finsight intelligence core.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! (from whatever backend implements the repository traits) are converted to
//! these types by the storage layer.
//!
//! Note that "not enough history" is deliberately NOT an error: `train` and
//! `forecast` return outcome enums with an `InsufficientData` variant so that
//! callers branch on it instead of catching it.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Expected "not enough history" value, returned inside outcome enums by
/// `train` and `forecast`. Deliberately not an `Error` variant: callers
/// branch on it rather than catch it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsufficientData {
    pub reason: String,
}

impl InsufficientData {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Root error type for the intelligence core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Model operation failed: {0}")]
    Model(#[from] ModelError),

    #[error("Training run timed out after {0} seconds")]
    TrainingTimeout(u64),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for repository and blob-store operations.
///
/// Uses `String` for all error details, allowing the storage layer to convert
/// backend-specific errors into this format.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A read from the underlying store failed.
    #[error("Store read failed: {0}")]
    ReadFailed(String),

    /// A write to the underlying store failed.
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Errors raised while fitting, serializing, or applying a trained model.
///
/// A corrupted or version-skewed persisted model is handled where it is
/// loaded (treated as "no model" with a logged warning), so these variants
/// cover genuine programming or data errors during a run.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Feature pipeline was applied before being fitted")]
    PipelineNotFitted,

    #[error("Feature vector width {actual} does not match trained width {expected}")]
    FeatureWidthMismatch { expected: usize, actual: usize },

    #[error("Failed to serialize model state: {0}")]
    Serialization(String),

    #[error("Training failed: {0}")]
    Training(String),
}

/// Validation errors for inputs handed to the core.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Model(ModelError::Serialization(err.to_string()))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Unexpected(format!("background task failed: {err}"))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
