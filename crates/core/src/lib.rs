//! Finsight Core - Per-user financial intelligence.
//!
//! This crate contains the intelligence pipeline of the finsight personal
//! finance tracker: adaptive transaction categorization with a feedback-driven
//! retraining loop, anomaly detection over spending history, trend/forecast
//! estimation, and an insight composer built on top of all three.
//!
//! It is storage-agnostic: entry history, suggestion records, feedback logs,
//! and the trained model blob are reached through traits implemented by the
//! surrounding application.

pub mod anomaly;
pub mod categorization;
pub mod constants;
pub mod entries;
pub mod errors;
pub mod features;
pub mod feedback;
pub mod forecast;
pub mod insights;

// Re-export error types
pub use errors::Error;
pub use errors::InsufficientData;
pub use errors::Result;
