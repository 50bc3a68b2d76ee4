//! Anomaly module - flags and grades unusual transactions.
//!
//! Two independent signals per category: a quartile baseline over amounts
//! (`baseline`) and a multi-feature outlier distance (`outlier`). A single
//! scoring policy (`scoring`) combines them into one severity. Categories
//! with too little history are skipped entirely; that is a normal outcome,
//! not an error.

mod anomaly_model;
mod anomaly_service;
mod baseline;
mod outlier;
mod scoring;

pub use anomaly_model::{AnomalyConfig, AnomalyRecord, AnomalySeverity};
pub use anomaly_service::{AnomalyService, AnomalyServiceTrait};
pub use baseline::QuartileBaseline;
pub use outlier::MultiFeatureOutlier;
pub use scoring::{combine_scores, severity_for_score};
