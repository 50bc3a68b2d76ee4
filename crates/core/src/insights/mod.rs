//! Insights module - deterministic composition of the intelligence outputs.
//!
//! A stateless aggregator with no learned parameters: given a snapshot of
//! entries, anomaly records, and forecasts, it derives a health score, saving
//! opportunities, trend labels, recommendations, achievements, and alerts.
//! Each section is a pure function; a failed upstream input disables only the
//! sections that need it.

mod insights_model;
mod insights_service;
pub mod sections;

pub use insights_model::{
    Achievement, Alert, CategorySpend, CategoryTrend, HealthBand, HealthScore, InsightsBundle,
    InsightsConfig, InsightsSnapshot, OpportunityKind, Priority, Recommendation, SavingOpportunity,
};
pub use insights_service::{InsightsService, InsightsServiceTrait};
