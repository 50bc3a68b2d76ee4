//! Insights section implementations.
//!
//! Each section is a pure function over an [`InsightsSnapshot`]: same
//! snapshot in, same output out. The service composes them and decides which
//! sections an upstream failure makes unavailable.
//!
//! [`InsightsSnapshot`]: crate::insights::InsightsSnapshot

pub mod achievements;
pub mod alerts;
pub mod health_score;
pub mod opportunities;
pub mod recommendations;

pub use achievements::earned_achievements;
pub use alerts::raise_alerts;
pub use health_score::compute_health;
pub use opportunities::find_opportunities;
pub use recommendations::build_recommendations;
