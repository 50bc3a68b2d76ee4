/// Pseudo-category id used for the aggregate ("all categories") forecast.
pub const OVERALL_CATEGORY_ID: &str = "overall";

/// Fixed confidence attached to keyword-rule fallback suggestions.
pub const RULE_FALLBACK_CONFIDENCE: f64 = 0.5;

/// Suggestions below this confidence should be treated as "low confidence"
/// by callers. The model itself never suppresses a suggestion.
pub const LOW_CONFIDENCE_FLOOR: f64 = 0.3;

/// Minimum number of categorized entries required before training is attempted.
pub const MIN_TRAINING_SAMPLES: usize = 10;

/// Minimum number of distinct categories required in the training set.
pub const MIN_TRAINING_CATEGORIES: usize = 2;

/// Hard wall-clock bound on a single training run, in seconds.
pub const TRAINING_TIMEOUT_SECS: u64 = 30;
