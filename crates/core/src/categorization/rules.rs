//! Deterministic keyword fallback for users without a trained model.
//!
//! Exact-substring matching over the normalized note covers the common
//! merchants well enough to always give a best-effort answer. Priority is
//! table order: the first matching keyword wins.

use crate::features::normalize_note;

/// Category id returned when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "other";

/// Keyword → category table, checked in order against the normalized note.
const KEYWORD_RULES: &[(&str, &str)] = &[
    // Groceries
    ("grocery", "groceries"),
    ("supermarket", "groceries"),
    ("market", "groceries"),
    ("whole foods", "groceries"),
    ("aldi", "groceries"),
    ("costco", "groceries"),
    // Dining
    ("restaurant", "dining"),
    ("cafe", "dining"),
    ("coffee", "dining"),
    ("pizza", "dining"),
    ("burger", "dining"),
    ("doordash", "dining"),
    ("uber eats", "dining"),
    // Transport
    ("uber", "transport"),
    ("lyft", "transport"),
    ("taxi", "transport"),
    ("fuel", "transport"),
    ("gas station", "transport"),
    ("parking", "transport"),
    ("transit", "transport"),
    // Housing
    ("rent", "housing"),
    ("lease", "housing"),
    ("mortgage", "housing"),
    ("landlord", "housing"),
    // Utilities
    ("electric", "utilities"),
    ("water bill", "utilities"),
    ("internet", "utilities"),
    ("phone", "utilities"),
    ("utility", "utilities"),
    // Subscriptions & entertainment
    ("netflix", "subscriptions"),
    ("spotify", "subscriptions"),
    ("hulu", "subscriptions"),
    ("subscription", "subscriptions"),
    ("cinema", "entertainment"),
    ("theatre", "entertainment"),
    ("concert", "entertainment"),
    // Health
    ("pharmacy", "health"),
    ("doctor", "health"),
    ("dental", "health"),
    ("clinic", "health"),
    ("gym", "health"),
    // Travel
    ("airline", "travel"),
    ("hotel", "travel"),
    ("airbnb", "travel"),
    ("flight", "travel"),
    // Income
    ("salary", "income"),
    ("payroll", "income"),
    ("dividend", "income"),
    ("refund", "income"),
];

/// Matches the note against the keyword table. Always returns a category;
/// unmatched notes fall through to [`FALLBACK_CATEGORY`].
pub fn rule_based_category(note: &str) -> &'static str {
    let normalized = normalize_note(note);
    for (keyword, category) in KEYWORD_RULES {
        if normalized.contains(keyword) {
            return category;
        }
    }
    FALLBACK_CATEGORY
}
