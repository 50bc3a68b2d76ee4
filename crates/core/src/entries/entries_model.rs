//! Entry domain models.
//!
//! Entries are created, edited, and deleted by the surrounding CRUD layer.
//! The intelligence core only ever reads them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an entry represents money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "INCOME",
            EntryType::Expense => "EXPENSE",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Domain model representing a single transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    /// Signed amount; expenses and incomes both carry positive magnitudes,
    /// the direction is carried by `entry_type`.
    pub amount: Decimal,
    pub date: NaiveDate,
    pub entry_type: EntryType,
    /// Category id, if the user (or the model) has assigned one.
    pub category: Option<String>,
    /// Free-text note / merchant description.
    pub note: String,
    pub currency: String,
}

impl Entry {
    /// True when the entry carries a user-confirmed category.
    pub fn is_categorized(&self) -> bool {
        self.category
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn is_expense(&self) -> bool {
        self.entry_type == EntryType::Expense
    }
}
