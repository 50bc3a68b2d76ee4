//! Repository trait for reading a user's transaction history.

use chrono::NaiveDate;

use super::entries_model::Entry;
use crate::errors::Result;

/// Read access to a user's entries, implemented by the storage layer.
///
/// All methods return entries ordered by date ascending.
pub trait EntryRepositoryTrait: Send + Sync {
    /// All entries for a user.
    fn get_entries(&self, user_id: &str) -> Result<Vec<Entry>>;

    /// Entries for a user within `[start, end]` inclusive.
    fn get_entries_in_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Entry>>;

    /// Entries that carry a user-confirmed category, used as training data.
    fn get_categorized_entries(&self, user_id: &str) -> Result<Vec<Entry>> {
        Ok(self
            .get_entries(user_id)?
            .into_iter()
            .filter(Entry::is_categorized)
            .collect())
    }
}
