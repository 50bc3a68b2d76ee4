//! Entries module - read-only transaction history consumed by the core.

mod entries_model;
mod entries_traits;

pub use entries_model::{Entry, EntryType};
pub use entries_traits::EntryRepositoryTrait;
