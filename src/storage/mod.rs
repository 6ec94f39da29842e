mod memory;
mod repository;

use std::future::Future;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::{Entry, EntryId, NewEntry};

pub use memory::MemoryStore;
pub use repository::Repository;

/// SQL migration for the entries table
pub const MIGRATION_001_ENTRIES: &str = include_str!("migrations/001_entries.sql");

/// What a delete-by-id actually did. Both outcomes count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Storage boundary for ledger entries.
///
/// Every method is a single atomic call: it either fully happens or fails
/// without leaving a partial write behind.
pub trait LedgerStore: Send + Sync {
    /// Store a validated entry and return it with the freshly assigned id.
    fn insert(&self, entry: &NewEntry) -> impl Future<Output = Result<Entry>> + Send;

    /// All entries ever stored, in insertion order.
    fn select_all(&self) -> impl Future<Output = Result<Vec<Entry>>> + Send;

    /// Entries dated in [from, to), ordered by date then id.
    fn select_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Entry>>> + Send;

    /// Remove an entry if present. Deleting a missing id is not an error.
    fn delete_by_id(&self, id: EntryId) -> impl Future<Output = Result<DeleteOutcome>> + Send;
}
