use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::domain::{Entry, EntryId, NewEntry};

use super::{DeleteOutcome, LedgerStore};

#[derive(Default)]
struct MemoryState {
    last_id: EntryId,
    entries: BTreeMap<EntryId, Entry>,
}

/// In-process ledger store. Nothing survives the process; ids still only
/// ever grow, so a deleted id is never handed out again.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryStore {
    async fn insert(&self, entry: &NewEntry) -> Result<Entry> {
        let mut state = self.state.lock().await;
        state.last_id += 1;
        let stored = Entry::from_new(state.last_id, entry.clone(), Utc::now());
        state.entries.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn select_all(&self) -> Result<Vec<Entry>> {
        let state = self.state.lock().await;
        Ok(state.entries.values().cloned().collect())
    }

    async fn select_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Entry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<Entry> = state
            .entries
            .values()
            .filter(|e| e.date >= from && e.date < to)
            .cloned()
            .collect();
        entries.sort_by_key(|e| (e.date, e.id));
        Ok(entries)
    }

    async fn delete_by_id(&self, id: EntryId) -> Result<DeleteOutcome> {
        let mut state = self.state.lock().await;
        Ok(match state.entries.remove(&id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryType;

    fn new_entry(day: u32) -> NewEntry {
        NewEntry {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            entry_type: EntryType::Expense,
            category: "Food".into(),
            amount_cents: 1_200,
        }
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert(&new_entry(1)).await.unwrap();
        let second = store.insert(&new_entry(2)).await.unwrap();
        assert_eq!(store.delete_by_id(second.id).await.unwrap(), DeleteOutcome::Deleted);

        let third = store.insert(&new_entry(3)).await.unwrap();
        assert!(third.id > second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(store.delete_by_id(42).await.unwrap(), DeleteOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_select_range_orders_by_date() {
        let store = MemoryStore::new();
        store.insert(&new_entry(20)).await.unwrap();
        store.insert(&new_entry(5)).await.unwrap();
        store.insert(&new_entry(29)).await.unwrap();

        let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let days: Vec<NaiveDate> = store
            .select_range(from, to)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.date)
            .collect();

        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
            ]
        );
    }
}
