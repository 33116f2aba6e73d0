//! In-memory entry store for tests and single-process deployments.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use drivebox_core::config::store::StoreConfig;
use drivebox_core::error::AppError;
use drivebox_core::events::EntryChange;
use drivebox_core::result::AppResult;
use drivebox_core::types::EntryId;
use drivebox_entity::entry::{Entry, EntryFilter, EntryPatch, NewEntry};

use crate::store::EntryStore;

/// In-memory [`EntryStore`] implementation.
///
/// Mutations broadcast an [`EntryChange`] after commit; a receiver that
/// lags beyond the configured buffer gets a `Lagged` error and is expected
/// to resynchronize with a full re-query.
#[derive(Debug)]
pub struct MemoryEntryStore {
    /// Entry id → record.
    entries: DashMap<EntryId, Entry>,
    /// Change-notification fan-out.
    changes: broadcast::Sender<EntryChange>,
}

impl MemoryEntryStore {
    /// Create an empty store with the given change-channel capacity.
    pub fn new(change_buffer: usize) -> Self {
        let (changes, _) = broadcast::channel(change_buffer.max(1));
        Self {
            entries: DashMap::new(),
            changes,
        }
    }

    /// Create a store from configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.change_buffer)
    }

    /// Number of records currently held, regardless of deletion state.
    pub fn record_count(&self) -> usize {
        self.entries.len()
    }

    fn notify(&self, change: EntryChange) {
        // No receivers is fine; projections subscribe lazily.
        let _ = self.changes.send(change);
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::from_config(&StoreConfig::default())
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn insert(&self, new: NewEntry) -> AppResult<Entry> {
        let entry = Entry {
            id: EntryId::new(),
            name: new.name,
            kind: new.kind,
            owner: new.owner,
            parent: new.parent,
            is_deleted: Some(false),
            created_at: Utc::now(),
            size: new.size,
            url: new.url,
        };
        let id = entry.id;
        self.entries.insert(id, entry.clone());
        self.notify(EntryChange::Inserted { entry_id: id });
        debug!(entry_id = %id, name = %entry.name, "Entry inserted");
        Ok(entry)
    }

    async fn get_by_id(&self, id: &EntryId) -> AppResult<Option<Entry>> {
        Ok(self.entries.get(id).map(|e| e.clone()))
    }

    async fn update(&self, id: &EntryId, patch: EntryPatch) -> AppResult<Entry> {
        let updated = {
            let mut record = self
                .entries
                .get_mut(id)
                .ok_or_else(|| AppError::not_found(format!("Entry {id} not found")))?;
            if let Some(is_deleted) = patch.is_deleted {
                record.is_deleted = Some(is_deleted);
            }
            record.clone()
        };
        self.notify(EntryChange::Updated { entry_id: *id });
        Ok(updated)
    }

    async fn delete(&self, id: &EntryId) -> AppResult<bool> {
        let removed = self.entries.remove(id).is_some();
        if removed {
            self.notify(EntryChange::Removed { entry_id: *id });
        }
        Ok(removed)
    }

    async fn query(&self, filter: &EntryFilter) -> AppResult<Vec<Entry>> {
        let mut matches: Vec<Entry> = self
            .entries
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        // Deterministic order: creation time, then id as a tie-break.
        matches.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(matches)
    }

    fn changes(&self) -> broadcast::Receiver<EntryChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivebox_core::types::OwnerId;
    use drivebox_entity::entry::EntryKind;

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let store = MemoryEntryStore::default();
        let entry = store
            .insert(NewEntry::folder(OwnerId::new("u1"), None, "docs"))
            .await
            .unwrap();

        assert_eq!(entry.is_deleted, Some(false));
        assert!(entry.is_folder());
        let fetched = store.get_by_id(&entry.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "docs");
    }

    #[tokio::test]
    async fn test_update_patches_deleted_marker_only() {
        let store = MemoryEntryStore::default();
        let entry = store
            .insert(NewEntry::file(OwnerId::new("u1"), None, "a.txt", 3, "mem://u1/a.txt"))
            .await
            .unwrap();

        let updated = store.update(&entry.id, EntryPatch::trashed()).await.unwrap();
        assert!(updated.is_trashed());
        assert_eq!(updated.size, entry.size);
        assert_eq!(updated.url, entry.url);
        assert_eq!(updated.created_at, entry.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryEntryStore::default();
        let err = store
            .update(&EntryId::new(), EntryPatch::trashed())
            .await
            .unwrap_err();
        assert_eq!(err.kind, drivebox_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let store = MemoryEntryStore::default();
        let entry = store
            .insert(NewEntry::folder(OwnerId::new("u1"), None, "docs"))
            .await
            .unwrap();

        assert!(store.delete(&entry.id).await.unwrap());
        assert!(!store.delete(&entry.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_query_scopes_by_owner_and_filter() {
        let store = MemoryEntryStore::default();
        store
            .insert(NewEntry::folder(OwnerId::new("u1"), None, "mine"))
            .await
            .unwrap();
        store
            .insert(NewEntry::folder(OwnerId::new("u2"), None, "theirs"))
            .await
            .unwrap();

        let filter = EntryFilter::owned_by(OwnerId::new("u1"))
            .in_parent(None)
            .with_kind(EntryKind::Folder)
            .not_deleted();
        let results = store.query(&filter).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "mine");
    }

    #[tokio::test]
    async fn test_mutations_broadcast_changes() {
        let store = MemoryEntryStore::default();
        let mut rx = store.changes();

        let entry = store
            .insert(NewEntry::folder(OwnerId::new("u1"), None, "docs"))
            .await
            .unwrap();
        store.update(&entry.id, EntryPatch::trashed()).await.unwrap();
        store.delete(&entry.id).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), EntryChange::Inserted { entry_id: entry.id });
        assert_eq!(rx.recv().await.unwrap(), EntryChange::Updated { entry_id: entry.id });
        assert_eq!(rx.recv().await.unwrap(), EntryChange::Removed { entry_id: entry.id });
    }
}
