//! Entry store trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use drivebox_core::events::EntryChange;
use drivebox_core::result::AppResult;
use drivebox_core::types::EntryId;
use drivebox_entity::entry::{Entry, EntryFilter, EntryPatch, NewEntry};

/// Trait for the externally-owned flat document store.
///
/// The store has no unique constraints, no foreign keys, and no cascades;
/// it offers exactly point reads, filtered queries, field updates, deletes,
/// and a change-notification stream. All tree semantics live above this
/// trait.
///
/// Writes are last-write-wins between concurrent callers. Reads are
/// eventually consistent with respect to the change stream: a notification
/// only guarantees that a subsequent query observes the mutation.
#[async_trait]
pub trait EntryStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new entry record. The store assigns the id and creation
    /// timestamp; the record starts with `is_deleted = false`.
    async fn insert(&self, new: NewEntry) -> AppResult<Entry>;

    /// Point-read an entry by id.
    async fn get_by_id(&self, id: &EntryId) -> AppResult<Option<Entry>>;

    /// Apply a lifecycle field patch and return the updated record.
    /// Fails with a not-found error if the record does not exist.
    async fn update(&self, id: &EntryId, patch: EntryPatch) -> AppResult<Entry>;

    /// Permanently remove a record. Returns `true` if a record was removed,
    /// `false` if it was already gone.
    async fn delete(&self, id: &EntryId) -> AppResult<bool>;

    /// Return all records matching the filter, in a deterministic order.
    async fn query(&self, filter: &EntryFilter) -> AppResult<Vec<Entry>>;

    /// Subscribe to the change-notification stream. One event is broadcast
    /// per committed mutation; consumers re-query rather than diff.
    fn changes(&self) -> broadcast::Receiver<EntryChange>;
}
