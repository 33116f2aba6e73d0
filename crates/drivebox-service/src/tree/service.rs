//! Entry lifecycle operations over the flat record store.
//!
//! The store has no cascades and no unique constraints, so every tree
//! invariant (duplicate sibling names, transitive soft-delete, ownership
//! scoping) is enforced here, one query and one write at a time.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;
use drivebox_core::types::{EntryId, OwnerId};
use drivebox_entity::entry::{Entry, EntryFilter, EntryKind, EntryPatch, NewEntry};
use drivebox_store::EntryStore;

/// The blob path for a named object of an owner.
pub fn blob_path(owner: &OwnerId, name: &str) -> String {
    format!("{owner}/{name}")
}

/// Manages entry lifecycle: creation, soft-delete, restore, and purge.
#[derive(Debug, Clone)]
pub struct TreeService {
    /// Record store adapter.
    records: Arc<dyn EntryStore>,
    /// Blob store adapter.
    blobs: Arc<dyn BlobStore>,
}

impl TreeService {
    /// Creates a new tree service.
    pub fn new(records: Arc<dyn EntryStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { records, blobs }
    }

    /// The record store this service operates on.
    pub fn records(&self) -> &Arc<dyn EntryStore> {
        &self.records
    }

    /// Creates a new folder under the given parent.
    ///
    /// Fails with a conflict if a non-deleted folder of the same name
    /// already exists among the siblings. The check-then-create pair is
    /// not transactional: two concurrent creators can both pass the check
    /// and both insert. The store offers no unique constraint, so this
    /// race is accepted and documented rather than hidden.
    pub async fn create_folder(
        &self,
        owner: &OwnerId,
        parent: Option<EntryId>,
        name: &str,
    ) -> AppResult<Entry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let siblings = self
            .records
            .query(
                &EntryFilter::owned_by(owner.clone())
                    .in_parent(parent)
                    .with_kind(EntryKind::Folder)
                    .not_deleted(),
            )
            .await
            .map_err(|e| AppError::store(format!("Sibling lookup failed: {e}")))?;

        if siblings.iter().any(|s| s.name == name) {
            return Err(AppError::conflict(format!(
                "Folder '{name}' already exists"
            )));
        }

        let folder = self
            .records
            .insert(NewEntry::folder(owner.clone(), parent, name))
            .await
            .map_err(|e| AppError::store(format!("Failed to create folder: {e}")))?;

        info!(
            owner = %owner,
            folder_id = %folder.id,
            name = %folder.name,
            "Folder created"
        );

        Ok(folder)
    }

    /// Uploads a file: stores its bytes, resolves a retrieval handle, and
    /// persists the file entry.
    ///
    /// An empty payload is rejected before any blob call; a zero-size
    /// record is a defect, not a valid empty file. If the record insert
    /// fails after the blob write, the blob is left orphaned at
    /// `<owner>/<name>` for later cleanup; the error is still surfaced.
    pub async fn upload_file(
        &self,
        owner: &OwnerId,
        parent: Option<EntryId>,
        name: &str,
        data: Bytes,
    ) -> AppResult<Entry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if data.is_empty() {
            return Err(AppError::validation(format!(
                "Refusing to upload '{name}' with zero bytes"
            )));
        }

        let path = blob_path(owner, name);
        let size = data.len() as u64;

        self.blobs.put(&path, data).await?;
        let url = self.blobs.retrieval_handle(&path).await?;

        let entry = match self
            .records
            .insert(NewEntry::file(owner.clone(), parent, name, size, url))
            .await
        {
            Ok(entry) => entry,
            Err(e) => {
                warn!(owner = %owner, path = %path, "File record insert failed; blob orphaned");
                return Err(AppError::store(format!("Failed to create file entry: {e}")));
            }
        };

        info!(
            owner = %owner,
            entry_id = %entry.id,
            name = %entry.name,
            size,
            "File uploaded"
        );

        Ok(entry)
    }

    /// Soft-deletes an entry; for folders the entire descendant subtree is
    /// marked transitively.
    ///
    /// Children are enumerated regardless of their current deletion state,
    /// so re-deleting a previously-restored subtree is idempotent. The walk
    /// uses an explicit work list rather than call-stack recursion; depth
    /// is bounded only by the tree itself.
    pub async fn soft_delete(&self, entry: &Entry) -> AppResult<()> {
        let mut pending = vec![entry.clone()];
        let mut marked = 0usize;

        while let Some(current) = pending.pop() {
            self.records
                .update(&current.id, EntryPatch::trashed())
                .await
                .map_err(|e| AppError::store(format!("Soft-delete of {} failed: {e}", current.id)))?;
            marked += 1;

            if current.is_folder() {
                let children = self
                    .records
                    .query(
                        &EntryFilter::owned_by(current.owner.clone())
                            .in_parent(Some(current.id)),
                    )
                    .await
                    .map_err(|e| AppError::store(format!("Child lookup failed: {e}")))?;
                pending.extend(children);
            }
        }

        info!(entry_id = %entry.id, marked, "Entry soft-deleted");
        Ok(())
    }

    /// Restores exactly the given entry from the trash.
    ///
    /// Restore does not cascade (delete does). Restoring an entry whose
    /// ancestor is still deleted leaves it unreachable from any
    /// root-to-leaf traversal that filters deleted entries at every level;
    /// it becomes visible again once the ancestor is itself restored.
    pub async fn restore(&self, entry: &Entry) -> AppResult<()> {
        self.records
            .update(&entry.id, EntryPatch::restored())
            .await
            .map_err(|e| AppError::store(format!("Restore of {} failed: {e}", entry.id)))?;

        info!(entry_id = %entry.id, "Entry restored");
        Ok(())
    }

    /// Permanently removes an entry record; for files the blob is deleted
    /// first.
    ///
    /// A failed blob delete (already missing, backend unreachable) is
    /// logged and the record delete proceeds, since purge must not get stuck on
    /// a missing blob. Folder purge removes only the folder's own record;
    /// any children stay in the trash and are purged individually.
    pub async fn purge(&self, entry: &Entry) -> AppResult<()> {
        if entry.is_file() {
            let path = blob_path(&entry.owner, &entry.name);
            if let Err(e) = self.blobs.delete(&path).await {
                warn!(
                    entry_id = %entry.id,
                    path = %path,
                    error = %e,
                    "Blob delete failed during purge; removing record anyway"
                );
            }
        }

        self.records
            .delete(&entry.id)
            .await
            .map_err(|e| AppError::store(format!("Purge of {} failed: {e}", entry.id)))?;

        info!(entry_id = %entry.id, kind = ?entry.kind, "Entry purged");
        Ok(())
    }

    /// Point-reads the parent folder of an entry, if it has one.
    pub async fn parent_of(&self, entry: &Entry) -> AppResult<Option<Entry>> {
        match entry.parent {
            None => Ok(None),
            Some(parent_id) => self
                .records
                .get_by_id(&parent_id)
                .await
                .map_err(|e| AppError::store(format!("Parent lookup failed: {e}"))),
        }
    }

    /// Total bytes used by the owner's non-deleted files.
    ///
    /// A file record with a missing or zero size is a defect; it is logged
    /// and excluded from the sum rather than failing the aggregation.
    pub async fn used_size(&self, owner: &OwnerId) -> AppResult<u64> {
        let files = self
            .records
            .query(
                &EntryFilter::owned_by(owner.clone())
                    .with_kind(EntryKind::File)
                    .not_deleted(),
            )
            .await
            .map_err(|e| AppError::store(format!("Usage query failed: {e}")))?;

        let mut total = 0u64;
        for file in &files {
            match file.valid_size() {
                Some(size) => total += size,
                None => warn!(
                    entry_id = %file.id,
                    name = %file.name,
                    "File entry has missing or invalid size; excluded from usage"
                ),
            }
        }
        Ok(total)
    }
}
