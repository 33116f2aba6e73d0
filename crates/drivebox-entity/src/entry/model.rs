//! Entry entity model.
//!
//! Files and folders share a single flat record type distinguished by
//! [`EntryKind`]. The tree structure is carried entirely by the `parent`
//! reference; the store has no foreign keys and no cascade support, so
//! every tree invariant is enforced by the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drivebox_core::types::{EntryId, OwnerId};

/// Whether an entry is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file with blob-backed content.
    File,
    /// A folder; may contain child entries.
    Folder,
}

/// A single file or folder record in the flat store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique entry identifier, assigned by the store at insert time.
    pub id: EntryId,
    /// Entry name. Unique among non-deleted folder siblings as a creation
    /// precondition (not a store-level constraint).
    pub name: String,
    /// File or folder. Immutable after creation.
    pub kind: EntryKind,
    /// The owning principal. Immutable; scopes every query.
    pub owner: OwnerId,
    /// Parent folder id (`None` for root-level entries).
    pub parent: Option<EntryId>,
    /// Soft-delete marker. Records written by older clients may omit the
    /// field entirely; absent means not deleted.
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
    /// Size in bytes. Present and positive for files; absent for folders.
    #[serde(default)]
    pub size: Option<u64>,
    /// Retrieval handle minted by the blob store. Files only.
    #[serde(default)]
    pub url: Option<String>,
}

impl Entry {
    /// Check if this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }

    /// Check if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Check if this entry is soft-deleted, treating an absent marker as
    /// not deleted.
    pub fn is_trashed(&self) -> bool {
        self.is_deleted.unwrap_or(false)
    }

    /// Check if this is a root-level entry (no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// The file size if it is present and positive. A zero or missing size
    /// on a file record is a defect and is excluded from aggregation.
    pub fn valid_size(&self) -> Option<u64> {
        self.size.filter(|s| *s > 0)
    }

    /// Humanized byte count for display (e.g. `1.5 MB`).
    pub fn display_size(&self) -> String {
        format_bytes(self.size.unwrap_or(0))
    }
}

/// Humanize a byte count with 1024-based units and up to two decimals.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[exp])
}

/// Data required to create a new entry record.
///
/// The store assigns `id` and `created_at`; new entries always start with
/// `is_deleted = false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    /// Entry name.
    pub name: String,
    /// File or folder.
    pub kind: EntryKind,
    /// The owning principal.
    pub owner: OwnerId,
    /// Parent folder (`None` for root).
    pub parent: Option<EntryId>,
    /// Size in bytes (files only).
    pub size: Option<u64>,
    /// Retrieval handle (files only).
    pub url: Option<String>,
}

impl NewEntry {
    /// A new folder record.
    pub fn folder(owner: OwnerId, parent: Option<EntryId>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            owner,
            parent,
            size: None,
            url: None,
        }
    }

    /// A new file record referencing an already-stored blob.
    pub fn file(
        owner: OwnerId,
        parent: Option<EntryId>,
        name: impl Into<String>,
        size: u64,
        url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
            owner,
            parent,
            size: Some(size),
            url: Some(url.into()),
        }
    }
}

/// Lifecycle field patch.
///
/// Entries are never mutated except through the three lifecycle
/// transitions, so the only patchable field is the soft-delete marker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    /// New value for the soft-delete marker, if it should change.
    pub is_deleted: Option<bool>,
}

impl EntryPatch {
    /// Patch marking an entry as soft-deleted.
    pub fn trashed() -> Self {
        Self {
            is_deleted: Some(true),
        }
    }

    /// Patch restoring an entry from the trash.
    pub fn restored() -> Self {
        Self {
            is_deleted: Some(false),
        }
    }
}
