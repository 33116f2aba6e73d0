//! Typed filter for entry queries.
//!
//! The external document store only supports equality filters on `owner`,
//! `parent`, and `kind`, plus an inequality on the soft-delete marker that
//! must treat an absent field as "not deleted". The filter is therefore a
//! closed struct rather than a general predicate language.

use serde::{Deserialize, Serialize};

use drivebox_core::types::{EntryId, OwnerId};

use super::model::{Entry, EntryKind};

/// Predicate on the tri-state soft-delete marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletedPredicate {
    /// Match entries regardless of deletion state.
    #[default]
    Any,
    /// Match entries that are not soft-deleted (absent marker included).
    NotDeleted,
    /// Match entries that are soft-deleted.
    Deleted,
}

/// A filtered entry query.
///
/// Every filter is scoped to a single owner; there are no cross-principal
/// queries anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    /// The owning principal.
    pub owner: OwnerId,
    /// Parent constraint: `None` = any parent, `Some(None)` = root-level,
    /// `Some(Some(id))` = children of the given folder.
    pub parent: Option<Option<EntryId>>,
    /// Kind constraint, if any.
    pub kind: Option<EntryKind>,
    /// Soft-delete constraint.
    pub deleted: DeletedPredicate,
}

impl EntryFilter {
    /// All entries of an owner, regardless of state.
    pub fn owned_by(owner: OwnerId) -> Self {
        Self {
            owner,
            parent: None,
            kind: None,
            deleted: DeletedPredicate::Any,
        }
    }

    /// Constrain to direct children of the given parent (`None` = root).
    pub fn in_parent(mut self, parent: Option<EntryId>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Constrain to a single entry kind.
    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Constrain to entries that are not soft-deleted.
    pub fn not_deleted(mut self) -> Self {
        self.deleted = DeletedPredicate::NotDeleted;
        self
    }

    /// Constrain to soft-deleted entries.
    pub fn only_deleted(mut self) -> Self {
        self.deleted = DeletedPredicate::Deleted;
        self
    }

    /// Evaluate the filter against a single entry.
    pub fn matches(&self, entry: &Entry) -> bool {
        if entry.owner != self.owner {
            return false;
        }
        if let Some(parent) = &self.parent {
            if entry.parent != *parent {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }
        match self.deleted {
            DeletedPredicate::Any => true,
            DeletedPredicate::NotDeleted => !entry.is_trashed(),
            DeletedPredicate::Deleted => entry.is_trashed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(owner: &str, parent: Option<EntryId>, kind: EntryKind, deleted: Option<bool>) -> Entry {
        Entry {
            id: EntryId::new(),
            name: "e".to_string(),
            kind,
            owner: OwnerId::new(owner),
            parent,
            is_deleted: deleted,
            created_at: Utc::now(),
            size: None,
            url: None,
        }
    }

    #[test]
    fn test_owner_scoping() {
        let f = EntryFilter::owned_by(OwnerId::new("u1"));
        assert!(f.matches(&entry("u1", None, EntryKind::File, None)));
        assert!(!f.matches(&entry("u2", None, EntryKind::File, None)));
    }

    #[test]
    fn test_root_parent_filter() {
        let folder = EntryId::new();
        let f = EntryFilter::owned_by(OwnerId::new("u1")).in_parent(None);
        assert!(f.matches(&entry("u1", None, EntryKind::Folder, None)));
        assert!(!f.matches(&entry("u1", Some(folder), EntryKind::Folder, None)));
    }

    #[test]
    fn test_absent_marker_counts_as_not_deleted() {
        let f = EntryFilter::owned_by(OwnerId::new("u1")).not_deleted();
        assert!(f.matches(&entry("u1", None, EntryKind::File, None)));
        assert!(f.matches(&entry("u1", None, EntryKind::File, Some(false))));
        assert!(!f.matches(&entry("u1", None, EntryKind::File, Some(true))));

        let trash = EntryFilter::owned_by(OwnerId::new("u1")).only_deleted();
        assert!(!trash.matches(&entry("u1", None, EntryKind::File, None)));
        assert!(trash.matches(&entry("u1", None, EntryKind::File, Some(true))));
    }

    #[test]
    fn test_kind_filter() {
        let f = EntryFilter::owned_by(OwnerId::new("u1")).with_kind(EntryKind::Folder);
        assert!(f.matches(&entry("u1", None, EntryKind::Folder, None)));
        assert!(!f.matches(&entry("u1", None, EntryKind::File, None)));
    }
}
