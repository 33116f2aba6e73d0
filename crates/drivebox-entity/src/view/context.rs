//! View context value object.
//!
//! The projection layer is parameterized by an explicit view context
//! instead of ambient "current folder" / "trash mode" state. Each active
//! subscription is bound to one context; navigating elsewhere means
//! tearing that subscription down and opening a new one.

use serde::{Deserialize, Serialize};

use drivebox_core::types::{EntryId, OwnerId};

use crate::entry::{EntryFilter, EntryKind};

/// A logical, live-updating view over one owner's entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewContext {
    /// Non-deleted entries of one folder (`None` = the root listing).
    Folder {
        /// The folder whose children are shown.
        parent: Option<EntryId>,
    },
    /// Non-deleted root-level folders (the sidebar listing).
    RootFolders,
    /// All soft-deleted entries.
    Trash,
    /// All non-deleted files, used for usage aggregation.
    UsageFiles,
}

impl ViewContext {
    /// The entry filter backing this view for the given owner.
    pub fn filter(&self, owner: &OwnerId) -> EntryFilter {
        let base = EntryFilter::owned_by(owner.clone());
        match self {
            Self::Folder { parent } => base.in_parent(*parent).not_deleted(),
            Self::RootFolders => base
                .in_parent(None)
                .with_kind(EntryKind::Folder)
                .not_deleted(),
            Self::Trash => base.only_deleted(),
            Self::UsageFiles => base.with_kind(EntryKind::File).not_deleted(),
        }
    }

    /// Short name used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Folder { .. } => "folder",
            Self::RootFolders => "root_folders",
            Self::Trash => "trash",
            Self::UsageFiles => "usage_files",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::DeletedPredicate;

    #[test]
    fn test_root_folders_filter() {
        let f = ViewContext::RootFolders.filter(&OwnerId::new("u1"));
        assert_eq!(f.parent, Some(None));
        assert_eq!(f.kind, Some(EntryKind::Folder));
        assert_eq!(f.deleted, DeletedPredicate::NotDeleted);
    }

    #[test]
    fn test_trash_filter_spans_all_kinds_and_parents() {
        let f = ViewContext::Trash.filter(&OwnerId::new("u1"));
        assert_eq!(f.parent, None);
        assert_eq!(f.kind, None);
        assert_eq!(f.deleted, DeletedPredicate::Deleted);
    }

    #[test]
    fn test_folder_view_of_subfolder() {
        let id = EntryId::new();
        let f = ViewContext::Folder { parent: Some(id) }.filter(&OwnerId::new("u1"));
        assert_eq!(f.parent, Some(Some(id)));
        assert_eq!(f.kind, None);
    }
}
