//! Recursive descendant-file enumeration.

use std::collections::VecDeque;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::types::{EntryId, OwnerId};
use drivebox_entity::entry::{Entry, EntryFilter};

use super::service::TreeService;

/// A file reached by walking a folder's non-deleted descendants, together
/// with its path relative to the walked folder (e.g. `reports/q3.pdf`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DescendantFile {
    /// The file entry.
    pub entry: Entry,
    /// Slash-separated path below the walked folder, ending in the file
    /// name itself.
    pub relative_path: String,
}

impl TreeService {
    /// Enumerates every non-deleted file beneath a folder, with
    /// accumulated relative paths.
    ///
    /// The walk is breadth-first over an explicit queue (deep trees must
    /// not consume call stack) and re-runs from the store on every call;
    /// nothing is memoized. Soft-deleted folders are not descended into,
    /// so a restored file under a deleted ancestor never appears here.
    pub async fn descendant_files(
        &self,
        folder_id: EntryId,
        owner: &OwnerId,
    ) -> AppResult<Vec<DescendantFile>> {
        let mut files = Vec::new();
        let mut queue: VecDeque<(EntryId, String)> = VecDeque::new();
        queue.push_back((folder_id, String::new()));

        while let Some((parent_id, prefix)) = queue.pop_front() {
            let children = self
                .records()
                .query(
                    &EntryFilter::owned_by(owner.clone())
                        .in_parent(Some(parent_id))
                        .not_deleted(),
                )
                .await
                .map_err(|e| AppError::store(format!("Descendant lookup failed: {e}")))?;

            for child in children {
                if child.is_folder() {
                    queue.push_back((child.id, format!("{prefix}{}/", child.name)));
                } else {
                    let relative_path = format!("{prefix}{}", child.name);
                    files.push(DescendantFile {
                        entry: child,
                        relative_path,
                    });
                }
            }
        }

        Ok(files)
    }
}
