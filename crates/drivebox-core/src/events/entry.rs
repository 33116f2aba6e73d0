//! Entry record change events.
//!
//! The record store broadcasts one event per committed mutation. The
//! projection layer does not diff these events; it re-queries its view on
//! every one, so the payload is deliberately just the entry id.

use serde::{Deserialize, Serialize};

use crate::types::EntryId;

/// Events emitted by the record store after each committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntryChange {
    /// An entry record was inserted.
    Inserted {
        /// The new entry's id.
        entry_id: EntryId,
    },
    /// An entry record's fields were updated.
    Updated {
        /// The updated entry's id.
        entry_id: EntryId,
    },
    /// An entry record was permanently removed.
    Removed {
        /// The removed entry's id.
        entry_id: EntryId,
    },
}

impl EntryChange {
    /// The id of the entry the event refers to.
    pub fn entry_id(&self) -> EntryId {
        match self {
            Self::Inserted { entry_id } | Self::Updated { entry_id } | Self::Removed { entry_id } => {
                *entry_id
            }
        }
    }
}
