//! Entry entity and filter types.

pub mod filter;
pub mod model;

pub use filter::{DeletedPredicate, EntryFilter};
pub use model::{Entry, EntryKind, EntryPatch, NewEntry};
