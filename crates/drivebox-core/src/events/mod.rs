//! Store change events.

pub mod entry;

pub use entry::EntryChange;
