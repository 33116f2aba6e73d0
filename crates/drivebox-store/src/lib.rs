//! # drivebox-store
//!
//! Record Store Adapter: the [`EntryStore`] trait abstracting the external
//! document database, plus the in-memory reference implementation used by
//! tests and single-process deployments.

pub mod memory;
pub mod store;

pub use memory::MemoryEntryStore;
pub use store::EntryStore;
