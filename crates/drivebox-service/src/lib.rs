//! # drivebox-service
//!
//! Business logic for Drivebox:
//!
//! - [`tree`]: the tree invariant engine for folder/file creation,
//!   soft-delete/restore/purge lifecycle, descendant enumeration, and
//!   usage accounting over the flat record store.
//! - [`archive`]: packaging a folder's descendant files into a single
//!   zip archive with progress reporting, and single-file downloads.
//! - [`search`]: fuzzy name matching with highlight spans.

pub mod archive;
pub mod search;
pub mod tree;
