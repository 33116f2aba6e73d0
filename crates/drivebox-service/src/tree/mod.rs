//! Tree invariant engine.

pub mod service;
pub mod walk;

pub use service::{blob_path, TreeService};
pub use walk::DescendantFile;
