//! Trait seams to the externally-owned capabilities.

pub mod blob;
pub mod identity;

pub use blob::BlobStore;
pub use identity::{IdentityProvider, Principal};
