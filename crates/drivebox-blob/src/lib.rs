//! # drivebox-blob
//!
//! Blob Adapter implementations of the core [`BlobStore`] trait: an
//! in-memory backend for tests and embedding, and a local-filesystem
//! backend.

pub mod local;
pub mod memory;

use std::sync::Arc;

use drivebox_core::config::blob::BlobConfig;
use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

/// Build a blob store from configuration.
pub async fn from_config(config: &BlobConfig) -> AppResult<Arc<dyn BlobStore>> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryBlobStore::new())),
        "local" => Ok(Arc::new(LocalBlobStore::new(&config.root).await?)),
        other => Err(AppError::configuration(format!(
            "Unknown blob backend '{other}'"
        ))),
    }
}
