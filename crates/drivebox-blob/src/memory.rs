//! In-memory blob store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;

/// Retrieval-handle scheme minted by the in-memory backend.
const SCHEME: &str = "mem://";

/// In-memory [`BlobStore`] implementation.
///
/// Handles are `mem://<path>`; fetching resolves back into the same map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    /// Path → object bytes.
    objects: DashMap<String, Bytes>,
}

impl MemoryBlobStore {
    /// Create an empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.objects.insert(path.to_string(), data);
        Ok(())
    }

    async fn retrieval_handle(&self, path: &str) -> AppResult<String> {
        if !self.objects.contains_key(path) {
            return Err(AppError::not_found(format!("No object at path: {path}")));
        }
        Ok(format!("{SCHEME}{path}"))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.objects.remove(path);
        Ok(())
    }

    async fn fetch(&self, handle: &str) -> AppResult<Bytes> {
        let path = handle
            .strip_prefix(SCHEME)
            .ok_or_else(|| AppError::fetch(format!("Unrecognized handle: {handle}")))?;
        self.objects
            .get(path)
            .map(|b| b.clone())
            .ok_or_else(|| AppError::fetch(format!("Object gone: {handle}")))
    }
}
