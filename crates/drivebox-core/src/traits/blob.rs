//! Blob store trait for pluggable object storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// Paths are constructed by the caller as `<owner>/<name>`. A *retrieval
/// handle* is an opaque URL-like string minted by the backend; it is stored
/// on file entries and later passed back to [`BlobStore::fetch`].
///
/// The trait is defined here in `drivebox-core` and implemented in
/// `drivebox-blob`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "memory", "local").
    fn provider_type(&self) -> &str;

    /// Store the full object bytes at the given path, replacing any
    /// previous object.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Resolve a retrieval handle for the object at the given path.
    async fn retrieval_handle(&self, path: &str) -> AppResult<String>;

    /// Delete the object at the given path. Deleting a missing object is
    /// not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Fetch the full object bytes through a retrieval handle.
    async fn fetch(&self, handle: &str) -> AppResult<Bytes>;
}
