//! Shared test helpers for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use drivebox_blob::MemoryBlobStore;
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;
use drivebox_core::types::OwnerId;
use drivebox_service::tree::TreeService;
use drivebox_store::{EntryStore, MemoryEntryStore};

/// Blob store wrapper that counts calls, for asserting which blob
/// operations a lifecycle step actually performed.
#[derive(Debug, Default)]
pub struct CountingBlobStore {
    inner: MemoryBlobStore,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    fetches: AtomicUsize,
}

impl CountingBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Direct access to the wrapped store, uncounted.
    pub fn inner(&self) -> &MemoryBlobStore {
        &self.inner
    }
}

#[async_trait]
impl BlobStore for CountingBlobStore {
    fn provider_type(&self) -> &str {
        "counting-memory"
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(path, data).await
    }

    async fn retrieval_handle(&self, path: &str) -> AppResult<String> {
        self.inner.retrieval_handle(path).await
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(path).await
    }

    async fn fetch(&self, handle: &str) -> AppResult<Bytes> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(handle).await
    }
}

/// Test context wiring a tree service over in-memory adapters.
pub struct TestTree {
    pub tree: TreeService,
    pub records: Arc<MemoryEntryStore>,
    pub blobs: Arc<CountingBlobStore>,
    pub owner: OwnerId,
}

impl TestTree {
    pub fn new() -> Self {
        let records = Arc::new(MemoryEntryStore::default());
        let blobs = Arc::new(CountingBlobStore::new());
        let tree = TreeService::new(
            records.clone() as Arc<dyn EntryStore>,
            blobs.clone() as Arc<dyn BlobStore>,
        );
        Self {
            tree,
            records,
            blobs,
            owner: OwnerId::new("test-user"),
        }
    }
}
