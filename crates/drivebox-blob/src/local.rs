//! Local filesystem blob store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;

/// Retrieval-handle scheme minted by the local backend.
const SCHEME: &str = "file://";

/// Local filesystem [`BlobStore`] implementation.
///
/// Objects live under a root directory; blob paths (`<owner>/<name>`)
/// become relative paths beneath it. Handles are `file://` URLs of the
/// absolute object path.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored objects.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Blob,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative blob path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Blob,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn put(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Blob, format!("Failed to write object: {path}"), e)
        })?;

        debug!(path, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn retrieval_handle(&self, path: &str) -> AppResult<String> {
        let full_path = self.resolve(path);
        if !full_path.exists() {
            return Err(AppError::not_found(format!("No object at path: {path}")));
        }
        Ok(format!("{SCHEME}{}", full_path.display()))
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Blob,
                    format!("Failed to delete object: {path}"),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn fetch(&self, handle: &str) -> AppResult<Bytes> {
        let path = handle
            .strip_prefix(SCHEME)
            .ok_or_else(|| AppError::fetch(format!("Unrecognized handle: {handle}")))?;

        let data = fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::fetch(format!("Object gone: {handle}"))
            } else {
                AppError::with_source(ErrorKind::Fetch, format!("Failed to fetch: {handle}"), e)
            }
        })?;
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_handle_fetch_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        let data = Bytes::from("hello world");
        store.put("u1/file.txt", data.clone()).await.unwrap();

        let handle = store.retrieval_handle("u1/file.txt").await.unwrap();
        assert!(handle.starts_with("file://"));
        assert_eq!(store.fetch(&handle).await.unwrap(), data);

        store.delete("u1/file.txt").await.unwrap();
        let err = store.fetch(&handle).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        store.delete("u1/never-existed.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_put_replaces_existing_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().to_str().unwrap())
            .await
            .unwrap();

        store.put("u1/f.txt", Bytes::from("one")).await.unwrap();
        store.put("u1/f.txt", Bytes::from("two")).await.unwrap();

        let handle = store.retrieval_handle("u1/f.txt").await.unwrap();
        assert_eq!(store.fetch(&handle).await.unwrap(), Bytes::from("two"));
    }
}
