//! Folder archive builder.
//!
//! Resolves a folder's descendant files, fetches their bytes one at a
//! time, and packages them into a single in-memory zip named
//! `<folder>.zip`. Individual fetch failures are logged and skipped; the
//! caller sees succeeded/failed counts on the result.

use std::io::{Cursor, Write};
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::BlobStore;
use drivebox_entity::entry::Entry;

use crate::tree::{DescendantFile, TreeService};

/// Progress of an in-flight archive build, emitted after each file is
/// attempted (success or failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ArchiveProgress {
    /// Files attempted so far.
    pub completed: usize,
    /// Total files in the archive plan.
    pub total: usize,
}

impl ArchiveProgress {
    /// Completion fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// A finished folder archive ready for delivery.
#[derive(Debug, Clone)]
pub struct FolderArchive {
    /// Suggested download filename (`<folder>.zip`).
    pub file_name: String,
    /// Serialized zip bytes.
    pub data: Bytes,
    /// Files packaged successfully.
    pub succeeded: usize,
    /// Files skipped after a failed fetch.
    pub failed: usize,
}

/// A single file ready for delivery.
#[derive(Debug, Clone)]
pub struct FileDownload {
    /// Suggested download filename (the entry's own name).
    pub file_name: String,
    /// File content bytes.
    pub data: Bytes,
}

/// Folder contents as shown before a download is confirmed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FolderManifest {
    /// Descendant files with relative paths.
    pub files: Vec<DescendantFile>,
    /// Total payload bytes (missing sizes count as zero).
    pub total_size: u64,
}

/// Builds folder archives and serves single-file downloads.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    /// Tree engine used to enumerate descendants.
    tree: TreeService,
    /// Blob store used to fetch file bytes.
    blobs: Arc<dyn BlobStore>,
}

impl ArchiveBuilder {
    /// Creates a new archive builder.
    pub fn new(tree: TreeService, blobs: Arc<dyn BlobStore>) -> Self {
        Self { tree, blobs }
    }

    /// Lists a folder's descendant files and their total size, for the
    /// download confirmation surface.
    pub async fn folder_manifest(&self, folder: &Entry) -> AppResult<FolderManifest> {
        if !folder.is_folder() {
            return Err(AppError::validation(format!(
                "'{}' is not a folder",
                folder.name
            )));
        }

        let files = self
            .tree
            .descendant_files(folder.id, &folder.owner)
            .await?;
        let total_size = files.iter().map(|f| f.entry.size.unwrap_or(0)).sum();

        Ok(FolderManifest { files, total_size })
    }

    /// Builds a zip archive of every non-deleted file beneath the folder.
    ///
    /// Fails up front with an empty-folder error when there is nothing to
    /// package. Files are fetched sequentially; each failed fetch is
    /// logged, counted, and skipped. After every attempt a progress event
    /// is sent on `progress` (if provided); a dropped receiver never
    /// aborts the build. If every fetch fails the result is a zip with
    /// zero entries and `failed == total`; callers decide whether that
    /// counts as a partial failure.
    pub async fn build_folder_archive(
        &self,
        folder: &Entry,
        progress: Option<mpsc::Sender<ArchiveProgress>>,
    ) -> AppResult<FolderArchive> {
        if !folder.is_folder() {
            return Err(AppError::validation(format!(
                "'{}' is not a folder",
                folder.name
            )));
        }

        let files = self
            .tree
            .descendant_files(folder.id, &folder.owner)
            .await?;
        if files.is_empty() {
            return Err(AppError::empty_folder(format!(
                "Folder '{}' contains no files",
                folder.name
            )));
        }

        let total = files.len();
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for (attempted, file) in files.iter().enumerate() {
            match self.fetch_entry_bytes(&file.entry).await {
                Ok(data) => {
                    writer
                        .start_file(file.relative_path.as_str(), options)
                        .map_err(|e| {
                            AppError::with_source(
                                ErrorKind::Internal,
                                format!("Archive entry '{}' failed", file.relative_path),
                                e,
                            )
                        })?;
                    writer.write_all(&data).map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Internal,
                            format!("Archive write for '{}' failed", file.relative_path),
                            e,
                        )
                    })?;
                    succeeded += 1;
                }
                Err(e) => {
                    warn!(
                        entry_id = %file.entry.id,
                        path = %file.relative_path,
                        error = %e,
                        "Skipping file after failed fetch"
                    );
                    failed += 1;
                }
            }

            if let Some(tx) = &progress {
                let _ = tx
                    .send(ArchiveProgress {
                        completed: attempted + 1,
                        total,
                    })
                    .await;
            }
        }

        let cursor = writer.finish().map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Archive serialization failed", e)
        })?;

        info!(
            folder_id = %folder.id,
            name = %folder.name,
            succeeded,
            failed,
            "Folder archive built"
        );

        Ok(FolderArchive {
            file_name: format!("{}.zip", folder.name),
            data: Bytes::from(cursor.into_inner()),
            succeeded,
            failed,
        })
    }

    /// Fetches a single file's bytes for delivery under its original name.
    ///
    /// Fetch failures are recoverable errors; no retry is performed here.
    pub async fn download_file(&self, file: &Entry) -> AppResult<FileDownload> {
        if !file.is_file() {
            return Err(AppError::validation(format!(
                "'{}' is not a file",
                file.name
            )));
        }

        let data = self.fetch_entry_bytes(file).await?;
        Ok(FileDownload {
            file_name: file.name.clone(),
            data,
        })
    }

    async fn fetch_entry_bytes(&self, entry: &Entry) -> AppResult<Bytes> {
        let handle = entry.url.as_deref().ok_or_else(|| {
            AppError::fetch(format!("File '{}' has no retrieval handle", entry.name))
        })?;
        self.blobs.fetch(handle).await
    }
}
