//! Folder archive packaging and file downloads.

pub mod builder;

pub use builder::{ArchiveBuilder, ArchiveProgress, FileDownload, FolderArchive, FolderManifest};
