//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Blob store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Backend selector: `"memory"` or `"local"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Root directory for the `"local"` backend.
    #[serde(default = "default_root")]
    pub root: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            root: default_root(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_root() -> String {
    "data/blobs".to_string()
}
