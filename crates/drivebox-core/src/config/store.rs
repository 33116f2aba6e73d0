//! Record store configuration.

use serde::{Deserialize, Serialize};

/// Record store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selector. `"memory"` is the only built-in backend; external
    /// document stores are wired in by implementing the `EntryStore` trait.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Capacity of the change-notification channel. Subscribers that fall
    /// further behind than this resynchronize with a full re-query.
    #[serde(default = "default_change_buffer")]
    pub change_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            change_buffer: default_change_buffer(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_change_buffer() -> usize {
    256
}
