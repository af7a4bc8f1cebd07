//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the download watcher (`[watcher]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// How often to ask the download client for completed downloads
    /// (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Remove imported downloads from the client.
    #[serde(default = "default_true")]
    pub remove_completed: bool,

    /// Also delete the download's files when removing it.
    #[serde(default)]
    pub delete_files: bool,
}

fn default_poll_interval() -> u64 {
    10_000 // 10 seconds
}

fn default_true() -> bool {
    true
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            remove_completed: true,
            delete_files: false,
        }
    }
}
