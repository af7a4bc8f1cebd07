//! Polling loop over the download client.
//!
//! The watcher lists completed downloads, hands every unseen one to the
//! `ReleaseProcessor` and forgets it in the client once imported. A release
//! whose directory cannot be found stays unhandled and is retried on the
//! next poll.

mod config;
mod runner;

pub use config::WatcherConfig;
pub use runner::DownloadWatcher;

use thiserror::Error;

use crate::download_client::DownloadClientError;

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error("Download client error: {0}")]
    Client(#[from] DownloadClientError),
}

impl WatcherError {
    /// Whether the watcher has to stop.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Client(e) => e.is_fatal(),
        }
    }
}

/// Counters for a single poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Completed downloads reported by the client.
    pub seen: usize,
    /// Already handled in an earlier poll.
    pub skipped: usize,
    /// Releases processed and marked handled.
    pub processed: usize,
    /// Releases whose directory was not found (retried later).
    pub not_found: usize,
    /// Releases that failed before any file was looked at (retried later).
    pub errors: usize,
    /// Files placed into the library.
    pub files_placed: usize,
}
