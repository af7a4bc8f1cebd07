//! Types for the download client module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadClientError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Download client not configured: {0}")]
    NotConfigured(String),
}

impl DownloadClientError {
    /// Whether this error should stop the watcher.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_) | Self::NotConfigured(_))
    }
}

impl From<reqwest::Error> for DownloadClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else {
            Self::ApiError(e.to_string())
        }
    }
}

/// A finished download as reported by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadJob {
    /// Info hash (lowercase hex).
    pub hash: String,
    /// Nominal release name; may differ from the name on disk.
    pub name: String,
    /// Directory the client saved the download into.
    pub save_path: PathBuf,
    pub completed_at: Option<DateTime<Utc>>,
}
