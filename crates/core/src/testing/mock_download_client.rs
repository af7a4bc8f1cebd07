//! Mock download client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::download_client::{DownloadClient, DownloadClientError, DownloadJob};

/// A recorded removal for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRemoval {
    pub hash: String,
    pub delete_files: bool,
}

/// Mock implementation of the DownloadClient trait.
///
/// Provides controllable behavior for testing:
/// - Serve a configurable list of completed downloads
/// - Track logins and removals for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// let client = MockDownloadClient::new();
/// client.add_completed(fixtures::download_job("abc123", "The.Movie (2015)", "/downloads")).await;
///
/// let jobs = client.list_completed().await?;
/// assert_eq!(jobs.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockDownloadClient {
    /// Completed jobs, dropped again on `remove`.
    jobs: Arc<RwLock<Vec<DownloadJob>>>,
    removals: Arc<RwLock<Vec<RecordedRemoval>>>,
    logins: Arc<RwLock<usize>>,
    /// If set, `authenticate` fails.
    reject_login: Arc<RwLock<bool>>,
    /// If set, the next list/remove operation will fail with this error.
    next_error: Arc<RwLock<Option<DownloadClientError>>>,
}

impl Default for MockDownloadClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDownloadClient {
    /// Create a new mock client with no downloads.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            removals: Arc::new(RwLock::new(Vec::new())),
            logins: Arc::new(RwLock::new(0)),
            reject_login: Arc::new(RwLock::new(false)),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a completed download.
    pub async fn add_completed(&self, job: DownloadJob) {
        self.jobs.write().await.push(job);
    }

    /// Get all recorded removals.
    pub async fn removals(&self) -> Vec<RecordedRemoval> {
        self.removals.read().await.clone()
    }

    /// Number of successful `authenticate` calls.
    pub async fn login_count(&self) -> usize {
        *self.logins.read().await
    }

    /// Make `authenticate` fail with invalid credentials.
    pub async fn set_reject_login(&self, reject: bool) {
        *self.reject_login.write().await = reject;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: DownloadClientError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Option<DownloadClientError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl DownloadClient for MockDownloadClient {
    fn name(&self) -> &str {
        "mock"
    }

    async fn authenticate(&self) -> Result<(), DownloadClientError> {
        if *self.reject_login.read().await {
            return Err(DownloadClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ));
        }
        *self.logins.write().await += 1;
        Ok(())
    }

    async fn list_completed(&self) -> Result<Vec<DownloadJob>, DownloadClientError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }
        Ok(self.jobs.read().await.clone())
    }

    async fn remove(&self, hash: &str, delete_files: bool) -> Result<(), DownloadClientError> {
        if let Some(error) = self.take_error().await {
            return Err(error);
        }

        // Unknown hashes are ignored, as qBittorrent does.
        self.jobs.write().await.retain(|j| j.hash != hash);

        self.removals.write().await.push(RecordedRemoval {
            hash: hash.to_string(),
            delete_files,
        });
        Ok(())
    }
}

