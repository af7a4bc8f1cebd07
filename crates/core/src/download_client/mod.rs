//! Download client abstraction.
//!
//! The watcher only needs three things from a download client: log in, list
//! finished downloads, and forget a download once it has been imported.

mod qbittorrent;
mod types;

pub use qbittorrent::QBittorrentClient;
pub use types::*;

use async_trait::async_trait;

use crate::config::{DownloadClientBackend, DownloadClientConfig};

/// A torrent client that reports completed downloads.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Establish a session. Fails with `AuthenticationFailed` on bad credentials.
    async fn authenticate(&self) -> Result<(), DownloadClientError>;

    /// All downloads that have finished.
    async fn list_completed(&self) -> Result<Vec<DownloadJob>, DownloadClientError>;

    /// Remove a download from the client, optionally deleting its files.
    async fn remove(&self, hash: &str, delete_files: bool) -> Result<(), DownloadClientError>;
}

/// Create a download client from configuration.
pub fn create_download_client(
    config: &DownloadClientConfig,
) -> Result<Box<dyn DownloadClient>, DownloadClientError> {
    match config.backend {
        DownloadClientBackend::Qbittorrent => {
            let qb = config.qbittorrent.clone().ok_or_else(|| {
                DownloadClientError::NotConfigured(
                    "[download_client.qbittorrent] must be set when backend = \"qbittorrent\""
                        .to_string(),
                )
            })?;
            Ok(Box::new(QBittorrentClient::new(qb)?))
        }
    }
}
