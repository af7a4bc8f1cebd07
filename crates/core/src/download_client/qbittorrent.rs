//! qBittorrent Web API v2 client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::QBittorrentConfig;

use super::{DownloadClient, DownloadClientError, DownloadJob};

/// qBittorrent client implementation.
pub struct QBittorrentClient {
    client: Client,
    config: QBittorrentConfig,
    /// Set once logged in; the SID cookie itself lives in the cookie jar.
    session: Arc<RwLock<Option<String>>>,
}

impl QBittorrentClient {
    /// Create a new qBittorrent client.
    pub fn new(config: QBittorrentConfig) -> Result<Self, DownloadClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .cookie_store(true)
            .build()
            .map_err(|e| {
                DownloadClientError::ConnectionFailed(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            config,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Get the base URL without trailing slash.
    fn base_url(&self) -> &str {
        self.config.url.trim_end_matches('/')
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url(), endpoint)
    }

    /// Login and store session cookie.
    async fn login(&self) -> Result<(), DownloadClientError> {
        let params = [
            ("username", self.config.username.as_str()),
            ("password", self.config.password.as_str()),
        ];

        let response = self
            .client
            .post(self.url("/api/v2/auth/login"))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if body.contains("Ok.") {
            debug!("qBittorrent login successful");
            let mut session = self.session.write().await;
            *session = Some("authenticated".to_string());
            Ok(())
        } else if body.contains("Fails.") || status.as_u16() == 403 {
            Err(DownloadClientError::AuthenticationFailed(
                "Invalid credentials".to_string(),
            ))
        } else {
            Err(DownloadClientError::AuthenticationFailed(format!(
                "Unexpected response: {}",
                body.chars().take(100).collect::<String>()
            )))
        }
    }

    /// Ensure we have a valid session, logging in if needed.
    async fn ensure_authenticated(&self) -> Result<(), DownloadClientError> {
        let session = self.session.read().await;
        if session.is_some() {
            return Ok(());
        }
        drop(session);
        self.login().await
    }

    /// Send an authenticated request, logging in again once on HTTP 403.
    async fn send(
        &self,
        build: impl Fn() -> RequestBuilder + Send + Sync,
    ) -> Result<String, DownloadClientError> {
        self.ensure_authenticated().await?;

        let mut response = build().send().await?;

        if response.status().as_u16() == 403 {
            warn!("qBittorrent session expired, re-authenticating");
            {
                let mut session = self.session.write().await;
                *session = None;
            }
            self.login().await?;
            response = build().send().await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadClientError::ApiError(format!("HTTP {}", status)));
        }

        Ok(response.text().await?)
    }

    fn completed_endpoint(&self) -> String {
        let mut endpoint = "/api/v2/torrents/info?filter=completed".to_string();
        if let Some(category) = &self.config.category {
            endpoint.push_str("&category=");
            endpoint.push_str(&urlencoding::encode(category));
        }
        endpoint
    }
}

/// Subset of the qBittorrent torrent info response.
#[derive(Debug, Deserialize)]
struct QBTorrentInfo {
    hash: String,
    name: String,
    save_path: String,
    #[serde(default)]
    completion_on: i64,
}

impl QBTorrentInfo {
    fn into_job(self) -> DownloadJob {
        DownloadJob {
            hash: self.hash.to_lowercase(),
            name: self.name,
            save_path: PathBuf::from(self.save_path),
            completed_at: timestamp_to_datetime(self.completion_on),
        }
    }
}

/// Convert Unix timestamp to DateTime<Utc>.
fn timestamp_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 0 {
        Utc.timestamp_opt(ts, 0).single()
    } else {
        None
    }
}

fn parse_jobs(body: &str) -> Result<Vec<DownloadJob>, DownloadClientError> {
    let torrents: Vec<QBTorrentInfo> = serde_json::from_str(body).map_err(|e| {
        DownloadClientError::ApiError(format!("Failed to parse response: {}", e))
    })?;
    Ok(torrents.into_iter().map(QBTorrentInfo::into_job).collect())
}

#[async_trait]
impl DownloadClient for QBittorrentClient {
    fn name(&self) -> &str {
        "qbittorrent"
    }

    async fn authenticate(&self) -> Result<(), DownloadClientError> {
        self.login().await
    }

    async fn list_completed(&self) -> Result<Vec<DownloadJob>, DownloadClientError> {
        let url = self.url(&self.completed_endpoint());
        let body = self.send(|| self.client.get(&url)).await?;
        parse_jobs(&body)
    }

    async fn remove(&self, hash: &str, delete_files: bool) -> Result<(), DownloadClientError> {
        let url = self.url("/api/v2/torrents/delete");
        let hash_lower = hash.to_lowercase();
        let delete_str = if delete_files { "true" } else { "false" };
        let params = [("hashes", hash_lower.as_str()), ("deleteFiles", delete_str)];

        self.send(|| self.client.post(&url).form(&params)).await?;

        debug!("Removed {} from qBittorrent (deleteFiles={})", hash_lower, delete_str);
        Ok(())
    }
}
