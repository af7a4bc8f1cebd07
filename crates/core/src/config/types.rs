use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::matcher::MatcherConfig;
use crate::metadata::TmdbConfig;
use crate::placer::PlacerConfig;
use crate::watcher::WatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub metadata: Option<MetadataConfig>,
    #[serde(default)]
    pub placer: PlacerConfig,
    #[serde(default)]
    pub download_client: Option<DownloadClientConfig>,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

/// Library locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Flat directory that receives `Title_(Year).ext` files. Never created
    /// automatically.
    pub destination_root: PathBuf,
    /// Working directory files are moved into before renaming.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: PathBuf,
}

fn default_staging_dir() -> PathBuf {
    PathBuf::from("staging")
}

/// Metadata provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Metadata backend type
    pub backend: MetadataBackend,
    /// Deadline for a single year lookup in seconds (default: 15)
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u32,
    /// TMDB-specific configuration (required when backend = "tmdb")
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
}

fn default_metadata_timeout() -> u32 {
    15
}

/// Available metadata backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetadataBackend {
    Tmdb,
}

/// Download client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadClientConfig {
    /// Download client backend type
    pub backend: DownloadClientBackend,
    /// qBittorrent-specific configuration (required when backend = "qbittorrent")
    #[serde(default)]
    pub qbittorrent: Option<QBittorrentConfig>,
}

/// Available download client backends
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DownloadClientBackend {
    Qbittorrent,
}

/// qBittorrent Web API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QBittorrentConfig {
    /// Web UI URL (e.g., "http://localhost:8080")
    pub url: String,
    pub username: String,
    pub password: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Only consider downloads in this category
    #[serde(default)]
    pub category: Option<String>,
}

fn default_timeout() -> u32 {
    30
}

/// Notification configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub backend: NotifierBackend,
    /// Webhook configuration (required when backend = "webhook")
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

/// Available notification backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotifierBackend {
    #[default]
    Log,
    Webhook,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    pub url: String,
    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u32,
}

fn default_webhook_timeout() -> u32 {
    10
}

/// Sanitized config for the startup log (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub library: LibraryConfig,
    pub matcher: MatcherConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SanitizedMetadataConfig>,
    pub placer: PlacerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_client: Option<SanitizedDownloadClientConfig>,
    pub watcher: WatcherConfig,
    pub notifier: SanitizedNotifierConfig,
}

/// Sanitized metadata config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMetadataConfig {
    pub backend: String,
    pub timeout_secs: u32,
    pub api_key_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Sanitized download client config (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedDownloadClientConfig {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub password_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Sanitized notifier config (webhook URL hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedNotifierConfig {
    pub backend: String,
    pub webhook_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            library: config.library.clone(),
            matcher: config.matcher.clone(),
            metadata: config.metadata.as_ref().map(|m| SanitizedMetadataConfig {
                backend: match m.backend {
                    MetadataBackend::Tmdb => "tmdb".to_string(),
                },
                timeout_secs: m.timeout_secs,
                api_key_configured: m.tmdb.as_ref().is_some_and(|t| !t.api_key.is_empty()),
                base_url: m.tmdb.as_ref().and_then(|t| t.base_url.clone()),
            }),
            placer: config.placer.clone(),
            download_client: config.download_client.as_ref().map(|d| {
                let qb = d.qbittorrent.as_ref();
                SanitizedDownloadClientConfig {
                    backend: match d.backend {
                        DownloadClientBackend::Qbittorrent => "qbittorrent".to_string(),
                    },
                    url: qb.map(|q| q.url.clone()),
                    username: qb.map(|q| q.username.clone()),
                    password_configured: qb.is_some_and(|q| !q.password.is_empty()),
                    category: qb.and_then(|q| q.category.clone()),
                }
            }),
            watcher: config.watcher.clone(),
            notifier: SanitizedNotifierConfig {
                backend: match config.notifier.backend {
                    NotifierBackend::Log => "log".to_string(),
                    NotifierBackend::Webhook => "webhook".to_string(),
                },
                webhook_configured: config.notifier.webhook.is_some(),
            },
        }
    }
}
