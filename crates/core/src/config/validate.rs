use super::types::{Config, DownloadClientBackend, MetadataBackend, NotifierBackend};
use super::ConfigError;

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}

/// Validate configuration
/// Currently validates:
/// - Library paths are set and distinct
/// - Matcher threshold lies in [0, 1]
/// - Placer buffer and watcher interval are non-zero
/// - Every selected backend has its section filled in
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let library = &config.library;
    if library.destination_root.as_os_str().is_empty() {
        return Err(invalid("library.destination_root cannot be empty"));
    }
    if library.staging_dir.as_os_str().is_empty() {
        return Err(invalid("library.staging_dir cannot be empty"));
    }
    if library.staging_dir == library.destination_root {
        return Err(invalid(
            "library.staging_dir must differ from library.destination_root",
        ));
    }

    let threshold = config.matcher.similarity_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(invalid("matcher.similarity_threshold must be between 0 and 1"));
    }

    if config.placer.buffer_size == 0 {
        return Err(invalid("placer.buffer_size cannot be 0"));
    }

    if config.watcher.poll_interval_ms == 0 {
        return Err(invalid("watcher.poll_interval_ms cannot be 0"));
    }

    if let Some(metadata) = &config.metadata {
        if metadata.timeout_secs == 0 {
            return Err(invalid("metadata.timeout_secs cannot be 0"));
        }
        match metadata.backend {
            MetadataBackend::Tmdb => match &metadata.tmdb {
                Some(tmdb) if !tmdb.api_key.is_empty() => {}
                Some(_) => return Err(invalid("metadata.tmdb.api_key cannot be empty")),
                None => {
                    return Err(invalid(
                        "[metadata.tmdb] is required when metadata.backend = \"tmdb\"",
                    ))
                }
            },
        }
    }

    if let Some(client) = &config.download_client {
        match client.backend {
            DownloadClientBackend::Qbittorrent => match &client.qbittorrent {
                Some(qb) if !qb.url.is_empty() => {}
                Some(_) => {
                    return Err(invalid("download_client.qbittorrent.url cannot be empty"))
                }
                None => {
                    return Err(invalid(
                        "[download_client.qbittorrent] is required when download_client.backend = \"qbittorrent\"",
                    ))
                }
            },
        }
    }

    if config.notifier.backend == NotifierBackend::Webhook {
        match &config.notifier.webhook {
            Some(webhook) if !webhook.url.is_empty() => {}
            _ => {
                return Err(invalid(
                    "notifier.webhook.url is required when notifier.backend = \"webhook\"",
                ))
            }
        }
    }

    Ok(())
}
