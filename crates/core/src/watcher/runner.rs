//! Download watcher loop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::download_client::{DownloadClient, DownloadJob};
use crate::processor::{ProcessingError, ReleaseProcessor};

use super::config::WatcherConfig;
use super::{PollSummary, WatcherError};

/// Polls a download client and imports completed downloads.
pub struct DownloadWatcher {
    client: Arc<dyn DownloadClient>,
    processor: Arc<ReleaseProcessor>,
    config: WatcherConfig,
    /// Hashes imported during this process lifetime.
    handled: RwLock<HashSet<String>>,
}

impl DownloadWatcher {
    pub fn new(
        client: Arc<dyn DownloadClient>,
        processor: Arc<ReleaseProcessor>,
        config: WatcherConfig,
    ) -> Self {
        Self {
            client,
            processor,
            config,
            handled: RwLock::new(HashSet::new()),
        }
    }

    pub async fn is_handled(&self, hash: &str) -> bool {
        self.handled.read().await.contains(hash)
    }

    /// Runs a single poll: list completed downloads and import unseen ones.
    pub async fn poll_once(&self) -> Result<PollSummary, WatcherError> {
        let jobs = self.client.list_completed().await?;
        let mut summary = PollSummary {
            seen: jobs.len(),
            ..PollSummary::default()
        };

        for job in jobs {
            if self.is_handled(&job.hash).await {
                summary.skipped += 1;
                continue;
            }

            info!("Detected completed torrent: {}", job.name);
            match self.processor.process_job(&job).await {
                Ok(report) => {
                    info!(
                        "Finished {}: {} placed, {} failed",
                        job.name,
                        report.placed_count(),
                        report.failed_count()
                    );
                    summary.processed += 1;
                    summary.files_placed += report.placed_count();
                    self.finish(&job).await;
                }
                Err(ProcessingError::NotFound { .. }) => {
                    summary.not_found += 1;
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", job.name, e);
                    summary.errors += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Removes the job from the client if configured and marks it handled.
    async fn finish(&self, job: &DownloadJob) {
        if self.config.remove_completed {
            match self
                .client
                .remove(&job.hash, self.config.delete_files)
                .await
            {
                Ok(()) => info!("Removed torrent from {}: {}", self.client.name(), job.hash),
                Err(e) => warn!("Failed to remove torrent {}: {}", job.hash, e),
            }
        }
        self.handled.write().await.insert(job.hash.clone());
    }

    /// Authenticates, then polls until `shutdown` fires.
    ///
    /// Only authentication failures end the loop with an error.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<(), WatcherError> {
        self.client.authenticate().await?;
        info!("Monitoring for completed downloads... Press Ctrl+C to stop.");

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        loop {
            match self.poll_once().await {
                Ok(summary) => debug!("Poll finished: {:?}", summary),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => warn!("Poll failed: {}", e),
            }

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Stopped monitoring.");
                    return Ok(());
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LibraryConfig;
    use crate::download_client::DownloadClientError;
    use crate::matcher::{DirectoryMatcher, MatcherConfig};
    use crate::naming::TitleYearExtractor;
    use crate::placer::FsPlacer;
    use crate::testing::{fixtures, MockDownloadClient, MockMetadataLookup, RecordingNotifier};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use tokio::fs;

    struct Harness {
        _temp: TempDir,
        downloads: PathBuf,
        library: PathBuf,
        client: MockDownloadClient,
        watcher: DownloadWatcher,
    }

    async fn harness(config: WatcherConfig) -> Harness {
        let temp = TempDir::new().unwrap();
        let downloads = temp.path().join("downloads");
        let library = temp.path().join("library");
        fs::create_dir(&downloads).await.unwrap();
        fs::create_dir(&library).await.unwrap();

        let processor = ReleaseProcessor::new(
            &LibraryConfig {
                destination_root: library.clone(),
                staging_dir: temp.path().join("staging"),
            },
            DirectoryMatcher::new(&MatcherConfig::default()),
            TitleYearExtractor::new(Arc::new(MockMetadataLookup::new())),
            Arc::new(FsPlacer::with_defaults()),
            Arc::new(RecordingNotifier::new()),
        );
        processor.prepare().await.unwrap();

        let client = MockDownloadClient::new();
        let watcher = DownloadWatcher::new(Arc::new(client.clone()), Arc::new(processor), config);

        Harness {
            _temp: temp,
            downloads,
            library,
            client,
            watcher,
        }
    }

    async fn add_release(h: &Harness, hash: &str, dir: &str, file: &str) {
        let path = h.downloads.join(dir);
        fs::create_dir_all(&path).await.unwrap();
        fs::write(path.join(file), "video").await.unwrap();
        h.client
            .add_completed(fixtures::download_job(hash, dir, &h.downloads))
            .await;
    }

    #[tokio::test]
    async fn test_poll_imports_and_removes() {
        let h = harness(WatcherConfig::default()).await;
        add_release(&h, "abc123", "Heat.1995", "Heat.1995.1080p.mkv").await;

        let summary = h.watcher.poll_once().await.unwrap();

        assert_eq!(summary.processed, 1);
        assert_eq!(summary.files_placed, 1);
        assert!(h.library.join("Heat_(1995).mkv").exists());
        assert!(h.watcher.is_handled("abc123").await);

        let removals = h.client.removals().await;
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].hash, "abc123");
        assert!(!removals[0].delete_files);
    }

    #[tokio::test]
    async fn test_handled_jobs_are_skipped() {
        let h = harness(WatcherConfig {
            remove_completed: false,
            ..WatcherConfig::default()
        })
        .await;
        add_release(&h, "abc123", "Heat.1995", "Heat.1995.mkv").await;

        h.watcher.poll_once().await.unwrap();
        let second = h.watcher.poll_once().await.unwrap();

        assert_eq!(second.seen, 1);
        assert_eq!(second.skipped, 1);
        assert_eq!(second.processed, 0);
        assert!(h.client.removals().await.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_retried() {
        let h = harness(WatcherConfig::default()).await;
        h.client
            .add_completed(fixtures::download_job("ffff", "Missing.Release.2010", &h.downloads))
            .await;

        let first = h.watcher.poll_once().await.unwrap();
        assert_eq!(first.not_found, 1);
        assert!(!h.watcher.is_handled("ffff").await);

        let path = h.downloads.join("Missing.Release.2010");
        fs::create_dir(&path).await.unwrap();
        fs::write(path.join("Missing.Release.2010.mkv"), "video").await.unwrap();

        let second = h.watcher.poll_once().await.unwrap();
        assert_eq!(second.processed, 1);
        assert!(h.library.join("Missing_Release_(2010).mkv").exists());
    }

    #[tokio::test]
    async fn test_list_error_is_reported() {
        let h = harness(WatcherConfig::default()).await;
        h.client.set_next_error(DownloadClientError::Timeout).await;

        let err = h.watcher.poll_once().await.unwrap_err();

        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn test_run_fails_on_rejected_login() {
        let h = harness(WatcherConfig::default()).await;
        h.client.set_reject_login(true).await;
        let (_tx, rx) = broadcast::channel(1);

        let err = h.watcher.run(rx).await.unwrap_err();

        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let h = harness(WatcherConfig {
            poll_interval_ms: 10,
            ..WatcherConfig::default()
        })
        .await;
        add_release(&h, "abc123", "Heat.1995", "Heat.1995.mkv").await;
        let (tx, rx) = broadcast::channel(1);

        let stopper = async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.send(()).unwrap();
        };
        let (result, ()) = tokio::join!(h.watcher.run(rx), stopper);

        assert!(result.is_ok());
        assert_eq!(h.client.login_count().await, 1);
        assert!(h.library.join("Heat_(1995).mkv").exists());
    }
}
