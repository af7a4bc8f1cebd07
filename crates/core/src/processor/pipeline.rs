//! Release processor implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::LibraryConfig;
use crate::download_client::DownloadJob;
use crate::matcher::DirectoryMatcher;
use crate::naming::{is_video_file, TitleYearExtractor};
use crate::notify::{Notification, Notifier};
use crate::placer::{PlacedFile, Placer, PlacerError};

use super::types::{FileOutcome, ProcessingError, ReleaseReport};

/// Imports completed downloads into the library, one release at a time.
pub struct ReleaseProcessor {
    matcher: DirectoryMatcher,
    extractor: TitleYearExtractor,
    placer: Arc<dyn Placer>,
    notifier: Arc<dyn Notifier>,
    destination_root: PathBuf,
    staging_dir: PathBuf,
}

impl ReleaseProcessor {
    pub fn new(
        library: &LibraryConfig,
        matcher: DirectoryMatcher,
        extractor: TitleYearExtractor,
        placer: Arc<dyn Placer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            matcher,
            extractor,
            placer,
            notifier,
            destination_root: library.destination_root.clone(),
            staging_dir: library.staging_dir.clone(),
        }
    }

    /// Creates the staging directory and checks the library root.
    ///
    /// A missing library root is only reported; each placement fails with
    /// `DestinationMissing` until it appears.
    pub async fn prepare(&self) -> Result<(), ProcessingError> {
        fs::create_dir_all(&self.staging_dir).await?;

        if let Err(e) = self.placer.validate(&self.destination_root).await {
            warn!("{}", e);
        }
        Ok(())
    }

    /// Processes a download reported by the download client.
    pub async fn process_job(&self, job: &DownloadJob) -> Result<ReleaseReport, ProcessingError> {
        self.process_release(&job.save_path, &job.name).await
    }

    /// Resolves `name` under `base` and imports every video file it contains.
    ///
    /// Returns `NotFound` without touching anything when no entry matches.
    /// Otherwise the download directory is removed afterwards, whatever the
    /// per-file outcomes, unless a file could not be staged.
    pub async fn process_release(
        &self,
        base: &Path,
        name: &str,
    ) -> Result<ReleaseReport, ProcessingError> {
        let Some(resolved) = self.matcher.resolve(base, name).await else {
            warn!("Could not find matching directory for: {}", name);
            return Err(ProcessingError::NotFound {
                name: name.to_string(),
                base: base.to_path_buf(),
            });
        };

        let is_dir = fs::metadata(&resolved).await?.is_dir();
        let files = if is_dir {
            collect_video_files(&resolved).await?
        } else if is_video_file(&resolved) {
            vec![resolved.clone()]
        } else {
            info!("Skipped: {} (unsupported extension)", resolved.display());
            Vec::new()
        };

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let result = self.process_file(&file).await;
            self.notify_outcome(&file, &result).await;
            outcomes.push(FileOutcome {
                source: file,
                result,
            });
        }

        let unstaged = outcomes
            .iter()
            .filter(|o| matches!(o.result, Err(ProcessingError::StagingFailed(_))))
            .count();

        let source_removed = if !is_dir {
            false
        } else if unstaged > 0 {
            warn!(
                "Keeping {}: {} file(s) could not be staged",
                resolved.display(),
                unstaged
            );
            false
        } else {
            info!("Removing directory: {}", resolved.display());
            match fs::remove_dir_all(&resolved).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to remove {}: {}", resolved.display(), e);
                    false
                }
            }
        };

        Ok(ReleaseReport {
            name: name.to_string(),
            resolved,
            files: outcomes,
            source_removed,
        })
    }

    /// Stage, rename, then place a single file.
    async fn process_file(&self, file: &Path) -> Result<PlacedFile, ProcessingError> {
        info!(
            "Moving movie {} -> {}",
            file.display(),
            self.staging_dir.display()
        );
        let staged = self
            .placer
            .place(file, &self.staging_dir)
            .await
            .map_err(ProcessingError::StagingFailed)?;

        let canonical = self.extractor.extract_and_rename(&staged.destination).await?;

        self.placer
            .place(&canonical.path, &self.destination_root)
            .await
            .map_err(|e| {
                log_placement_error(&e);
                ProcessingError::from_placement(e)
            })
    }

    async fn notify_outcome(&self, file: &Path, result: &Result<PlacedFile, ProcessingError>) {
        let notification = match result {
            Ok(placed) => Notification::imported(&file_name(&placed.destination)),
            Err(e) => Notification::failed(&file_name(file), e),
        };

        if let Err(e) = self.notifier.notify(&notification).await {
            warn!("Failed to send notification via {}: {}", self.notifier.name(), e);
        }
    }
}

fn log_placement_error(error: &PlacerError) {
    match error {
        PlacerError::DestinationMissing { path } => warn!(
            "Destination folder '{}' does not exist. File not moved.",
            path.display()
        ),
        PlacerError::DestinationExists { path } => {
            warn!("File already exists at destination: {}", path.display())
        }
        other => warn!("Failed to move file: {}", other),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Video files below `dir`, sorted by path.
async fn collect_video_files(dir: &Path) -> Result<Vec<PathBuf>, ProcessingError> {
    let dir = dir.to_path_buf();
    let files = tokio::task::spawn_blocking(move || {
        let mut files: Vec<PathBuf> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Error scanning {}: {}", dir.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_video_file(path))
            .collect();
        files.sort();
        files
    })
    .await
    .map_err(|e| ProcessingError::Io(std::io::Error::other(e)))?;

    Ok(files)
}
