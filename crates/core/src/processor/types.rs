//! Types for the release processor.

use std::path::PathBuf;
use thiserror::Error;

use crate::naming::NamingError;
use crate::placer::{PlacedFile, PlacerError, SkipReason};

/// Errors raised while importing a release or one of its files.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// No entry under the base directory matched the release name.
    #[error("No match for '{name}' in {base}")]
    NotFound { name: String, base: PathBuf },

    /// The file could not be moved into the staging directory.
    #[error("Failed to stage file: {0}")]
    StagingFailed(#[source] PlacerError),

    #[error(transparent)]
    Naming(#[from] NamingError),

    /// The library refused the file; nothing was modified.
    #[error("Placement skipped ({reason}): {error}")]
    PlacementSkipped {
        reason: SkipReason,
        #[source]
        error: PlacerError,
    },

    #[error("Placement failed: {0}")]
    PlacementFailed(#[source] PlacerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProcessingError {
    pub(crate) fn from_placement(error: PlacerError) -> Self {
        match error.skip_reason() {
            Some(reason) => Self::PlacementSkipped { reason, error },
            None => Self::PlacementFailed(error),
        }
    }
}

/// Result for a single video file of a release.
#[derive(Debug)]
pub struct FileOutcome {
    /// Path of the file inside the download.
    pub source: PathBuf,
    pub result: Result<PlacedFile, ProcessingError>,
}

impl FileOutcome {
    pub fn is_placed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Summary of one processed release.
#[derive(Debug)]
pub struct ReleaseReport {
    /// Nominal name reported by the download client.
    pub name: String,
    /// Entry the name resolved to.
    pub resolved: PathBuf,
    pub files: Vec<FileOutcome>,
    /// Whether the download directory was deleted afterwards.
    pub source_removed: bool,
}

impl ReleaseReport {
    pub fn placed_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_placed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.placed_count()
    }

    pub fn placed(&self) -> impl Iterator<Item = &PlacedFile> {
        self.files.iter().filter_map(|f| f.result.as_ref().ok())
    }
}
