//! Error types for the placer module.

use std::path::PathBuf;
use thiserror::Error;

use super::types::SkipReason;

/// Errors that can occur during file placement.
#[derive(Debug, Error)]
pub enum PlacerError {
    /// The destination root does not exist. It is never created on demand.
    #[error("Destination directory does not exist: {path}")]
    DestinationMissing { path: PathBuf },

    /// Source file not found.
    #[error("Source file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// An entry with the same name already exists at the destination.
    #[error("Destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    /// Source is not a regular file with a name.
    #[error("Invalid source {path}: {reason}")]
    InvalidSource { path: PathBuf, reason: String },

    /// Failed to copy file.
    #[error("Failed to copy file from {from} to {to}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to move/rename file.
    #[error("Failed to move file from {from} to {to}")]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Checksum verification failed.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Failed to calculate checksum.
    #[error("Failed to calculate checksum for {path}")]
    ChecksumCalculationFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacerError {
    /// Creates a copy failed error.
    pub fn copy_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::CopyFailed { from, to, error }
    }

    /// Creates a move failed error.
    pub fn move_failed(from: PathBuf, to: PathBuf, error: std::io::Error) -> Self {
        Self::MoveFailed { from, to, error }
    }

    /// The skip reason for precondition failures, `None` for I/O failures.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::DestinationMissing { .. } => Some(SkipReason::DestinationMissing),
            Self::SourceNotFound { .. } => Some(SkipReason::SourceMissing),
            Self::DestinationExists { .. } => Some(SkipReason::Collision),
            _ => None,
        }
    }
}
