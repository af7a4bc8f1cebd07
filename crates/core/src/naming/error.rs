//! Error types for the naming module.

use std::path::PathBuf;
use thiserror::Error;

use crate::metadata::LookupError;

/// Reasons a file could not be given a canonical name.
#[derive(Debug, Error)]
pub enum NamingError {
    /// Extension is not in the video whitelist.
    #[error("Unsupported extension: {file_name}")]
    UnsupportedExtension { file_name: String },

    /// No year in the filename and the metadata provider did not supply one.
    #[error("Metadata lookup failed for '{title}': {reason}")]
    LookupFailed {
        title: String,
        #[source]
        reason: LookupFailure,
    },

    /// Renaming the file in place failed.
    #[error("Failed to rename {} to {}", from.display(), to.display())]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

/// Why the metadata escalation did not produce a year.
#[derive(Debug, Error)]
pub enum LookupFailure {
    #[error("title is empty")]
    EmptyTitle,

    #[error("search returned no results")]
    NoMatch,

    #[error("year '{0}' is not valid")]
    InvalidYear(String),

    #[error(transparent)]
    Provider(#[from] LookupError),
}
