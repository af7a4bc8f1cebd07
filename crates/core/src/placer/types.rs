//! Types for the placer module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a file reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveMethod {
    /// Same-volume rename.
    Rename,
    /// Buffered copy followed by deletion of the source.
    Copy,
}

/// Information about a placed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedFile {
    /// Where the file came from.
    pub source: PathBuf,
    /// Final destination path.
    pub destination: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// SHA-256 of the placed file, when verification is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    pub method: MoveMethod,
}

/// Why a placement was skipped without touching any file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    DestinationMissing,
    SourceMissing,
    Collision,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DestinationMissing => "destination missing",
            Self::SourceMissing => "source missing",
            Self::Collision => "collision",
        };
        f.write_str(s)
    }
}
