//! Trait definitions for the placer module.

use async_trait::async_trait;
use std::path::Path;

use super::error::PlacerError;
use super::types::PlacedFile;

/// A placer that moves a file into a flat destination directory.
#[async_trait]
pub trait Placer: Send + Sync {
    /// Returns the name of this placer implementation.
    fn name(&self) -> &str;

    /// Moves `source` to `destination_root/<file name>`.
    ///
    /// Never overwrites: an existing entry with the same name yields
    /// `PlacerError::DestinationExists` and leaves both files untouched.
    async fn place(&self, source: &Path, destination_root: &Path)
        -> Result<PlacedFile, PlacerError>;

    /// Checks that `destination_root` exists and is a directory.
    async fn validate(&self, destination_root: &Path) -> Result<(), PlacerError>;
}
