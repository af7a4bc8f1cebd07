//! File system placer implementation.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::traits::Placer;
use super::types::{MoveMethod, PlacedFile};

/// File system based placer implementation.
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Attempts to move a file atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux)
                if e.kind() == std::io::ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies a file into a newly created destination, optionally hashing it.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                PlacerError::Io(e)
            }
        })?;

        // create_new: never replace an entry created after the existence check.
        let dest_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    PlacerError::DestinationExists {
                        path: destination.to_path_buf(),
                    }
                } else {
                    PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
                }
            })?;

        let result = self
            .stream_copy(source, destination, source_file, dest_file, calculate_checksum)
            .await;

        if result.is_err() {
            if let Err(e) = fs::remove_file(destination).await {
                warn!(
                    "Failed to remove partial copy {}: {}",
                    destination.display(),
                    e
                );
            }
        }

        result
    }

    async fn stream_copy(
        &self,
        source: &Path,
        destination: &Path,
        source_file: File,
        dest_file: File,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);

        let mut hasher = if calculate_checksum {
            Some(Sha256::new())
        } else {
            None
        };

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let checksum = hasher.map(|h| format!("{:x}", h.finalize()));

        Ok((total_bytes, checksum))
    }

    /// Calculates the SHA-256 checksum of a file.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path)
            .await
            .map_err(|e| PlacerError::ChecksumCalculationFailed {
                path: path.to_path_buf(),
                error: e,
            })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::ChecksumCalculationFailed {
                    path: path.to_path_buf(),
                    error: e,
                }
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Copies `source` to `destination`, verifies it if configured, then
    /// removes the source.
    async fn copy_then_delete(
        &self,
        source: &Path,
        destination: &Path,
        permissions: std::fs::Permissions,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let verify = self.config.verify_checksums;
        let (size_bytes, source_checksum) = self.copy_file(source, destination, verify).await?;

        if let Some(expected) = &source_checksum {
            let actual = self.calculate_checksum(destination).await?;
            if &actual != expected {
                if let Err(e) = fs::remove_file(destination).await {
                    warn!("Failed to remove corrupt copy {}: {}", destination.display(), e);
                }
                return Err(PlacerError::ChecksumMismatch {
                    path: destination.to_path_buf(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        if let Err(e) = fs::set_permissions(destination, permissions).await {
            warn!(
                "Failed to copy permissions to {}: {}",
                destination.display(),
                e
            );
        }

        if let Err(e) = fs::remove_file(source).await {
            // Log but don't fail - the file is already placed
            warn!("Failed to remove source file {}: {}", source.display(), e);
        }

        Ok((size_bytes, source_checksum))
    }

    fn destination_for(source: &Path, destination_root: &Path) -> Result<PathBuf, PlacerError> {
        let file_name = source
            .file_name()
            .ok_or_else(|| PlacerError::InvalidSource {
                path: source.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?;
        Ok(destination_root.join(file_name))
    }
}

#[async_trait]
impl Placer for FsPlacer {
    fn name(&self) -> &str {
        "fs"
    }

    async fn place(
        &self,
        source: &Path,
        destination_root: &Path,
    ) -> Result<PlacedFile, PlacerError> {
        self.validate(destination_root).await?;

        let destination = Self::destination_for(source, destination_root)?;

        let source_meta = match fs::metadata(source).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                })
            }
            Err(e) => return Err(PlacerError::Io(e)),
        };
        if !source_meta.is_file() {
            return Err(PlacerError::InvalidSource {
                path: source.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        if fs::symlink_metadata(&destination).await.is_ok() {
            return Err(PlacerError::DestinationExists { path: destination });
        }

        let moved = if self.config.prefer_atomic_moves {
            Self::try_atomic_move(source, &destination)
                .await
                .map_err(|e| {
                    PlacerError::move_failed(source.to_path_buf(), destination.clone(), e)
                })?
        } else {
            false
        };

        let (size_bytes, checksum, method) = if moved {
            let checksum = if self.config.verify_checksums {
                Some(self.calculate_checksum(&destination).await?)
            } else {
                None
            };
            (source_meta.len(), checksum, MoveMethod::Rename)
        } else {
            debug!(
                "Copying {} to {} (rename unavailable)",
                source.display(),
                destination.display()
            );
            let (size, checksum) = self
                .copy_then_delete(source, &destination, source_meta.permissions())
                .await?;
            (size, checksum, MoveMethod::Copy)
        };

        info!("Moved {} -> {}", source.display(), destination.display());

        Ok(PlacedFile {
            source: source.to_path_buf(),
            destination,
            size_bytes,
            checksum,
            method,
        })
    }

    async fn validate(&self, destination_root: &Path) -> Result<(), PlacerError> {
        match fs::metadata(destination_root).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(PlacerError::DestinationMissing {
                path: destination_root.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placer::SkipReason;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp = TempDir::new().unwrap();
        let staging = temp.path().join("staging");
        let library = temp.path().join("library");
        fs::create_dir(&staging).await.unwrap();
        fs::create_dir(&library).await.unwrap();
        (temp, staging, library)
    }

    #[tokio::test]
    async fn test_place_with_rename() {
        let (_temp, staging, library) = setup().await;
        let source = staging.join("Movie_Title_(2015).mkv");
        fs::write(&source, "video bytes").await.unwrap();

        let placer = FsPlacer::with_defaults();
        let placed = placer.place(&source, &library).await.unwrap();

        assert_eq!(placed.destination, library.join("Movie_Title_(2015).mkv"));
        assert_eq!(placed.method, MoveMethod::Rename);
        assert_eq!(placed.size_bytes, 11);
        assert!(!source.exists());
        assert_eq!(
            fs::read_to_string(&placed.destination).await.unwrap(),
            "video bytes"
        );
    }

    #[tokio::test]
    async fn test_place_with_copy_removes_source() {
        let (_temp, staging, library) = setup().await;
        let source = staging.join("Movie_(2001).mp4");
        fs::write(&source, "test content").await.unwrap();

        let placer = FsPlacer::new(PlacerConfig::default().with_atomic_moves(false));
        let placed = placer.place(&source, &library).await.unwrap();

        assert_eq!(placed.method, MoveMethod::Copy);
        assert!(placed.destination.exists());
        assert!(!source.exists());
    }

    #[tokio::test]
    async fn test_checksum_verification() {
        let (_temp, staging, library) = setup().await;
        let source = staging.join("Movie_(2001).mp4");
        fs::write(&source, "test content for checksum").await.unwrap();

        let placer = FsPlacer::new(
            PlacerConfig::default()
                .with_atomic_moves(false)
                .with_checksum_verification(true)
                .with_buffer_size(4),
        );
        let placed = placer.place(&source, &library).await.unwrap();

        let expected = format!("{:x}", Sha256::digest(b"test content for checksum"));
        assert_eq!(placed.checksum, Some(expected));
    }

    #[tokio::test]
    async fn test_collision_leaves_both_files() {
        let (_temp, staging, library) = setup().await;
        let source = staging.join("Movie_Title_(2015).mkv");
        let existing = library.join("Movie_Title_(2015).mkv");
        fs::write(&source, "new").await.unwrap();
        fs::write(&existing, "old").await.unwrap();

        let placer = FsPlacer::with_defaults();
        let err = placer.place(&source, &library).await.unwrap_err();

        assert!(matches!(err, PlacerError::DestinationExists { .. }));
        assert_eq!(err.skip_reason(), Some(SkipReason::Collision));
        assert_eq!(fs::read_to_string(&source).await.unwrap(), "new");
        assert_eq!(fs::read_to_string(&existing).await.unwrap(), "old");
    }

    #[tokio::test]
    async fn test_collision_on_copy_path() {
        let (_temp, staging, library) = setup().await;
        let source = staging.join("A_(2000).avi");
        fs::write(&source, "new").await.unwrap();
        fs::write(library.join("A_(2000).avi"), "old").await.unwrap();

        let placer = FsPlacer::new(PlacerConfig::default().with_atomic_moves(false));
        let err = placer.place(&source, &library).await.unwrap_err();

        assert!(matches!(err, PlacerError::DestinationExists { .. }));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_missing_destination_root() {
        let (temp, staging, _library) = setup().await;
        let source = staging.join("A_(2000).avi");
        fs::write(&source, "data").await.unwrap();
        let missing = temp.path().join("nope");

        let placer = FsPlacer::with_defaults();
        let err = placer.place(&source, &missing).await.unwrap_err();

        assert_eq!(err.skip_reason(), Some(SkipReason::DestinationMissing));
        assert!(!missing.exists());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_missing_source() {
        let (_temp, staging, library) = setup().await;

        let placer = FsPlacer::with_defaults();
        let err = placer
            .place(&staging.join("gone.mkv"), &library)
            .await
            .unwrap_err();

        assert_eq!(err.skip_reason(), Some(SkipReason::SourceMissing));
    }

    #[tokio::test]
    async fn test_directory_source_rejected() {
        let (_temp, staging, library) = setup().await;
        let dir = staging.join("folder.mkv");
        fs::create_dir(&dir).await.unwrap();

        let placer = FsPlacer::with_defaults();
        let err = placer.place(&dir, &library).await.unwrap_err();

        assert!(matches!(err, PlacerError::InvalidSource { .. }));
    }

    #[tokio::test]
    async fn test_validate() {
        let (temp, _staging, library) = setup().await;
        let placer = FsPlacer::with_defaults();

        assert!(placer.validate(&library).await.is_ok());
        assert!(placer.validate(&temp.path().join("missing")).await.is_err());
    }
}
