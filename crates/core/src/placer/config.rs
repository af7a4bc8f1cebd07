//! `[placer]` settings.

use serde::{Deserialize, Serialize};

/// Copy chunk used when a move crosses filesystems.
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024 * 1024;

/// How `FsPlacer` moves files into the staging directory and the library.
///
/// Every field is optional in TOML; an empty `[placer]` section (or none at
/// all) yields `PlacerConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacerConfig {
    /// Chunk size for the copy fallback, in bytes.
    pub buffer_size: usize,
    /// Try `rename` first. When false every move is a copy followed by a
    /// delete, even on the same volume.
    pub prefer_atomic_moves: bool,
    /// Hash source and copy with SHA-256 and refuse to delete the source on
    /// mismatch. Only applies to the copy fallback.
    pub verify_checksums: bool,
}

impl Default for PlacerConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            prefer_atomic_moves: true,
            verify_checksums: false,
        }
    }
}

impl PlacerConfig {
    pub fn with_atomic_moves(self, prefer_atomic_moves: bool) -> Self {
        Self {
            prefer_atomic_moves,
            ..self
        }
    }

    pub fn with_checksum_verification(self, verify_checksums: bool) -> Self {
        Self {
            verify_checksums,
            ..self
        }
    }

    pub fn with_buffer_size(self, buffer_size: usize) -> Self {
        Self {
            buffer_size,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_uses_defaults() {
        let config: PlacerConfig = toml::from_str("").unwrap();
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert!(config.prefer_atomic_moves);
        assert!(!config.verify_checksums);
    }

    #[test]
    fn test_copy_only_with_verification() {
        let config: PlacerConfig =
            toml::from_str("prefer_atomic_moves = false\nverify_checksums = true").unwrap();
        assert!(!config.prefer_atomic_moves);
        assert!(config.verify_checksums);

        let tuned = config.with_buffer_size(64 * 1024).with_atomic_moves(true);
        assert_eq!(tuned.buffer_size, 64 * 1024);
        assert!(tuned.prefer_atomic_moves);
        assert!(tuned.verify_checksums);
    }
}
