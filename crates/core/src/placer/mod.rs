//! Placer module for moving files into the library.
//!
//! This module provides the `Placer` trait and a filesystem implementation
//! that relocates a single file into a flat destination directory.
//!
//! # Features
//!
//! - Atomic moves when source and destination are on the same filesystem
//! - Automatic fallback to copy + delete across filesystems
//! - Optional checksum verification after copying
//! - Never overwrites an existing entry
//!
//! # Example
//!
//! ```ignore
//! use reelhouse_core::placer::{FsPlacer, Placer};
//!
//! let placer = FsPlacer::with_defaults();
//! let placed = placer
//!     .place(Path::new("/staging/Movie_Title_(2015).mkv"), Path::new("/library"))
//!     .await?;
//! println!("Placed {} ({} bytes)", placed.destination.display(), placed.size_bytes);
//! ```

mod config;
mod error;
mod fs_placer;
mod traits;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use traits::Placer;
pub use types::{MoveMethod, PlacedFile, SkipReason};
