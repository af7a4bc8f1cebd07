//! Per-release import pipeline.
//!
//! `ReleaseProcessor` takes one completed download from the directory the
//! download client reported to the library:
//!
//! 1. resolve the on-disk entry with the `DirectoryMatcher`
//! 2. stage each video file into the staging directory
//! 3. rename it to `Title_(Year).ext`
//! 4. place it into the library root and notify
//! 5. remove the download directory
//!
//! Failures are local to one file; the release carries on.
//!
//! # Example
//!
//! ```ignore
//! use reelhouse_core::processor::ReleaseProcessor;
//!
//! let processor = ReleaseProcessor::new(&config.library, matcher, extractor, placer, notifier);
//! processor.prepare().await?;
//!
//! let report = processor.process_release(Path::new("/downloads"), "The.Movie (2015)").await?;
//! println!("{} placed, {} failed", report.placed_count(), report.failed_count());
//! ```

mod pipeline;
mod types;

pub use pipeline::ReleaseProcessor;
pub use types::{FileOutcome, ProcessingError, ReleaseReport};
