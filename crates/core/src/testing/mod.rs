//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits
//! (metadata provider, download client, notifier), allowing the whole import
//! pipeline to be exercised against a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use reelhouse_core::testing::{fixtures, MockDownloadClient, MockMetadataLookup};
//!
//! let lookup = MockMetadataLookup::new();
//! lookup.set_response("Some Movie", YearLookup::Found(ReleaseYear::new(2019).unwrap())).await;
//!
//! let client = MockDownloadClient::new();
//! client.add_completed(fixtures::download_job("abc123", "Some.Movie.1080p", downloads)).await;
//! ```

mod mock_download_client;
mod mock_metadata;
mod mock_notifier;

pub use mock_download_client::{MockDownloadClient, RecordedRemoval};
pub use mock_metadata::{MockMetadataLookup, MockMovieCatalog, RecordedCatalogQuery};
pub use mock_notifier::RecordingNotifier;

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::Path;

    use crate::download_client::DownloadJob;
    use crate::metadata::CatalogMovie;

    /// Create a theatrical catalog entry.
    pub fn catalog_movie(id: u32, title: &str, release_date: &str) -> CatalogMovie {
        CatalogMovie {
            id,
            title: title.to_string(),
            original_title: Some(title.to_string()),
            release_date: Some(release_date.to_string()),
            runtime_minutes: Some(120),
            video: false,
        }
    }

    /// Create a completed download saved under `save_path`.
    pub fn download_job(hash: &str, name: &str, save_path: &Path) -> DownloadJob {
        DownloadJob {
            hash: hash.to_string(),
            name: name.to_string(),
            save_path: save_path.to_path_buf(),
            completed_at: Some(chrono::Utc::now()),
        }
    }
}
