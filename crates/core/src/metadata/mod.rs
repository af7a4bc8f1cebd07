//! Metadata lookup for filenames that carry no release year.
//!
//! `MovieCatalog` is the narrow view of an external provider (TMDB) that the
//! engine needs; `MetadataLookup` is what the title extractor calls. The
//! provider client is injected, never global, so tests can substitute
//! `testing::MockMovieCatalog` or `testing::MockMetadataLookup`.

mod lookup;
mod tmdb;
mod types;

pub use lookup::{CatalogYearLookup, DisabledLookup};
pub use tmdb::{TmdbClient, TmdbConfig};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{MetadataBackend, MetadataConfig};

/// Errors that can occur when talking to a metadata catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Errors surfaced by a `MetadataLookup`.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Metadata lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("No metadata provider configured")]
    NotConfigured,

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A movie catalog that can be searched by title.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Search for movies by title, best-ranked first.
    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError>;

    /// Fetch the full record of a movie.
    async fn get_movie(&self, id: u32) -> Result<CatalogMovie, CatalogError>;
}

/// Resolves a title to its release year.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Looks up the release year of the best-ranked theatrical film matching
    /// `title`. Transport and parsing failures come back as `LookupError`.
    async fn lookup_year(&self, title: &str) -> Result<YearLookup, LookupError>;
}

/// Build the year lookup for the configured provider.
///
/// Without a `[metadata]` section every lookup fails, so files without an
/// explicit year are rejected.
pub fn create_year_lookup(
    config: Option<&MetadataConfig>,
) -> Result<Arc<dyn MetadataLookup>, CatalogError> {
    let Some(config) = config else {
        return Ok(Arc::new(DisabledLookup));
    };

    let timeout = Duration::from_secs(config.timeout_secs as u64);
    match config.backend {
        MetadataBackend::Tmdb => {
            let tmdb = config.tmdb.clone().ok_or_else(|| {
                CatalogError::NotConfigured(
                    "[metadata.tmdb] must be set when backend = \"tmdb\"".to_string(),
                )
            })?;
            let catalog = Arc::new(TmdbClient::new(tmdb)?);
            Ok(Arc::new(CatalogYearLookup::new(catalog, timeout)))
        }
    }
}
