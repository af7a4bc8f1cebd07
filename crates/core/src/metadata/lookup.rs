//! `MetadataLookup` implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::naming::ReleaseYear;

use super::{CatalogError, LookupError, MetadataLookup, MovieCatalog, YearLookup};

/// Year lookup backed by a movie catalog, bounded by a deadline.
///
/// Takes the first theatrical search result, fetches its full record and
/// validates the year. A lookup that exceeds the deadline is cancelled and
/// reported as `LookupError::Timeout`.
pub struct CatalogYearLookup {
    catalog: Arc<dyn MovieCatalog>,
    timeout: Duration,
}

impl CatalogYearLookup {
    pub fn new(catalog: Arc<dyn MovieCatalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    async fn resolve(&self, title: &str) -> Result<YearLookup, CatalogError> {
        let results = self.catalog.search_movies(title).await?;

        let Some(best) = results.into_iter().find(|m| m.is_theatrical()) else {
            return Ok(YearLookup::NoMatch);
        };

        debug!(
            "{} best match for '{}': {} (id {})",
            self.catalog.name(),
            title,
            best.title,
            best.id
        );

        let movie = self.catalog.get_movie(best.id).await?;
        let raw = movie.year_str().unwrap_or_default();

        Ok(match ReleaseYear::parse(raw) {
            Some(year) => YearLookup::Found(year),
            None => YearLookup::InvalidYear(raw.to_string()),
        })
    }
}

#[async_trait]
impl MetadataLookup for CatalogYearLookup {
    fn name(&self) -> &str {
        self.catalog.name()
    }

    async fn lookup_year(&self, title: &str) -> Result<YearLookup, LookupError> {
        match tokio::time::timeout(self.timeout, self.resolve(title)).await {
            Ok(result) => result.map_err(LookupError::from),
            Err(_) => Err(LookupError::Timeout(self.timeout)),
        }
    }
}

/// Lookup used when no provider is configured: every call fails, so files
/// without a year token are rejected rather than named without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledLookup;

#[async_trait]
impl MetadataLookup for DisabledLookup {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn lookup_year(&self, _title: &str) -> Result<YearLookup, LookupError> {
        Err(LookupError::NotConfigured)
    }
}
