//! Mock metadata catalog and year lookup for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::metadata::{
    CatalogError, CatalogMovie, LookupError, MetadataLookup, MovieCatalog, YearLookup,
};

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    SearchMovies { query: String },
    GetMovie { id: u32 },
}

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable movie records, in insertion order
/// - Track queries for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use reelhouse_core::testing::{MockMovieCatalog, fixtures};
///
/// let catalog = MockMovieCatalog::new();
/// catalog.add_movie(fixtures::catalog_movie(603, "The Matrix", "1999-03-30")).await;
///
/// let results = catalog.search_movies("matrix").await?;
/// assert_eq!(results.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockMovieCatalog {
    /// Movies in insertion order.
    movies: Arc<RwLock<Vec<CatalogMovie>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
    /// Artificial latency applied to every call.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl Default for MockMovieCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMovieCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self {
            movies: Arc::new(RwLock::new(Vec::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Add a movie. Search results keep insertion order.
    pub async fn add_movie(&self, movie: CatalogMovie) {
        self.movies.write().await.push(movie);
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every call by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    async fn begin(&self, query: RecordedCatalogQuery) -> Result<(), CatalogError> {
        self.queries.write().await.push(query);

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MovieCatalog for MockMovieCatalog {
    fn name(&self) -> &str {
        "mock-catalog"
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        self.begin(RecordedCatalogQuery::SearchMovies {
            query: query.to_string(),
        })
        .await?;

        let needle = query.to_lowercase();
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_movie(&self, id: u32) -> Result<CatalogMovie, CatalogError> {
        self.begin(RecordedCatalogQuery::GetMovie { id }).await?;

        self.movies
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("Movie ID {}", id)))
    }
}

/// Mock implementation of the MetadataLookup trait.
///
/// Titles without a configured response resolve to `YearLookup::NoMatch`.
#[derive(Debug, Clone)]
pub struct MockMetadataLookup {
    responses: Arc<RwLock<HashMap<String, YearLookup>>>,
    titles: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<LookupError>>>,
}

impl Default for MockMetadataLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMetadataLookup {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            titles: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the outcome returned for `title` (exact match).
    pub async fn set_response(&self, title: &str, outcome: YearLookup) {
        self.responses
            .write()
            .await
            .insert(title.to_string(), outcome);
    }

    /// Configure the next lookup to fail with the given error.
    pub async fn set_next_error(&self, error: LookupError) {
        *self.next_error.write().await = Some(error);
    }

    /// Titles passed to `lookup_year`, in call order.
    pub async fn recorded_titles(&self) -> Vec<String> {
        self.titles.read().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.titles.read().await.len()
    }
}

#[async_trait]
impl MetadataLookup for MockMetadataLookup {
    fn name(&self) -> &str {
        "mock-lookup"
    }

    async fn lookup_year(&self, title: &str) -> Result<YearLookup, LookupError> {
        self.titles.write().await.push(title.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .responses
            .read()
            .await
            .get(title)
            .cloned()
            .unwrap_or(YearLookup::NoMatch))
    }
}
