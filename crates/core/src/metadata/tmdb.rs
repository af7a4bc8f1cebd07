//! TMDB (The Movie Database) API client.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::CatalogMovie;
use super::{CatalogError, MovieCatalog};

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Result language (e.g. "en-US").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// TMDB API client.
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl TmdbClient {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            language: config.language,
        })
    }

    fn base_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("api_key", self.api_key.clone())];
        if let Some(lang) = &self.language {
            params.push(("language", lang.clone()));
        }
        params
    }

    /// Maps non-success statuses to catalog errors.
    async fn check_status(response: Response, what: &str) -> Result<Response, CatalogError> {
        let status = response.status();
        if status == 401 {
            return Err(CatalogError::NotConfigured(
                "Invalid TMDB API key".to_string(),
            ));
        }
        if status == 404 {
            return Err(CatalogError::NotFound(what.to_string()));
        }
        if status == 429 {
            return Err(CatalogError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<CatalogMovie>, CatalogError> {
        let url = format!("{}/search/movie", self.base_url);

        debug!("TMDB movie search: query='{}'", query);

        let response = self
            .client
            .get(&url)
            .query(&self.base_params())
            .query(&[("query", query), ("include_adult", "false")])
            .send()
            .await?;

        let response = Self::check_status(response, &format!("search '{}'", query)).await?;

        let search_result: TmdbSearchResponse<TmdbMovieResult> =
            response.json().await.map_err(|e| {
                CatalogError::ParseError(format!(
                    "Failed to parse movie search response: {}",
                    e
                ))
            })?;

        Ok(search_result
            .results
            .into_iter()
            .map(|r| r.into())
            .collect())
    }

    async fn get_movie(&self, id: u32) -> Result<CatalogMovie, CatalogError> {
        let url = format!("{}/movie/{}", self.base_url, id);

        debug!("TMDB get movie: id={}", id);

        let response = self
            .client
            .get(&url)
            .query(&self.base_params())
            .send()
            .await?;

        let response = Self::check_status(response, &format!("Movie ID {}", id)).await?;

        let movie: TmdbMovieDetails = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie response: {}", e))
        })?;

        Ok(movie.into())
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieResult {
    id: u32,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    video: bool,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    id: u32,
    title: String,
    original_title: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    video: bool,
}

impl From<TmdbMovieResult> for CatalogMovie {
    fn from(r: TmdbMovieResult) -> Self {
        Self {
            id: r.id,
            title: r.title,
            original_title: r.original_title,
            release_date: r.release_date,
            runtime_minutes: None, // Not available in search results
            video: r.video,
        }
    }
}

impl From<TmdbMovieDetails> for CatalogMovie {
    fn from(d: TmdbMovieDetails) -> Self {
        Self {
            id: d.id,
            title: d.title,
            original_title: d.original_title,
            release_date: d.release_date,
            runtime_minutes: d.runtime,
            video: d.video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_api_key() {
        let result = TmdbClient::new(TmdbConfig {
            api_key: String::new(),
            base_url: None,
            language: None,
        });
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::new(TmdbConfig {
            api_key: "key".to_string(),
            base_url: Some("http://localhost:9999/3/".to_string()),
            language: Some("en-US".to_string()),
        })
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:9999/3");
        assert_eq!(client.base_params().len(), 2);
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 603, "title": "The Matrix", "original_title": "The Matrix",
                 "release_date": "1999-03-30", "video": false, "popularity": 80.1},
                {"id": 9999, "title": "The Matrix Revisited", "release_date": "2001-11-19",
                 "video": true}
            ],
            "total_results": 2
        }"#;
        let parsed: TmdbSearchResponse<TmdbMovieResult> = serde_json::from_str(json).unwrap();
        let movies: Vec<CatalogMovie> = parsed.results.into_iter().map(Into::into).collect();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 603);
        assert_eq!(movies[0].year_str(), Some("1999"));
        assert!(movies[0].is_theatrical());
        assert!(!movies[1].is_theatrical());
    }

    #[test]
    fn test_movie_details_conversion() {
        let details = TmdbMovieDetails {
            id: 603,
            title: "The Matrix".to_string(),
            original_title: Some("The Matrix".to_string()),
            release_date: Some("1999-03-30".to_string()),
            runtime: Some(136),
            video: false,
        };

        let movie: CatalogMovie = details.into();
        assert_eq!(movie.runtime_minutes, Some(136));
        assert_eq!(movie.year_str(), Some("1999"));
    }

    #[test]
    fn test_details_without_video_field() {
        let json = r#"{"id": 1, "title": "X", "release_date": "2010-01-01", "runtime": 90}"#;
        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        assert!(!details.video);
    }
}
