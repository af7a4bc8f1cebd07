//! Types shared by metadata catalogs and the year lookup.

use serde::{Deserialize, Serialize};

use crate::naming::ReleaseYear;

/// A movie as reported by a metadata catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    /// Catalog-specific movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD, possibly partial or empty).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes (only on full records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_minutes: Option<u32>,
    /// Direct-to-video entry rather than a theatrical film.
    #[serde(default)]
    pub video: bool,
}

impl CatalogMovie {
    /// The raw year segment of the release date, if any.
    pub fn year_str(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .map(str::trim)
            .filter(|y| !y.is_empty())
    }

    pub fn is_theatrical(&self) -> bool {
        !self.video
    }
}

/// Outcome of asking the provider for a title's release year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearLookup {
    /// The best candidate has a valid release year.
    Found(ReleaseYear),
    /// No theatrical film matched the title.
    NoMatch,
    /// The best candidate's year is missing or outside the accepted range.
    InvalidYear(String),
}
