//! Title/year extraction from raw release filenames.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tracing::{info, warn};

use crate::metadata::{MetadataLookup, YearLookup};

use super::canonical::{
    find_resolution_marker, find_year_token, tokenize, video_extension, CanonicalName,
    ReleaseYear, YearSource,
};
use super::error::{LookupFailure, NamingError};

/// A file that now carries its canonical name on disk.
#[derive(Debug, Clone)]
pub struct CanonicalFile {
    pub path: PathBuf,
    pub name: CanonicalName,
}

/// Turns raw release filenames into `Title_(Year).ext`.
///
/// An explicit year token is trusted as-is; only filenames without one pay
/// for a metadata lookup.
pub struct TitleYearExtractor {
    lookup: Arc<dyn MetadataLookup>,
}

impl TitleYearExtractor {
    pub fn new(lookup: Arc<dyn MetadataLookup>) -> Self {
        Self { lookup }
    }

    /// Computes the canonical name for `file_name` without touching disk.
    pub async fn extract(&self, file_name: &str) -> Result<CanonicalName, NamingError> {
        let Some(extension) = video_extension(file_name) else {
            info!("Skipped: {} (unsupported extension)", file_name);
            return Err(NamingError::UnsupportedExtension {
                file_name: file_name.to_string(),
            });
        };

        if let Some(existing) = CanonicalName::parse(file_name) {
            info!("Skipped: {} (already in Title_(Year) format)", file_name);
            return Ok(existing);
        }

        let stem = &file_name[..file_name.len() - extension.len()];
        let tokens = tokenize(stem);

        if let Some((idx, year)) = find_year_token(&tokens) {
            let title = tokens[..idx].join("_");
            return Ok(CanonicalName::assemble(
                &title,
                Some(year),
                extension,
                YearSource::Explicit,
            ));
        }

        let title_tokens = match find_resolution_marker(&tokens) {
            Some(idx) => &tokens[..idx],
            None => &tokens[..],
        };
        let title = title_tokens.join("_");
        let year = self.lookup_year(file_name, &title).await?;

        Ok(CanonicalName::assemble(
            &title,
            Some(year),
            extension,
            YearSource::Lookup,
        ))
    }

    /// Computes the canonical name and renames the file in its directory.
    ///
    /// The rename never replaces a different existing file.
    pub async fn extract_and_rename(&self, path: &Path) -> Result<CanonicalFile, NamingError> {
        let file_name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| {
            NamingError::UnsupportedExtension {
                file_name: path.display().to_string(),
            }
        })?;

        let name = self.extract(file_name).await?;
        let target = path.with_file_name(name.file_name());

        if target == path {
            return Ok(CanonicalFile {
                path: path.to_path_buf(),
                name,
            });
        }

        if fs::symlink_metadata(&target).await.is_ok() {
            return Err(NamingError::RenameFailed {
                from: path.to_path_buf(),
                to: target,
                error: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "a file with the canonical name already exists",
                ),
            });
        }

        fs::rename(path, &target)
            .await
            .map_err(|error| NamingError::RenameFailed {
                from: path.to_path_buf(),
                to: target.clone(),
                error,
            })?;

        info!("Renaming {} -> {}", file_name, name.file_name());

        Ok(CanonicalFile { path: target, name })
    }

    async fn lookup_year(&self, file_name: &str, title: &str) -> Result<ReleaseYear, NamingError> {
        let failed = |reason: LookupFailure| NamingError::LookupFailed {
            title: title.to_string(),
            reason,
        };

        if title.is_empty() {
            warn!("Skipping {} (no title left to search for)", file_name);
            return Err(failed(LookupFailure::EmptyTitle));
        }

        let query = title.replace('_', " ");
        info!(
            "Searching {} for title '{}'",
            self.lookup.name(),
            query
        );

        match self.lookup.lookup_year(&query).await {
            Ok(YearLookup::Found(year)) => Ok(year),
            Ok(YearLookup::NoMatch) => {
                warn!("Skipping {} (search returned no results)", file_name);
                Err(failed(LookupFailure::NoMatch))
            }
            Ok(YearLookup::InvalidYear(raw)) => {
                warn!("Skipping {} (provider year '{}' not valid)", file_name, raw);
                Err(failed(LookupFailure::InvalidYear(raw)))
            }
            Err(e) => {
                warn!("Skipping {} (lookup failed: {})", file_name, e);
                Err(failed(LookupFailure::Provider(e)))
            }
        }
    }
}
