//! Fuzzy resolution of a release name to an actual directory entry.
//!
//! Download clients report a nominal name that can drift from what lands on
//! disk (tracker tags, punctuation). The matcher tries the exact name first
//! and only then scores every subdirectory by normalized similarity.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::naming::normalize;

/// Matcher configuration (`[matcher]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Minimum similarity in [0, 1] for a fuzzy match to be accepted.
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
}

fn default_similarity_threshold() -> f64 {
    0.8
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

/// Symmetric string similarity in [0, 1]; identical strings score 1.0.
pub trait SimilarityMetric: Send + Sync {
    fn ratio(&self, a: &str, b: &str) -> f64;
}

/// Levenshtein distance normalized by the longer string's length.
#[derive(Debug, Default, Clone, Copy)]
pub struct NormalizedLevenshtein;

impl SimilarityMetric for NormalizedLevenshtein {
    fn ratio(&self, a: &str, b: &str) -> f64 {
        strsim::normalized_levenshtein(a, b)
    }
}

/// A directory name with its similarity to the expected name.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub name: String,
    pub score: f64,
}

/// Resolves release names to directories under a base path.
pub struct DirectoryMatcher {
    threshold: f64,
    metric: Arc<dyn SimilarityMetric>,
}

impl DirectoryMatcher {
    pub fn new(config: &MatcherConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            metric: Arc::new(NormalizedLevenshtein),
        }
    }

    /// Replace the similarity metric.
    pub fn with_metric(mut self, metric: Arc<dyn SimilarityMetric>) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the path of the entry under `base` that best matches
    /// `expected_name`, or `None` when nothing reaches the threshold.
    ///
    /// An exact child (directory or file) wins without scoring. Fuzzy
    /// matching only considers directories.
    pub async fn resolve(&self, base: &Path, expected_name: &str) -> Option<PathBuf> {
        if is_plain_name(expected_name) {
            let exact = base.join(expected_name);
            if fs::symlink_metadata(&exact).await.is_ok() {
                debug!("Exact match for '{}' in {}", expected_name, base.display());
                return Some(exact);
            }
        }

        let candidates = match list_directories(base).await {
            Ok(names) => names,
            Err(e) => {
                warn!("Failed to list {}: {}", base.display(), e);
                return None;
            }
        };

        let best = self.best_match(expected_name, &candidates)?;
        if best.score < self.threshold {
            debug!(
                "No directory close enough to '{}' (best '{}' at {:.3})",
                expected_name, best.name, best.score
            );
            return None;
        }

        info!(
            "Corrected directory name: {} -> {}",
            expected_name, best.name
        );
        Some(base.join(&best.name))
    }

    /// Highest-scoring candidate, first seen on ties. No threshold applied.
    pub fn best_match(&self, expected_name: &str, candidates: &[String]) -> Option<ScoredCandidate> {
        let expected = normalize(expected_name);
        let mut best: Option<ScoredCandidate> = None;

        for name in candidates {
            let score = self.metric.ratio(&expected, &normalize(name));
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(ScoredCandidate {
                    name: name.clone(),
                    score,
                });
            }
        }

        best
    }
}

/// A single path component, so joining it cannot escape `base`.
fn is_plain_name(name: &str) -> bool {
    Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name)
}

/// Directory children of `base`, sorted by name.
async fn list_directories(base: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = fs::read_dir(base).await?;
    let mut names = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        // Follows symlinks: a linked download directory is still a candidate.
        match fs::metadata(entry.path()).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                continue;
            }
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non-UTF-8 directory name {:?}", raw),
        }
    }

    names.sort();
    Ok(names)
}
