//! Canonical `Title_(Year).ext` names and the pieces they are built from.

use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Container extensions recognised as video (lowercase, with the dot).
pub const VIDEO_EXTENSIONS: &[&str] = &[".mkv", ".mp4", ".avi"];

/// Quality tags that delimit the title when a filename carries no year.
pub const RESOLUTION_MARKERS: &[&str] = &["480p", "576p", "720p", "1080p", "2160p"];

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(19[0-9]{2}|20[0-5][0-9]|206[0-6])$").expect("year pattern is valid")
});

static CANONICAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)_\((\d{4})\)(\.[^.]*)$").expect("canonical pattern is valid")
});

/// A plausible release year (1900 through 2066).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseYear(u16);

impl ReleaseYear {
    pub const MIN: u16 = 1900;
    pub const MAX: u16 = 2066;

    /// Parses a year token. The whole (trimmed) input must be the year.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if !YEAR_PATTERN.is_match(raw) {
            return None;
        }
        raw.parse().ok().map(Self)
    }

    /// Wraps a numeric year if it falls in the accepted range.
    pub fn new(year: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&year).then_some(Self(year))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ReleaseYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the year of a canonical name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearSource {
    /// A year token present in the filename.
    Explicit,
    /// The metadata provider.
    Lookup,
    /// The filename was already canonical and was left alone.
    AlreadyCanonical,
}

/// A library filename of the form `Title_(Year).ext` (or `Title.ext`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalName {
    file_name: String,
    title: String,
    year: Option<u16>,
    extension: String,
    source: YearSource,
}

impl CanonicalName {
    /// Builds a canonical name from a raw title.
    ///
    /// Separator runs in the title collapse to one underscore and leading or
    /// trailing separators are stripped.
    pub fn assemble(
        title: &str,
        year: Option<ReleaseYear>,
        extension: &str,
        source: YearSource,
    ) -> Self {
        let title = collapse_separators(title);
        let file_name = match year {
            Some(y) => format!("{}_({}){}", title, y, extension),
            None => format!("{}{}", title, extension),
        };
        let file_name = collapse_separators(&file_name);

        Self {
            file_name,
            title,
            year: year.map(ReleaseYear::get),
            extension: extension.to_string(),
            source,
        }
    }

    /// Recognises a filename that is already in `<anything>_(NNNN).ext` form.
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = CANONICAL_PATTERN.captures(file_name)?;
        Some(Self {
            file_name: file_name.to_string(),
            title: caps[1].to_string(),
            year: caps[2].parse().ok(),
            extension: caps[3].to_string(),
            source: YearSource::AlreadyCanonical,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn source(&self) -> YearSource {
        self.source
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)
    }
}

/// Splits off the extension the way most tools do: the last dot-segment,
/// ignoring dots that only lead the name (`.hidden` has no extension).
pub fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let idx = file_name.rfind('.')?;
    let stem = &file_name[..idx];
    if stem.trim_start_matches('.').is_empty() {
        return None;
    }
    Some((stem, &file_name[idx..]))
}

/// Returns the (case-preserved) extension if it is in the video whitelist.
pub fn video_extension(file_name: &str) -> Option<&str> {
    let (_, ext) = split_extension(file_name)?;
    let lower = ext.to_lowercase();
    VIDEO_EXTENSIONS
        .iter()
        .any(|v| *v == lower)
        .then_some(ext)
}

pub fn is_video_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(video_extension)
        .is_some()
}

/// Breaks a filename stem into title tokens.
///
/// Apostrophes are dropped; any other character outside `[A-Za-z0-9]` acts
/// as a separator. Empty tokens are discarded.
pub(crate) fn tokenize(stem: &str) -> Vec<String> {
    let cleaned: String = stem
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    cleaned
        .split('_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Finds the last year token that has at least one title token before it.
pub(crate) fn find_year_token(tokens: &[String]) -> Option<(usize, ReleaseYear)> {
    tokens
        .iter()
        .enumerate()
        .skip(1)
        .rev()
        .find_map(|(i, t)| ReleaseYear::parse(t).map(|y| (i, y)))
}

/// Finds the earliest resolution marker token.
pub(crate) fn find_resolution_marker(tokens: &[String]) -> Option<usize> {
    tokens.iter().position(|t| {
        RESOLUTION_MARKERS
            .iter()
            .any(|m| t.eq_ignore_ascii_case(m))
    })
}

fn collapse_separators(s: &str) -> String {
    s.split('_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
