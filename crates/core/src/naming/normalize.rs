//! Free-text normalization used when comparing release names.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("bracket pattern is valid"));

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Canonicalizes a free-text name for comparison.
///
/// Drops every `[...]` annotation, collapses whitespace runs to a single
/// space, trims and lower-cases. Never fails; the result may be empty.
pub fn normalize(raw: &str) -> String {
    let without_tags = BRACKETED.replace_all(raw, "");
    let collapsed = WHITESPACE.replace_all(&without_tags, " ");
    collapsed.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_bracketed_tags() {
        assert_eq!(normalize("[YTS.MX] The Movie [1080p]"), "the movie");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  The \t Movie\n  2015 "), "the movie 2015");
    }

    #[test]
    fn test_normalize_keeps_other_punctuation() {
        assert_eq!(normalize("The.Movie (2015)"), "the.movie (2015)");
    }

    #[test]
    fn test_normalize_unbalanced_bracket_is_kept() {
        assert_eq!(normalize("Movie [Extended"), "movie [extended");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("[only a tag]"), "");
    }
}
