//! Depth classification for indentation-encoded cells
//!
//! A cell's nesting depth is the length of its leading marker run; its
//! canonical identifier is what remains once markers and namespace prefixes
//! are stripped.

use crate::config::DEFAULT_MARKERS;
use regex::Regex;

/// Classifies raw cell strings by marker-run depth and extracts canonical
/// identifiers.
///
/// Compiled once per parse from the configured marker set and reused for
/// every row.
#[derive(Debug, Clone)]
pub struct DepthClassifier {
    marker_run: Regex,
}

impl DepthClassifier {
    /// Build a classifier for the given marker characters. An empty set
    /// falls back to the defaults.
    pub fn new(markers: &[char]) -> Self {
        let markers = if markers.is_empty() {
            DEFAULT_MARKERS
        } else {
            markers
        };
        let class: String = markers
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let pattern = format!(r"^\s*([{}]+)\s*", class);
        let marker_run = Regex::new(&pattern).expect("marker class is escaped");
        Self { marker_run }
    }

    /// Nesting depth of a raw cell: the count of consecutive marker
    /// characters at the start of the trimmed string, 0 for blank or
    /// unmarked input.
    pub fn depth(&self, raw: &str) -> usize {
        if raw.trim().is_empty() {
            return 0;
        }
        self.marker_run
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|run| run.as_str().chars().count())
            .unwrap_or(0)
    }

    /// Canonical identifier of a raw cell: markers stripped, namespace
    /// prefix (text before the last `:`) dropped, trimmed and lowercased.
    ///
    /// Returns an empty string for blank input; callers treat that as
    /// "skip this row", never as a valid leaf.
    pub fn canonical_name(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        let stripped = self.marker_run.replace(trimmed, "");
        let after_namespace = match stripped.rfind(':') {
            Some(idx) => &stripped[idx + 1..],
            None => stripped.as_ref(),
        };
        after_namespace.trim().to_lowercase()
    }
}

impl Default for DepthClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MARKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_of_unmarked() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.depth("account"), 0);
        assert_eq!(classifier.depth(""), 0);
        assert_eq!(classifier.depth("   "), 0);
    }

    #[test]
    fn test_depth_counts_marker_run() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.depth(">child"), 1);
        assert_eq!(classifier.depth(">>grand"), 2);
        assert_eq!(classifier.depth(">>>deep"), 3);
        assert_eq!(classifier.depth("  >> spaced"), 2);
    }

    #[test]
    fn test_depth_legacy_slash_markers() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.depth("/child"), 1);
        assert_eq!(classifier.depth("//grand"), 2);
        // Mixed runs count every marker character
        assert_eq!(classifier.depth(">/x"), 2);
    }

    #[test]
    fn test_depth_custom_markers() {
        let classifier = DepthClassifier::new(&['*']);
        assert_eq!(classifier.depth("**x"), 2);
        assert_eq!(classifier.depth(">x"), 0);
    }

    #[test]
    fn test_canonical_name_strips_markers() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.canonical_name(">>Balance"), "balance");
        assert_eq!(classifier.canonical_name("  > Amount "), "amount");
    }

    #[test]
    fn test_canonical_name_namespace_prefix() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.canonical_name("ns:Account"), "account");
        assert_eq!(classifier.canonical_name(">>a:b:Deep"), "deep");
    }

    #[test]
    fn test_canonical_name_blank() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.canonical_name(""), "");
        assert_eq!(classifier.canonical_name("   "), "");
        assert_eq!(classifier.canonical_name(">>>"), "");
    }

    #[test]
    fn test_canonical_name_lowercases() {
        let classifier = DepthClassifier::default();
        assert_eq!(classifier.canonical_name("AccountNumber"), "accountnumber");
    }
}
