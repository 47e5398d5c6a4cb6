//! Leaf-file bundling
//!
//! Collects per-schema leaf export files (`<prefix><key>.<ext>`, one
//! identifier per line) from a folder into a single ordered JSON object,
//! deduplicating lines while preserving first-seen order.

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Bundle matching leaf files under `dir` into an ordered mapping from the
/// key between `prefix` and `.extension` to the file's deduplicated lines.
///
/// Files are visited in name order so the bundle is deterministic across
/// platforms.
pub fn bundle_leaf_files(
    dir: &Path,
    prefix: &str,
    extension: &str,
) -> Result<Map<String, Value>, BundleError> {
    let suffix = format!(".{}", extension);
    let mut names: Vec<String> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.starts_with(prefix) && name.ends_with(&suffix))
        .collect();
    names.sort();

    let mut bundle = Map::new();
    for name in names {
        let key = name[prefix.len()..name.len() - suffix.len()].to_string();
        if key.is_empty() {
            continue;
        }
        let content = fs::read_to_string(dir.join(&name))?;
        bundle.insert(key, Value::Array(unique_lines(&content)));
    }
    Ok(bundle)
}

fn unique_lines(content: &str) -> Vec<Value> {
    let mut seen = HashSet::new();
    let mut lines = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if !line.is_empty() && seen.insert(line.to_string()) {
            lines.push(Value::String(line.to_string()));
        }
    }
    lines
}

/// Serialize a bundle as pretty-printed JSON.
pub fn bundle_to_json(bundle: &Map<String, Value>) -> Result<String, BundleError> {
    serde_json::to_string_pretty(&Value::Object(bundle.clone())).map_err(BundleError::from)
}
