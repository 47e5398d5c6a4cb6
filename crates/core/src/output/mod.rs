mod compact;
mod json;
mod leaves;
mod yaml;

pub use compact::to_compact;
pub use json::{to_json, tree_to_value};
pub use leaves::{to_leaf_json, to_leaf_lines};
pub use yaml::to_yaml;

use crate::config::LeafRepr;
use crate::models::SchemaMap;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Structured nested mapping as JSON (contract A)
    Json,
    /// Structured nested mapping as YAML
    Yaml,
    /// Compact bracket text (contract C)
    Compact,
    /// Leaf identifiers, one per line (contract B)
    Leaves,
    /// Leaf identifiers as a JSON array (contract B, structured variant)
    LeavesJson,
    /// Human-readable summary
    Summary,
}

impl OutputFormat {
    /// Conventional file extension for the format, used to derive batch
    /// output file names.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json | OutputFormat::LeavesJson => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Compact | OutputFormat::Leaves | OutputFormat::Summary => "txt",
        }
    }
}

/// Format a SchemaMap according to the specified format.
pub fn format_output(
    map: &SchemaMap,
    format: OutputFormat,
    leaf_repr: LeafRepr,
) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => to_json(&map.tree, leaf_repr),
        OutputFormat::Yaml => to_yaml(&map.tree, leaf_repr),
        OutputFormat::Compact => Ok(to_compact(&map.tree)),
        OutputFormat::Leaves => Ok(to_leaf_lines(&map.leaves)),
        OutputFormat::LeavesJson => to_leaf_json(&map.leaves),
        OutputFormat::Summary => Ok(format_summary(map)),
    }
}

/// Generate a human-readable summary for one extracted document.
pub fn format_summary(map: &SchemaMap) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Schema Extraction Summary\n\
         =========================\n\
         Source: {}\n\
         Sheet: {}\n\n",
        map.source.display(),
        map.sheet
    ));

    output.push_str(&format!(
        "Rows Read: {}\n\
         - blank: {}\n\
         - malformed indentation (skipped): {}\n\n",
        map.stats.rows_total, map.stats.rows_blank, map.stats.rows_malformed
    ));

    output.push_str(&format!(
        "Tree: {} groups, {} leaves ({} unique), max depth {}\n\n",
        map.stats.groups, map.stats.leaves, map.stats.unique_leaves, map.stats.max_depth
    ));

    if !map.leaves.is_empty() {
        output.push_str("Leaves:\n");
        for leaf in map.leaves.iter().take(20) {
            output.push_str(&format!("  {}\n", leaf));
        }
        if map.leaves.len() > 20 {
            output.push_str(&format!("  ... and {} more\n", map.leaves.len() - 20));
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Extract Duration: {}ms ({:.2} rows/sec)\n\
         Timestamp: {}\n\
         Tool Version: {}\n",
        map.metadata.extract_duration_ms,
        map.metadata.rows_per_second,
        map.metadata.timestamp,
        map.metadata.tool_version
    ));

    output
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
