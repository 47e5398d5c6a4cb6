use super::FormatError;

/// Render leaves one per line, in first-seen order.
pub fn to_leaf_lines(leaves: &[String]) -> String {
    let mut out = String::new();
    for leaf in leaves {
        out.push_str(leaf);
        out.push('\n');
    }
    out
}

/// Render leaves as a JSON array, for consumers that want a structured list
/// instead of a line-per-record file.
pub fn to_leaf_json(leaves: &[String]) -> Result<String, FormatError> {
    serde_json::to_string_pretty(leaves).map_err(FormatError::from)
}
