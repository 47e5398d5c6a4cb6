/// Default marker characters encoding nesting depth (`>` plus the legacy `/`).
pub const DEFAULT_MARKERS: &[char] = &['>', '/'];

/// Which column supplies a group's key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeySource {
    /// Prefer the type column, fall back to the element name when blank
    #[default]
    Type,
    /// Always use the element name
    Name,
}

/// How a leaf renders in the structured output form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeafRepr {
    /// Leaf name maps to `null`
    #[default]
    NullMarker,
    /// Leaf name maps to an empty object
    EmptyContainer,
}

/// Configuration for an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Sheet to read; `None` falls back to the first sheet in the workbook
    pub sheet: Option<String>,
    /// Header rows to skip before the data starts
    pub skip_rows: usize,
    /// 0-based index of the element-name column
    pub name_column: usize,
    /// 0-based index of the type column
    pub type_column: usize,
    /// Marker characters that encode depth
    pub markers: Vec<char>,
    /// Group key selection policy
    pub key_source: KeySource,
    /// Leaf rendering policy for structured output
    pub leaf_repr: LeafRepr,
    /// Number of threads for batch mode (0 = auto)
    pub threads: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            sheet: None,
            skip_rows: 2,
            name_column: 1,
            type_column: 2,
            markers: DEFAULT_MARKERS.to_vec(),
            key_source: KeySource::default(),
            leaf_repr: LeafRepr::default(),
            threads: 0,
        }
    }
}

impl ExtractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_columns(mut self, name_column: usize, type_column: usize) -> Self {
        self.name_column = name_column;
        self.type_column = type_column;
        self
    }

    pub fn with_markers(mut self, markers: Vec<char>) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_key_source(mut self, key_source: KeySource) -> Self {
        self.key_source = key_source;
        self
    }

    pub fn with_leaf_repr(mut self, leaf_repr: LeafRepr) -> Self {
        self.leaf_repr = leaf_repr;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExtractConfig::default();
        assert!(config.sheet.is_none());
        assert_eq!(config.skip_rows, 2);
        assert_eq!(config.name_column, 1);
        assert_eq!(config.type_column, 2);
        assert_eq!(config.markers, vec!['>', '/']);
        assert_eq!(config.key_source, KeySource::Type);
        assert_eq!(config.leaf_repr, LeafRepr::NullMarker);
    }

    #[test]
    fn test_config_builder() {
        let config = ExtractConfig::new()
            .with_sheet("Message Response")
            .with_skip_rows(0)
            .with_columns(0, 1)
            .with_markers(vec!['>'])
            .with_key_source(KeySource::Name)
            .with_leaf_repr(LeafRepr::EmptyContainer)
            .with_threads(4);

        assert_eq!(config.sheet.as_deref(), Some("Message Response"));
        assert_eq!(config.skip_rows, 0);
        assert_eq!(config.name_column, 0);
        assert_eq!(config.type_column, 1);
        assert_eq!(config.markers, vec!['>']);
        assert_eq!(config.key_source, KeySource::Name);
        assert_eq!(config.leaf_repr, LeafRepr::EmptyContainer);
        assert_eq!(config.threads, 4);
    }
}
