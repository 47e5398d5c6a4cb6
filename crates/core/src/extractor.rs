use crate::config::ExtractConfig;
use crate::leaves::collect_leaves;
use crate::models::{ExtractMetadata, ExtractStats, Row, SchemaMap};
use crate::parser::parse_rows;
use crate::workbook::{Workbook, WorkbookError};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Spreadsheet file patterns recognized by batch discovery.
const DEFAULT_PATTERNS: &[&str] = &["*.xlsx", "*.xlsm", "*.xlsb", "*.xls", "*.ods"];

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("workbook error: {0}")]
    WorkbookError(#[from] WorkbookError),

    #[error("invalid file pattern: {0}")]
    PatternError(#[from] globset::Error),
}

/// Main driver: wires ingestion, the tree builder, and the leaf collector
/// into per-document results.
pub struct SchemaExtractor {
    config: ExtractConfig,
}

impl SchemaExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract one workbook into a SchemaMap.
    pub fn extract<P: AsRef<Path>>(&self, path: P) -> Result<SchemaMap, ExtractError> {
        let start = Instant::now();
        let mut workbook = Workbook::open(&path)?;
        let sheet = workbook.resolve_sheet(self.config.sheet.as_deref())?;
        let rows = workbook.read_rows(&sheet, &self.config)?;
        Ok(self.finish(path.as_ref().to_path_buf(), sheet, &rows, start))
    }

    /// Parse rows supplied by another ingestion source. The core stays pure:
    /// anything that can produce ordered (name, type) pairs can feed it.
    pub fn extract_rows(&self, rows: &[Row]) -> SchemaMap {
        self.finish(PathBuf::new(), String::new(), rows, Instant::now())
    }

    fn finish(&self, source: PathBuf, sheet: String, rows: &[Row], start: Instant) -> SchemaMap {
        let (tree, accounting) = parse_rows(rows, &self.config);
        let leaves = collect_leaves(&tree);

        let stats = ExtractStats {
            rows_total: accounting.total,
            rows_blank: accounting.blank,
            rows_malformed: accounting.malformed,
            groups: tree.group_count(),
            leaves: tree.leaf_count(),
            unique_leaves: leaves.len(),
            max_depth: tree.max_depth(),
        };

        let duration = start.elapsed();
        let metadata = ExtractMetadata {
            extract_duration_ms: duration.as_millis() as u64,
            rows_per_second: if duration.as_secs_f64() > 0.0 {
                rows.len() as f64 / duration.as_secs_f64()
            } else {
                0.0
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        SchemaMap {
            source,
            sheet,
            tree,
            leaves,
            stats,
            metadata,
        }
    }

    /// Find workbooks under a directory for batch mode. `patterns` are
    /// file-name globs; empty means the default spreadsheet extensions.
    pub fn find_workbooks(
        &self,
        root: &Path,
        patterns: &[String],
    ) -> Result<Vec<PathBuf>, ExtractError> {
        let globs = build_globs(patterns)?;
        let mut files = Vec::new();
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            if entry.file_type().is_dir() {
                continue;
            }
            let path = entry.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if globs.is_match(name) {
                    files.push(path.to_path_buf());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Extract many workbooks. Each parse is independent and stateless, so
    /// documents run in parallel; a failing document reports its own error
    /// and never aborts the rest of the batch.
    pub fn extract_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<SchemaMap, ExtractError>)> {
        if self.config.threads == 1 {
            return paths
                .iter()
                .map(|path| (path.clone(), self.extract(path)))
                .collect();
        }

        let pool = if self.config.threads > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .ok()
        } else {
            None
        };

        let run = || {
            paths
                .par_iter()
                .map(|path| (path.clone(), self.extract(path)))
                .collect()
        };

        match pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }
}

fn build_globs(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    if patterns.is_empty() {
        for pattern in DEFAULT_PATTERNS {
            builder.add(Glob::new(pattern)?);
        }
    } else {
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn rows(pairs: &[(&str, &str)]) -> Vec<Row> {
        pairs.iter().map(|(n, t)| Row::new(*n, *t)).collect()
    }

    #[test]
    fn test_extract_rows_end_to_end() {
        let extractor = SchemaExtractor::new(ExtractConfig::default());
        let input = rows(&[
            ("account", ""),
            ("balance", "balancetype"),
            (">amount", "decimal"),
            (">currency", "ccy"),
            (">>unit", ""),
        ]);
        let map = extractor.extract_rows(&input);

        assert_eq!(map.stats.rows_total, 5);
        assert_eq!(map.stats.groups, 2);
        assert_eq!(map.stats.rows_malformed, 0);
        assert_eq!(map.stats.max_depth, 2);
        assert_eq!(map.leaves, vec!["account", "amount", "unit"]);
        assert_eq!(map.stats.unique_leaves, 3);
    }

    #[test]
    fn test_extract_rows_counts_duplicates() {
        let extractor = SchemaExtractor::new(ExtractConfig::default());
        let input = rows(&[("g", "gt"), (">id", ""), (">id", "")]);
        let map = extractor.extract_rows(&input);
        assert_eq!(map.stats.leaves, 2);
        assert_eq!(map.stats.unique_leaves, 1);
    }

    #[test]
    fn test_find_workbooks_defaults() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.xlsx", "b.xls", "notes.txt"] {
            File::create(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        File::create(dir.path().join("sub/c.ods")).unwrap();

        let extractor = SchemaExtractor::new(ExtractConfig::default());
        let files = extractor.find_workbooks(dir.path(), &[]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.xlsx", "b.xls", "c.ods"]);
    }

    #[test]
    fn test_find_workbooks_custom_pattern() {
        let dir = tempfile::tempdir().unwrap();
        File::create(dir.path().join("keep.xlsx")).unwrap();
        File::create(dir.path().join("skip.xlsx.bak")).unwrap();

        let extractor = SchemaExtractor::new(ExtractConfig::default());
        let files = extractor
            .find_workbooks(dir.path(), &["keep.*".to_string()])
            .unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_batch_failure_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xlsx");
        let unknown = dir.path().join("schema.unknown");
        File::create(&unknown).unwrap();

        let extractor = SchemaExtractor::new(ExtractConfig::default().with_threads(1));
        let results = extractor.extract_batch(&[missing.clone(), unknown.clone()]);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|(_, result)| result.is_err()));
    }
}
