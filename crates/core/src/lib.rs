//! MapFields Core Library
//!
//! This library reconstructs nested schema trees from flat,
//! indentation-encoded spreadsheet rows: (element-name, type) pairs whose
//! nesting depth is signaled by a run of leading marker characters.
//!
//! # Features
//!
//! - Classify row depth and canonical identifiers from marker runs
//! - Rebuild the ordered schema tree in a single forward pass, recovering
//!   from malformed indentation by skipping rows instead of failing
//! - Collect the flat, deduplicated leaf list in first-seen order
//! - Serialize trees as ordered JSON/YAML mappings, compact bracket text,
//!   or leaf exports
//! - Read .xlsx/.xlsm/.xlsb/.xls/.ods workbooks, batches in parallel
//! - Bundle leaf export files into one JSON object
//! - Resolve artifact references by path-segment probing
//!
//! # Example
//!
//! ```no_run
//! use mapfields_core::{ExtractConfig, Row, SchemaExtractor};
//!
//! let extractor = SchemaExtractor::new(ExtractConfig::default());
//! let rows = vec![
//!     Row::new("account", ""),
//!     Row::new("balance", "balancetype"),
//!     Row::new(">amount", "decimal"),
//! ];
//! let map = extractor.extract_rows(&rows);
//! println!("{:?}", map.leaves);
//! ```

pub mod bundle;
pub mod config;
pub mod depth;
pub mod extractor;
pub mod leaves;
pub mod models;
pub mod output;
pub mod parser;
pub mod resolver;
pub mod workbook;

// Re-exports for convenience
pub use config::{ExtractConfig, KeySource, LeafRepr};
pub use depth::DepthClassifier;
pub use extractor::{ExtractError, SchemaExtractor};
pub use leaves::collect_leaves;
pub use models::*;
pub use output::{format_output, format_summary, FormatError, OutputFormat};
pub use parser::{parse_rows, RowAccounting};
pub use resolver::{ArtifactResolver, Resolved};
pub use workbook::{parse_column, Workbook, WorkbookError};
