//! Data models for schema-tree extraction
//!
//! This module defines the core data structures shared across the tool:
//! input rows, the reconstructed schema tree, and the per-document result
//! envelope with its statistics and metadata.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single input row: the two designated cells of one sheet line.
///
/// Position in the input sequence defines document order; the nesting depth
/// is implicit in the leading marker run of `name`. Rows are immutable once
/// read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Raw element-name cell, markers included
    pub name: String,
    /// Raw type cell
    pub ty: String,
}

impl Row {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A node in the reconstructed schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Terminal field, identified by its canonical name
    Leaf(String),
    /// Nested field with ordered children
    Group { key: String, children: Vec<Node> },
}

impl Node {
    /// Canonical identifier of the node (leaf name or group key)
    pub fn key(&self) -> &str {
        match self {
            Node::Leaf(name) => name,
            Node::Group { key, .. } => key,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group { .. })
    }
}

/// An ordered sequence of top-level nodes, owned by the parse that built it.
///
/// The structure is strictly depth-decreasing by construction: no sharing,
/// no cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTree {
    pub nodes: Vec<Node>,
}

impl SchemaTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit every node in pre-order, with its depth (top level = 0).
    ///
    /// Uses an explicit stack so that pathologically deep trees cannot
    /// exhaust the call stack.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&Node, usize),
    {
        let mut stack: Vec<(&Node, usize)> = self.nodes.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            f(node, depth);
            if let Node::Group { children, .. } = node {
                for child in children.iter().rev() {
                    stack.push((child, depth + 1));
                }
            }
        }
    }

    /// Total nodes in the tree, groups included.
    pub fn total_nodes(&self) -> usize {
        let mut count = 0;
        self.for_each(|_, _| count += 1);
        count
    }

    pub fn group_count(&self) -> usize {
        let mut count = 0;
        self.for_each(|node, _| {
            if node.is_group() {
                count += 1;
            }
        });
        count
    }

    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.for_each(|node, _| {
            if node.is_leaf() {
                count += 1;
            }
        });
        count
    }

    /// Deepest nesting level observed (top level = 0; empty tree = 0).
    pub fn max_depth(&self) -> usize {
        let mut max = 0;
        self.for_each(|_, depth| max = max.max(depth));
        max
    }
}

/// Complete extraction result for one input document.
#[derive(Debug, Clone)]
pub struct SchemaMap {
    /// Path of the source workbook (empty when rows came from elsewhere)
    pub source: PathBuf,
    /// Name of the sheet the rows were read from
    pub sheet: String,
    /// The reconstructed tree
    pub tree: SchemaTree,
    /// Ordered, deduplicated leaf identifiers
    pub leaves: Vec<String>,
    /// Row and node accounting
    pub stats: ExtractStats,
    /// Extraction metadata
    pub metadata: ExtractMetadata,
}

/// Row and node accounting for a single extraction.
///
/// Every input row is accounted for exactly once: it either became a node,
/// was blank, or was dropped by the malformed-indentation recovery policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    pub rows_total: usize,
    pub rows_blank: usize,
    pub rows_malformed: usize,
    pub groups: usize,
    pub leaves: usize,
    pub unique_leaves: usize,
    pub max_depth: usize,
}

/// Metadata about the extraction operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractMetadata {
    /// Duration of the extraction in milliseconds
    pub extract_duration_ms: u64,

    /// Rows processed per second
    pub rows_per_second: f64,

    /// ISO timestamp of the extraction
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for ExtractMetadata {
    fn default() -> Self {
        Self {
            extract_duration_ms: 0,
            rows_per_second: 0.0,
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
