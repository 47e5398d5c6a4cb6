//! Leaf collection
//!
//! Walks a built tree and produces the flat, deduplicated list of leaf
//! identifiers in first-occurrence order.

use crate::models::{Node, SchemaTree};
use std::collections::HashSet;

/// Collect leaf identifiers in pre-order, keeping only the first occurrence
/// of each name across the whole tree.
///
/// The walk shares the tree's explicit-stack traversal, so nesting depth is
/// only bounded by memory, not by the call stack. Deterministic: running it
/// twice on the same tree yields identical sequences.
pub fn collect_leaves(tree: &SchemaTree) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut leaves = Vec::new();
    tree.for_each(|node, _| {
        if let Node::Leaf(name) = node {
            if seen.insert(name.clone()) {
                leaves.push(name.clone());
            }
        }
    });
    leaves
}
