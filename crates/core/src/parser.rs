//! Tree reconstruction from depth-annotated rows
//!
//! This is the core of the tool: a single forward pass over the ordered row
//! sequence that rebuilds the nested structure the flat sheet encodes. The
//! recursive descent is modeled as an explicit frame stack, so adversarial
//! nesting depth cannot exhaust the call stack; the scan index only ever
//! increases, which bounds the pass by the input length.

use crate::config::{ExtractConfig, KeySource};
use crate::depth::DepthClassifier;
use crate::models::{Node, Row, SchemaTree};

/// Row accounting for one parse pass.
///
/// `total == blank + malformed + rows that became nodes`; every input row is
/// consumed exactly once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowAccounting {
    pub total: usize,
    pub blank: usize,
    pub malformed: usize,
}

/// An open group awaiting its remaining children. The frame's depth is
/// implicit: a frame at stack position `d` collects children at depth `d+1`.
struct Frame {
    key: String,
    children: Vec<Node>,
}

/// Reconstruct the schema tree encoded by `rows`.
///
/// Depth comes solely from the element column. A row at the level currently
/// being collected becomes a Group when the next row is strictly deeper
/// (one-row lookahead), otherwise a Leaf. Rows with blank element cells are
/// skipped; rows that skip an indentation level are dropped and counted,
/// never raised as errors.
pub fn parse_rows(rows: &[Row], config: &ExtractConfig) -> (SchemaTree, RowAccounting) {
    let classifier = DepthClassifier::new(&config.markers);
    let mut accounting = RowAccounting {
        total: rows.len(),
        ..Default::default()
    };
    let mut top: Vec<Node> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let depth = classifier.depth(&row.name);

        // This row sits at or above an open group's level: the group's
        // subtree is complete. Blank cells classify as depth 0, so a blank
        // row closes every open group before it is skipped below.
        while depth < stack.len() {
            close_frame(&mut stack, &mut top);
        }

        let name = classifier.canonical_name(&row.name);
        if name.is_empty() {
            accounting.blank += 1;
            continue;
        }

        if depth > stack.len() {
            // Indentation skipped a level; no parent exists to own this
            // row. Drop it and keep scanning.
            accounting.malformed += 1;
            continue;
        }

        // depth == stack.len(): a node at the level being collected.
        let next_is_deeper = rows
            .get(index + 1)
            .map(|next| classifier.depth(&next.name) > depth)
            .unwrap_or(false);

        if next_is_deeper {
            let key = group_key(&classifier, row, config.key_source, &name);
            stack.push(Frame {
                key,
                children: Vec::new(),
            });
        } else {
            attach(&mut stack, &mut top, Node::Leaf(name));
        }
    }

    while !stack.is_empty() {
        close_frame(&mut stack, &mut top);
    }

    (SchemaTree { nodes: top }, accounting)
}

/// Pop the innermost open group and hand it to its parent (or the top level).
fn close_frame(stack: &mut Vec<Frame>, top: &mut Vec<Node>) {
    if let Some(frame) = stack.pop() {
        let node = Node::Group {
            key: frame.key,
            children: frame.children,
        };
        attach(stack, top, node);
    }
}

fn attach(stack: &mut [Frame], top: &mut Vec<Node>, node: Node) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => top.push(node),
    }
}

/// Key for a new group, per the configured policy. With `KeySource::Type`
/// a blank type cell falls back to the element name; never an error.
fn group_key(
    classifier: &DepthClassifier,
    row: &Row,
    key_source: KeySource,
    name: &str,
) -> String {
    match key_source {
        KeySource::Name => name.to_string(),
        KeySource::Type => {
            let ty = classifier.canonical_name(&row.ty);
            if ty.is_empty() {
                name.to_string()
            } else {
                ty
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeafRepr;
    use crate::output::to_json;

    fn rows(pairs: &[(&str, &str)]) -> Vec<Row> {
        pairs.iter().map(|(n, t)| Row::new(*n, *t)).collect()
    }

    fn leaf(name: &str) -> Node {
        Node::Leaf(name.to_string())
    }

    fn group(key: &str, children: Vec<Node>) -> Node {
        Node::Group {
            key: key.to_string(),
            children,
        }
    }

    #[test]
    fn test_standalone_leaves() {
        let input = rows(&[("a", ""), ("b", "")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![leaf("a"), leaf("b")]);
        assert_eq!(accounting.total, 2);
        assert_eq!(accounting.blank, 0);
        assert_eq!(accounting.malformed, 0);
    }

    #[test]
    fn test_type_column_becomes_group_key() {
        // spec scenario: a standalone leaf followed by a group keyed by type
        let input = rows(&[("a", ""), ("b", "btype"), (">c", "string")]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![leaf("a"), group("btype", vec![leaf("c")])]);
    }

    #[test]
    fn test_name_policy_uses_element_column() {
        let input = rows(&[("a", ""), ("b", "btype"), (">c", "string")]);
        let config = ExtractConfig::default().with_key_source(KeySource::Name);
        let (tree, _) = parse_rows(&input, &config);
        assert_eq!(tree.nodes, vec![leaf("a"), group("b", vec![leaf("c")])]);
    }

    #[test]
    fn test_blank_type_falls_back_to_name() {
        let input = rows(&[("parent", "   "), (">child", "")]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("parent", vec![leaf("child")])]);
    }

    #[test]
    fn test_depth_matches_marker_count() {
        let input = rows(&[
            ("root", "roottype"),
            (">one", "t1"),
            (">>two", "t2"),
            (">>>three", ""),
            (">sibling", ""),
        ]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(
            tree.nodes,
            vec![group(
                "roottype",
                vec![
                    group("t1", vec![group("two", vec![leaf("three")])]),
                    leaf("sibling"),
                ],
            )]
        );
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(accounting.malformed, 0);
    }

    #[test]
    fn test_orphan_indented_row_yields_empty_tree() {
        // spec scenario: a lone depth-1 row with no depth-0 parent
        let input = rows(&[(">child", "t")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert!(tree.is_empty());
        assert_eq!(accounting.malformed, 1);
    }

    #[test]
    fn test_skipped_level_is_dropped() {
        let input = rows(&[("a", "at"), (">>too_deep", ""), (">kept", "")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("at", vec![leaf("kept")])]);
        assert_eq!(accounting.malformed, 1);
    }

    #[test]
    fn test_group_left_empty_by_malformed_children() {
        let input = rows(&[("a", "at"), (">>lost", ""), ("b", "")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("at", vec![]), leaf("b")]);
        assert_eq!(accounting.malformed, 1);
    }

    #[test]
    fn test_blank_row_closes_open_groups() {
        let input = rows(&[("a", "at"), (">x", ""), ("", ""), ("b", "")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("at", vec![leaf("x")]), leaf("b")]);
        assert_eq!(accounting.blank, 1);
    }

    #[test]
    fn test_marker_only_cell_is_blank() {
        // The lookahead still sees the marker-only cell as deeper, so "x"
        // opens a group that the blank row then leaves empty.
        let input = rows(&[("a", "at"), (">x", ""), (">>>", "")]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(
            tree.nodes,
            vec![group("at", vec![group("x", vec![])])]
        );
        assert_eq!(accounting.blank, 1);
    }

    #[test]
    fn test_row_conservation() {
        let input = rows(&[
            ("a", ""),
            ("", ""),
            (">>orphan", ""),
            ("b", "bt"),
            (">c", ""),
            (">c", ""),
        ]);
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        let consumed_as_nodes = tree.total_nodes();
        assert_eq!(accounting.total, input.len());
        assert_eq!(
            consumed_as_nodes + accounting.blank + accounting.malformed,
            accounting.total
        );
    }

    #[test]
    fn test_ascent_by_multiple_levels() {
        let input = rows(&[
            ("a", "at"),
            (">b", "bt"),
            (">>c", ""),
            ("d", ""),
        ]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(
            tree.nodes,
            vec![group("at", vec![group("bt", vec![leaf("c")])]), leaf("d")]
        );
    }

    #[test]
    fn test_namespace_and_case_normalization() {
        let input = rows(&[("ns:Account", "x:AcctType"), (">ns:Id", "")]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("accttype", vec![leaf("id")])]);
    }

    #[test]
    fn test_legacy_slash_markers() {
        let input = rows(&[("root", ""), ("/child", ""), ("//grand", "")]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(
            tree.nodes,
            vec![group("root", vec![group("child", vec![leaf("grand")])])]
        );
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let depth = 4000;
        let mut input = Vec::with_capacity(depth + 1);
        input.push(Row::new("root", ""));
        for level in 1..=depth {
            input.push(Row::new(format!("{}n{}", ">".repeat(level), level), ""));
        }
        let (tree, accounting) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(accounting.malformed, 0);
        assert_eq!(tree.max_depth(), depth);
        // Serialization of the result must survive the same depth.
        let json = to_json(&tree, LeafRepr::NullMarker).unwrap();
        assert!(json.contains(&format!("n{}", depth)));
    }

    #[test]
    fn test_duplicate_sibling_leaves_are_kept_in_tree() {
        let input = rows(&[("g", "gt"), (">x", ""), (">x", "")]);
        let (tree, _) = parse_rows(&input, &ExtractConfig::default());
        assert_eq!(tree.nodes, vec![group("gt", vec![leaf("x"), leaf("x")])]);
    }
}
