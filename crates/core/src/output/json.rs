use crate::config::LeafRepr;
use crate::models::{Node, SchemaTree};
use super::FormatError;
use serde_json::{Map, Value};

/// Render the tree as its structured value: an ordered mapping over the
/// top-level nodes. Leaves map to `null` (or `{}` under
/// `LeafRepr::EmptyContainer`), groups map to the ordered mapping of their
/// children. Duplicate sibling keys merge last-value-wins at the first
/// key's position.
pub fn tree_to_value(tree: &SchemaTree, leaf_repr: LeafRepr) -> Value {
    Value::Object(nodes_to_map(&tree.nodes, leaf_repr))
}

fn nodes_to_map(nodes: &[Node], leaf_repr: LeafRepr) -> Map<String, Value> {
    let mut map = Map::new();
    for node in nodes {
        match node {
            Node::Leaf(name) => {
                map.insert(name.clone(), leaf_value(leaf_repr));
            }
            Node::Group { key, children } => {
                map.insert(key.clone(), Value::Object(nodes_to_map(children, leaf_repr)));
            }
        }
    }
    map
}

fn leaf_value(leaf_repr: LeafRepr) -> Value {
    match leaf_repr {
        LeafRepr::NullMarker => Value::Null,
        LeafRepr::EmptyContainer => Value::Object(Map::new()),
    }
}

/// Serialize the structured form as pretty-printed UTF-8 JSON. Insertion
/// order is preserved; non-ASCII content is written as-is.
pub fn to_json(tree: &SchemaTree, leaf_repr: LeafRepr) -> Result<String, FormatError> {
    serde_json::to_string_pretty(&tree_to_value(tree, leaf_repr)).map_err(FormatError::from)
}
