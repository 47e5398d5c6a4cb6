use crate::models::{Node, SchemaTree};

/// Render the tree in the compact bracket grammar: leaves as bare tokens,
/// groups as `{key:{child1,child2,...}}`, top-level nodes comma-joined.
/// Single line, no quoting, no null tokens. Meant for lightweight diffing
/// and inspection, not for round-tripping the structured form.
pub fn to_compact(tree: &SchemaTree) -> String {
    tree.nodes
        .iter()
        .map(render_node)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_node(node: &Node) -> String {
    match node {
        Node::Leaf(name) => name.clone(),
        Node::Group { key, children } => {
            let inner = children
                .iter()
                .map(render_node)
                .collect::<Vec<_>>()
                .join(",");
            format!("{{{}:{{{}}}}}", key, inner)
        }
    }
}
