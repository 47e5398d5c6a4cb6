use crate::config::LeafRepr;
use crate::models::SchemaTree;
use super::json::tree_to_value;
use super::FormatError;

/// Serialize the structured form as YAML, preserving insertion order.
pub fn to_yaml(tree: &SchemaTree, leaf_repr: LeafRepr) -> Result<String, FormatError> {
    serde_yaml::to_string(&tree_to_value(tree, leaf_repr)).map_err(FormatError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Node;

    #[test]
    fn test_yaml_nesting() {
        let tree = SchemaTree {
            nodes: vec![
                Node::Leaf("a".to_string()),
                Node::Group {
                    key: "g".to_string(),
                    children: vec![Node::Leaf("x".to_string())],
                },
            ],
        };
        let yaml = to_yaml(&tree, LeafRepr::NullMarker).unwrap();
        assert!(yaml.contains("a: null"));
        assert!(yaml.contains("g:"));
        assert!(yaml.contains("x: null"));
    }
}
