//! Typed view of the design-file fields the style export reads.
//!
//! Only the fields needed to resolve fill styles are modelled; everything
//! else in the upstream document is ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// A design file: its node tree and the styles it defines.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignFile {
    /// Root of the node tree
    pub document: Node,
    /// Styles keyed by style id
    #[serde(default)]
    pub styles: BTreeMap<String, FileStyle>,
}

/// A style defined in a file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileStyle {
    pub name: String,
    /// `FILL`, `TEXT`, `EFFECT` or `GRID`
    #[serde(rename = "styleType")]
    pub style_type: String,
}

/// One node of the document tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub children: Vec<Node>,
    /// Style ids applied to this node, keyed by property (`fill`, `text`, ...)
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
    /// Raw paint objects; see [`crate::styles::fill_to_css`]
    #[serde(default)]
    pub fills: Vec<Value>,
}

impl Node {
    /// Depth-first, pre-order search for the first node matching `predicate`.
    pub fn find<P>(&self, predicate: &P) -> Option<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        if predicate(self) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(predicate))
    }

    /// Id of the fill style applied to this node, if any.
    pub fn fill_style(&self) -> Option<&str> {
        self.styles.get("fill").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Node {
        serde_json::from_value(json!({
            "id": "0:0",
            "type": "DOCUMENT",
            "children": [
                {
                    "id": "1:0",
                    "type": "FRAME",
                    "children": [
                        {"id": "1:1", "type": "RECTANGLE", "styles": {"fill": "S:1"}}
                    ]
                },
                {"id": "2:0", "type": "RECTANGLE", "styles": {"fill": "S:1"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_find_is_depth_first() {
        let root = tree();

        let found = root.find(&|node: &Node| node.fill_style() == Some("S:1"));

        assert_eq!(found.map(|node| node.id.as_str()), Some("1:1"));
    }

    #[test]
    fn test_find_checks_root_first() {
        let root = tree();

        let found = root.find(&|node: &Node| node.node_type == "DOCUMENT" || node.id == "1:1");

        assert_eq!(found.map(|node| node.id.as_str()), Some("0:0"));
    }

    #[test]
    fn test_find_without_match() {
        assert!(tree().find(&|node: &Node| node.id == "9:9").is_none());
    }

    #[test]
    fn test_file_tolerates_missing_styles() {
        let file: DesignFile =
            serde_json::from_value(json!({"document": {"id": "0:0"}, "name": "Empty"})).unwrap();

        assert!(file.styles.is_empty());
        assert!(file.document.children.is_empty());
    }
}
