//! Tree node types.
//!
//! A [`VNode`] describes one element: tag, attributes, children. Children
//! are either a single text/number value or a sequence of nodes, never
//! mixed. A mounted node also carries its live handle, attached by the
//! mount engine and adopted by the diff engine.

use std::collections::BTreeMap;

use crate::types::{ElementId, Scalar};

/// Attribute name → value. Sorted, so iteration order is stable.
pub type Attributes = BTreeMap<String, String>;

/// Build an [`Attributes`] map.
///
/// ```ignore
/// let a = attrs! { "id" => "div-wrapper", "class" => "span-str" };
/// ```
#[macro_export]
macro_rules! attrs {
    () => {
        $crate::primitives::Attributes::new()
    };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::primitives::Attributes::new();
        $(
            map.insert(::std::string::ToString::to_string(&$name), ::std::string::ToString::to_string(&$value));
        )+
        map
    }};
}

// =============================================================================
// Children
// =============================================================================

/// Children of a node.
#[derive(Debug, Clone)]
pub enum Children {
    /// A single text or number value.
    Text(Scalar),
    /// An ordered sequence of child nodes.
    Nodes(Vec<VNode>),
}

impl Children {
    pub fn is_text(&self) -> bool {
        matches!(self, Children::Text(_))
    }

    /// Child nodes, empty for text children.
    pub fn nodes(&self) -> &[VNode] {
        match self {
            Children::Nodes(nodes) => nodes,
            Children::Text(_) => &[],
        }
    }
}

impl Default for Children {
    fn default() -> Self {
        Children::Nodes(Vec::new())
    }
}

impl From<Scalar> for Children {
    fn from(value: Scalar) -> Self {
        Children::Text(value)
    }
}

impl From<&str> for Children {
    fn from(value: &str) -> Self {
        Children::Text(value.into())
    }
}

impl From<String> for Children {
    fn from(value: String) -> Self {
        Children::Text(value.into())
    }
}

impl From<f64> for Children {
    fn from(value: f64) -> Self {
        Children::Text(value.into())
    }
}

impl From<i32> for Children {
    fn from(value: i32) -> Self {
        Children::Text(value.into())
    }
}

impl From<Vec<VNode>> for Children {
    fn from(nodes: Vec<VNode>) -> Self {
        Children::Nodes(nodes)
    }
}

impl<const N: usize> From<[VNode; N]> for Children {
    fn from(nodes: [VNode; N]) -> Self {
        Children::Nodes(nodes.into())
    }
}

// =============================================================================
// VNode
// =============================================================================

/// One element of a UI tree.
#[derive(Debug, Clone)]
pub struct VNode {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Children,
    /// Live handle, set by mount or adopted by diff.
    pub(crate) el: Option<ElementId>,
}

impl VNode {
    /// A node with no attributes and no children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            children: Children::default(),
            el: None,
        }
    }

    /// Set one attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attrs.insert(name.into(), value.to_string());
        self
    }

    /// Replace the children with a text/number value.
    pub fn text(mut self, value: impl Into<Scalar>) -> Self {
        self.children = Children::Text(value.into());
        self
    }

    /// Append a child node. Text children are discarded first.
    pub fn child(mut self, node: VNode) -> Self {
        match &mut self.children {
            Children::Nodes(nodes) => nodes.push(node),
            Children::Text(_) => self.children = Children::Nodes(vec![node]),
        }
        self
    }

    /// Replace the children with a node sequence.
    pub fn children(mut self, nodes: impl IntoIterator<Item = VNode>) -> Self {
        self.children = Children::Nodes(nodes.into_iter().collect());
        self
    }

    /// The live handle, if this node is mounted.
    pub fn el(&self) -> Option<ElementId> {
        self.el
    }

    /// Check that this node and every descendant carries a live handle.
    pub fn is_fully_mounted(&self) -> bool {
        self.el.is_some() && self.children.nodes().iter().all(VNode::is_fully_mounted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let node = VNode::new("div")
            .attr("id", "x")
            .child(VNode::new("h1").text(1))
            .child(VNode::new("span").text("hi"));

        assert_eq!(node.tag, "div");
        assert_eq!(node.attrs.get("id").map(String::as_str), Some("x"));
        assert_eq!(node.children.nodes().len(), 2);
        assert!(node.el().is_none());
        assert!(!node.is_fully_mounted());
    }

    #[test]
    fn test_child_replaces_text() {
        let node = VNode::new("p").text("old").child(VNode::new("b"));
        assert!(!node.children.is_text());
        assert_eq!(node.children.nodes().len(), 1);
    }

    #[test]
    fn test_attrs_macro() {
        let empty: Attributes = attrs! {};
        assert!(empty.is_empty());

        let map = attrs! { "id" => "x", "tabindex" => 3 };
        assert_eq!(map.get("id").map(String::as_str), Some("x"));
        assert_eq!(map.get("tabindex").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_children_conversions() {
        assert!(Children::from("a").is_text());
        assert!(Children::from(2).is_text());
        assert!(!Children::from(vec![VNode::new("li")]).is_text());
        assert!(Children::from(Scalar::from(1.5)).is_text());
    }
}
