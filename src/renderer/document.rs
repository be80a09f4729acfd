//! Document - an in-memory host.
//!
//! Nodes live in an arena indexed by [`ElementId`]. Detached nodes stay in
//! the arena; ids are never reused. Every mutation made through the
//! [`Host`] trait is appended to a log, which is how tests observe what a
//! mount or diff actually did.
//!
//! # Example
//!
//! ```ignore
//! let mut doc = Document::new();
//! let root = doc.root();
//! let div = doc.create_element("div")?;
//! doc.set_attribute(div, "id", "app")?;
//! doc.append_child(root, div)?;
//! assert_eq!(doc.to_html(root), r#"<body><div id="app"></div></body>"#);
//! ```

use std::fmt::Write as _;

use tracing::trace;

use super::host::Host;
use crate::error::{RenderError, Result};
use crate::primitives::Attributes;
use crate::types::{ElementId, MutationKind};

// =============================================================================
// Nodes
// =============================================================================

/// What a live node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String, attrs: Attributes },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

// =============================================================================
// Mutations
// =============================================================================

/// One recorded live-structure mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateElement { el: ElementId, tag: String },
    CreateText { el: ElementId, text: String },
    SetAttribute { el: ElementId, name: String, value: String },
    RemoveAttribute { el: ElementId, name: String },
    SetText { el: ElementId, text: String },
    AppendChild { parent: ElementId, child: ElementId },
    RemoveChild { parent: ElementId, child: ElementId },
    Replace { old: ElementId, new: ElementId },
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::CreateElement { .. } | Mutation::CreateText { .. } => MutationKind::CREATE,
            Mutation::SetAttribute { .. } => MutationKind::SET_ATTRIBUTE,
            Mutation::RemoveAttribute { .. } => MutationKind::REMOVE_ATTRIBUTE,
            Mutation::SetText { .. } => MutationKind::SET_TEXT,
            Mutation::AppendChild { .. } => MutationKind::APPEND,
            Mutation::RemoveChild { .. } => MutationKind::REMOVE,
            Mutation::Replace { .. } => MutationKind::REPLACE,
        }
    }
}

// =============================================================================
// Document
// =============================================================================

/// In-memory live structure with a `body` root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: ElementId,
    log: Vec<Mutation>,
    kinds: MutationKind,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: ElementId(0),
            log: Vec::new(),
            kinds: MutationKind::NONE,
        };
        doc.root = doc.alloc(NodeKind::Element {
            tag: "body".to_string(),
            attrs: Attributes::new(),
        });
        doc
    }

    /// The root element (`body`).
    pub fn root(&self) -> ElementId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind) -> ElementId {
        let id = ElementId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, el: ElementId) -> Result<&Node> {
        self.nodes.get(el.0).ok_or(RenderError::UnknownElement(el))
    }

    fn node_mut(&mut self, el: ElementId) -> Result<&mut Node> {
        self.nodes.get_mut(el.0).ok_or(RenderError::UnknownElement(el))
    }

    fn attrs_mut(&mut self, el: ElementId) -> Result<&mut Attributes> {
        match &mut self.node_mut(el)?.kind {
            NodeKind::Element { attrs, .. } => Ok(attrs),
            NodeKind::Text(_) => Err(RenderError::UnknownElement(el)),
        }
    }

    fn record(&mut self, mutation: Mutation) {
        trace!(?mutation, "mutate");
        self.kinds |= mutation.kind();
        self.log.push(mutation);
    }

    /// Unlink `child` from its parent's child list, if it has a parent.
    fn detach(&mut self, child: ElementId) -> Result<()> {
        if let Some(parent) = self.node(child)?.parent {
            self.node_mut(parent)?.children.retain(|&c| c != child);
            self.node_mut(child)?.parent = None;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn kind(&self, el: ElementId) -> Option<&NodeKind> {
        self.nodes.get(el.0).map(|node| &node.kind)
    }

    /// Tag of an element (None for text nodes and unknown ids).
    pub fn tag(&self, el: ElementId) -> Option<&str> {
        match self.kind(el)? {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attributes(&self, el: ElementId) -> Option<&Attributes> {
        match self.kind(el)? {
            NodeKind::Element { attrs, .. } => Some(attrs),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, el: ElementId, name: &str) -> Option<&str> {
        self.attributes(el)?.get(name).map(String::as_str)
    }

    /// Children of `el` in order (empty for unknown ids).
    pub fn children(&self, el: ElementId) -> &[ElementId] {
        match self.nodes.get(el.0) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Concatenated text of every text node under `el`.
    pub fn text_content(&self, el: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(el, &mut out);
        out
    }

    fn collect_text(&self, el: ElementId, out: &mut String) {
        match self.kind(el) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element { .. }) => {
                for &child in self.children(el) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// First attached element under `root()` whose `id` attribute matches.
    pub fn get_element_by_id(&self, id: &str) -> Option<ElementId> {
        self.find(self.root, &|el| self.attribute(el, "id") == Some(id))
    }

    fn find(&self, el: ElementId, pred: &dyn Fn(ElementId) -> bool) -> Option<ElementId> {
        if pred(el) {
            return Some(el);
        }
        self.children(el)
            .iter()
            .find_map(|&child| self.find(child, pred))
    }

    /// Serialize `el` and its subtree as markup.
    pub fn to_html(&self, el: ElementId) -> String {
        let mut out = String::new();
        self.write_html(el, &mut out);
        out
    }

    /// Serialize the children of `el` (its inner markup).
    pub fn inner_html(&self, el: ElementId) -> String {
        let mut out = String::new();
        for &child in self.children(el) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, el: ElementId, out: &mut String) {
        match self.kind(el) {
            Some(NodeKind::Text(text)) => out.push_str(&escape(text)),
            Some(NodeKind::Element { tag, attrs }) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    let _ = write!(out, " {}=\"{}\"", name, escape(value));
                }
                out.push('>');
                for &child in self.children(el) {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
            None => {}
        }
    }

    /// Total number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // =========================================================================
    // Mutation log
    // =========================================================================

    pub fn mutations(&self) -> &[Mutation] {
        &self.log
    }

    pub fn mutation_count(&self) -> usize {
        self.log.len()
    }

    /// Union of the kinds of every logged mutation.
    pub fn mutation_kinds(&self) -> MutationKind {
        self.kinds
    }

    /// Drain the log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        self.kinds = MutationKind::NONE;
        std::mem::take(&mut self.log)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// =============================================================================
// Host
// =============================================================================

impl Host for Document {
    fn create_element(&mut self, tag: &str) -> Result<ElementId> {
        let el = self.alloc(NodeKind::Element {
            tag: tag.to_string(),
            attrs: Attributes::new(),
        });
        self.record(Mutation::CreateElement {
            el,
            tag: tag.to_string(),
        });
        Ok(el)
    }

    fn create_text(&mut self, text: &str) -> Result<ElementId> {
        let el = self.alloc(NodeKind::Text(text.to_string()));
        self.record(Mutation::CreateText {
            el,
            text: text.to_string(),
        });
        Ok(el)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) -> Result<()> {
        self.attrs_mut(el)?
            .insert(name.to_string(), value.to_string());
        self.record(Mutation::SetAttribute {
            el,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, el: ElementId, name: &str) -> Result<()> {
        self.attrs_mut(el)?.remove(name);
        self.record(Mutation::RemoveAttribute {
            el,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_text_content(&mut self, el: ElementId, text: &str) -> Result<()> {
        if let NodeKind::Text(existing) = &mut self.node_mut(el)?.kind {
            *existing = text.to_string();
        } else {
            let old = std::mem::take(&mut self.node_mut(el)?.children);
            for child in old {
                self.node_mut(child)?.parent = None;
            }
            if !text.is_empty() {
                let text_node = self.alloc(NodeKind::Text(text.to_string()));
                self.node_mut(text_node)?.parent = Some(el);
                self.node_mut(el)?.children.push(text_node);
            }
        }
        self.record(Mutation::SetText {
            el,
            text: text.to_string(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        self.node(parent)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        self.record(Mutation::AppendChild { parent, child });
        Ok(())
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<()> {
        if self.node(child)?.parent != Some(parent) {
            return Err(RenderError::NotAChild { parent, child });
        }
        self.detach(child)?;
        self.record(Mutation::RemoveChild { parent, child });
        Ok(())
    }

    fn replace_with(&mut self, old: ElementId, new: ElementId) -> Result<()> {
        self.node(new)?;
        if let Some(parent) = self.node(old)?.parent {
            self.detach(new)?;
            let siblings = &mut self.node_mut(parent)?.children;
            if let Some(slot) = siblings.iter_mut().find(|c| **c == old) {
                *slot = new;
            }
            self.node_mut(new)?.parent = Some(parent);
            self.node_mut(old)?.parent = None;
        }
        self.record(Mutation::Replace { old, new });
        Ok(())
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.nodes.get(el.0).and_then(|node| node.parent)
    }
}

// =============================================================================
// Tests
// =============================================================================
