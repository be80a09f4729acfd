//! Host - the live target structure the renderer mutates.
//!
//! The mount and diff engines only talk to a host through this trait, the
//! same small set of operations a DOM offers. Handles are [`ElementId`]s
//! allocated by the host.

use crate::error::Result;
use crate::types::ElementId;

/// A mutable tree of live elements and text nodes.
pub trait Host {
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<ElementId>;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> Result<ElementId>;

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) -> Result<()>;

    fn remove_attribute(&mut self, el: ElementId, name: &str) -> Result<()>;

    /// Replace every child of `el` with a single text node.
    ///
    /// The empty string leaves `el` without children.
    fn set_text_content(&mut self, el: ElementId, text: &str) -> Result<()>;

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent.
    fn append_child(&mut self, parent: ElementId, child: ElementId) -> Result<()>;

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<()>;

    /// Put `new` in the place of `old` within `old`'s parent.
    ///
    /// A detached `old` is left as is.
    fn replace_with(&mut self, old: ElementId, new: ElementId) -> Result<()>;

    /// Current parent of `el`.
    fn parent(&self, el: ElementId) -> Option<ElementId>;
}
