//! Mount Engine - first materialization of a tree into a host.
//!
//! For each node: create an element of the node's tag, apply every
//! attribute, then either attach one text node (text children) or mount
//! every child into it (node children). The node records the created
//! element as its live handle.
//!
//! Mounting is not idempotent: mounting the same node twice creates a
//! second element and moves the node's handle to it.

use tracing::{debug, warn};

use super::host::Host;
use crate::error::{validate_tag, Result};
use crate::primitives::{Children, VNode};
use crate::types::ElementId;

/// Materialize `node` and append it to `container`.
///
/// Every tag in the subtree is checked before the host is touched, so a
/// malformed tree fails without any live mutation.
pub fn mount<H: Host + ?Sized>(host: &mut H, node: &mut VNode, container: ElementId) -> Result<()> {
    validate_tree(node)?;
    attach(host, node, container)
}

/// Materialize `node` and its subtree without attaching it anywhere.
///
/// Returns the created element, which is also recorded on `node`.
pub fn create_element_tree<H: Host + ?Sized>(host: &mut H, node: &mut VNode) -> Result<ElementId> {
    validate_tree(node)?;
    build(host, node)
}

/// Check every tag in `node`'s subtree.
pub(crate) fn validate_tree(node: &VNode) -> Result<()> {
    validate_tag(&node.tag)?;
    node.children.nodes().iter().try_for_each(validate_tree)
}

/// [`mount`] for an already validated subtree.
pub(super) fn attach<H: Host + ?Sized>(
    host: &mut H,
    node: &mut VNode,
    container: ElementId,
) -> Result<()> {
    let el = build(host, node)?;
    host.append_child(container, el)?;
    debug!(tag = %node.tag, %el, %container, "mount");
    Ok(())
}

/// [`create_element_tree`] for an already validated subtree.
pub(super) fn build<H: Host + ?Sized>(host: &mut H, node: &mut VNode) -> Result<ElementId> {
    if let Some(previous) = node.el {
        warn!(tag = %node.tag, %previous, "node already mounted, creating a duplicate element");
    }

    let el = host.create_element(&node.tag)?;
    node.el = Some(el);

    for (name, value) in &node.attrs {
        host.set_attribute(el, name, value)?;
    }

    match &mut node.children {
        Children::Text(value) => {
            let text = host.create_text(&value.to_string())?;
            host.append_child(el, text)?;
        }
        Children::Nodes(children) => {
            for child in children {
                attach(host, child, el)?;
            }
        }
    }

    Ok(el)
}
