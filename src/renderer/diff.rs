//! Diff/Patch Engine - reconcile a mounted tree with a new render.
//!
//! `diff(host, previous, next)` mutates the live structure reachable from
//! `previous`'s handle until it matches `next`, and leaves `next` holding
//! the handles so the next render can be diffed against it.
//!
//! # Algorithm
//!
//! 1. Tag mismatch: replace the live element (see [`ReplaceMode`]) and stop.
//! 2. Tag match: `next` adopts `previous`'s element, then
//!    - attributes: set every new or changed value, then remove every key
//!      missing from the new map
//!    - children, by shape:
//!
//! ```text
//! old \ new   text                       nodes
//! text        set text if changed        clear text, mount all new
//! nodes       set text (drops old list)  positional: diff 0..m,
//!                                        mount new[m..], remove old[m..]
//! ```
//!
//! Children are matched by position only. An insertion in the middle of a
//! list diffs every later sibling against its old neighbor.
//!
//! A malformed `next` or a `previous` node without a handle is rejected
//! before the first host call: a failed diff leaves the live structure
//! exactly as `previous` describes it.

use tracing::{debug, trace};

use super::host::Host;
use super::mount::{attach, build, validate_tree};
use crate::config::{self, ReplaceMode};
use crate::error::{RenderError, Result};
use crate::primitives::{Attributes, Children, VNode};
use crate::types::ElementId;

/// Patch the live structure of `previous` to match `next`.
pub fn diff<H: Host + ?Sized>(host: &mut H, previous: &VNode, next: &mut VNode) -> Result<()> {
    validate_tree(next)?;
    check_handles(previous, next)?;
    patch(host, previous, next)
}

/// Every `previous` node the patch walk will read a handle from has one.
fn check_handles(previous: &VNode, next: &VNode) -> Result<()> {
    handle_of(previous)?;
    if previous.tag != next.tag {
        return Ok(());
    }

    if let (Children::Nodes(old), Children::Nodes(new)) = (&previous.children, &next.children) {
        for (old_child, new_child) in old.iter().zip(new) {
            check_handles(old_child, new_child)?;
        }
        for old_child in old.iter().skip(new.len()) {
            handle_of(old_child)?;
        }
    }
    Ok(())
}

fn handle_of(node: &VNode) -> Result<ElementId> {
    node.el.ok_or_else(|| RenderError::MissingHandle {
        tag: node.tag.clone(),
    })
}

fn patch<H: Host + ?Sized>(host: &mut H, previous: &VNode, next: &mut VNode) -> Result<()> {
    let el = handle_of(previous)?;

    if previous.tag != next.tag {
        return replace(host, el, previous, next);
    }

    trace!(tag = %next.tag, %el, "patch");
    next.el = Some(el);

    patch_attributes(host, el, &previous.attrs, &next.attrs)?;
    patch_children(host, el, &previous.children, &mut next.children)
}

/// Tag changed: swap in a new element, no attribute or child reconciliation.
fn replace<H: Host + ?Sized>(
    host: &mut H,
    el: ElementId,
    previous: &VNode,
    next: &mut VNode,
) -> Result<()> {
    next.el = None;
    forget_handles(&mut next.children);

    let mode = config::replace_mode();
    let replacement = match mode {
        ReplaceMode::Empty => host.create_element(&next.tag)?,
        ReplaceMode::Remount => build(host, next)?,
    };

    host.replace_with(el, replacement)?;
    next.el = Some(replacement);
    debug!(from = %previous.tag, to = %next.tag, old = %el, new = %replacement, ?mode, "replace");
    Ok(())
}

/// Clear handles a cloned subtree may still carry.
fn forget_handles(children: &mut Children) {
    if let Children::Nodes(nodes) = children {
        for node in nodes {
            node.el = None;
            forget_handles(&mut node.children);
        }
    }
}

fn patch_attributes<H: Host + ?Sized>(
    host: &mut H,
    el: ElementId,
    old: &Attributes,
    new: &Attributes,
) -> Result<()> {
    for (name, value) in new {
        if old.get(name) != Some(value) {
            host.set_attribute(el, name, value)?;
        }
    }

    for name in old.keys() {
        if !new.contains_key(name) {
            host.remove_attribute(el, name)?;
        }
    }

    Ok(())
}

fn patch_children<H: Host + ?Sized>(
    host: &mut H,
    el: ElementId,
    old: &Children,
    new: &mut Children,
) -> Result<()> {
    match (old, new) {
        (Children::Text(old_text), Children::Text(new_text)) => {
            if old_text != new_text {
                host.set_text_content(el, &new_text.to_string())?;
            }
        }
        // Old child elements are dropped by the content replacement, not
        // detached one by one.
        (Children::Nodes(_), Children::Text(new_text)) => {
            host.set_text_content(el, &new_text.to_string())?;
        }
        (Children::Text(_), Children::Nodes(new_nodes)) => {
            host.set_text_content(el, "")?;
            for child in new_nodes.iter_mut() {
                attach(host, child, el)?;
            }
        }
        (Children::Nodes(old_nodes), Children::Nodes(new_nodes)) => {
            let common = old_nodes.len().min(new_nodes.len());

            for (old_child, new_child) in old_nodes.iter().zip(new_nodes.iter_mut()) {
                patch(host, old_child, new_child)?;
            }

            if new_nodes.len() > common {
                debug!(%el, added = new_nodes.len() - common, "grow children");
                for child in new_nodes.iter_mut().skip(common) {
                    attach(host, child, el)?;
                }
            }

            if old_nodes.len() > common {
                debug!(%el, removed = old_nodes.len() - common, "shrink children");
                for child in old_nodes.iter().skip(common) {
                    host.remove_child(el, handle_of(child)?)?;
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attrs;
    use crate::config::{reset_config, set_replace_mode};
    use crate::primitives::h;
    use crate::renderer::{mount, Document, Mutation};
    use crate::types::MutationKind;

    fn mounted(doc: &mut Document, mut tree: VNode) -> VNode {
        let root = doc.root();
        mount(doc, &mut tree, root).unwrap();
        doc.take_mutations();
        tree
    }

    #[test]
    fn test_text_change_sets_text_once() {
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("h1", attrs! {}, 1));
        let mut new = h("h1", attrs! {}, 2);

        diff(&mut doc, &old, &mut new).unwrap();

        assert_eq!(new.el(), old.el());
        assert_eq!(
            doc.mutations(),
            &[Mutation::SetText {
                el: old.el().unwrap(),
                text: "2".into()
            }]
        );
    }

    #[test]
    fn test_text_to_number_with_same_print_still_updates() {
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("h1", attrs! {}, "1"));
        let mut new = h("h1", attrs! {}, 1);

        diff(&mut doc, &old, &mut new).unwrap();
        assert_eq!(doc.mutation_kinds(), MutationKind::SET_TEXT);
    }

    #[test]
    fn test_nodes_to_text() {
        let mut doc = Document::new();
        let old = mounted(
            &mut doc,
            h("ul", attrs! {}, vec![h("li", attrs! {}, "a"), h("li", attrs! {}, "b")]),
        );
        let mut new = h("ul", attrs! {}, "empty");

        diff(&mut doc, &old, &mut new).unwrap();

        let ul = new.el().unwrap();
        assert_eq!(doc.inner_html(ul), "empty");
        assert_eq!(doc.mutation_count(), 1);
    }

    #[test]
    fn test_text_to_nodes() {
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("ul", attrs! {}, "loading"));
        let mut new = h("ul", attrs! {}, vec![h("li", attrs! {}, "a"), h("li", attrs! {}, "b")]);

        diff(&mut doc, &old, &mut new).unwrap();

        let ul = new.el().unwrap();
        assert_eq!(doc.inner_html(ul), "<li>a</li><li>b</li>");
        assert!(new.is_fully_mounted());
        assert_eq!(doc.mutations()[0], Mutation::SetText { el: ul, text: String::new() });
    }

    #[test]
    fn test_missing_handle() {
        let mut doc = Document::new();
        let old = h("div", attrs! {}, "never mounted");
        let mut new = h("div", attrs! {}, "x");

        assert_eq!(
            diff(&mut doc, &old, &mut new),
            Err(RenderError::MissingHandle { tag: "div".into() })
        );
    }

    #[test]
    fn test_malformed_next() {
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("div", attrs! {}, "x"));
        let mut new = h("bad tag", attrs! {}, "x");

        assert!(matches!(
            diff(&mut doc, &old, &mut new),
            Err(RenderError::MalformedNode { .. })
        ));
        assert_eq!(doc.mutation_count(), 0);
    }

    #[test]
    fn test_malformed_later_sibling_touches_nothing() {
        let mut doc = Document::new();
        let old = mounted(
            &mut doc,
            h("div", attrs! {}, vec![h("span", attrs! {}, "x"), h("p", attrs! {}, "y")]),
        );
        let mut new = h(
            "div",
            attrs! {},
            vec![h("span", attrs! {}, "changed"), h("bad tag", attrs! {}, "y")],
        );

        assert_eq!(
            diff(&mut doc, &old, &mut new),
            Err(RenderError::MalformedNode { tag: "bad tag".into() })
        );
        assert_eq!(doc.mutation_count(), 0);
        assert_eq!(doc.inner_html(doc.root()), "<div><span>x</span><p>y</p></div>");
    }

    #[test]
    fn test_missing_handle_deep_in_previous_touches_nothing() {
        let mut doc = Document::new();
        let mut old = mounted(
            &mut doc,
            h("ul", attrs! {}, vec![h("li", attrs! {}, "a"), h("li", attrs! {}, "b")]),
        );
        if let Children::Nodes(items) = &mut old.children {
            items[1].el = None;
        }
        let mut new = h("ul", attrs! {}, vec![h("li", attrs! {}, "changed")]);

        assert_eq!(
            diff(&mut doc, &old, &mut new),
            Err(RenderError::MissingHandle { tag: "li".into() })
        );
        assert_eq!(doc.mutation_count(), 0);
    }

    #[test]
    fn test_replace_empty_forgets_cloned_handles() {
        reset_config();
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("span", attrs! {}, vec![h("b", attrs! {}, "x")]));

        let mut new = old.clone();
        new.tag = "div".into();
        diff(&mut doc, &old, &mut new).unwrap();

        assert!(new.el().is_some());
        assert!(new.children.nodes()[0].el().is_none());
        assert_eq!(doc.inner_html(doc.root()), "<div></div>");
    }

    #[test]
    fn test_replace_remount_materializes_next() {
        set_replace_mode(ReplaceMode::Remount);
        let mut doc = Document::new();
        let old = mounted(&mut doc, h("span", attrs! { "class" => "a" }, "x"));
        let mut new = h("div", attrs! { "id" => "d" }, vec![h("i", attrs! {}, "y")]);

        diff(&mut doc, &old, &mut new).unwrap();

        assert!(new.is_fully_mounted());
        assert_eq!(
            doc.inner_html(doc.root()),
            r#"<div id="d"><i>y</i></div>"#
        );
        reset_config();
    }

    #[test]
    fn test_nested_list_shrink_removes_from_live_parent() {
        let mut doc = Document::new();
        let old = mounted(
            &mut doc,
            h(
                "div",
                attrs! {},
                vec![h("ul", attrs! {}, vec![h("li", attrs! {}, 1), h("li", attrs! {}, 2)])],
            ),
        );
        let mut new = h("div", attrs! {}, vec![h("ul", attrs! {}, vec![h("li", attrs! {}, 1)])]);

        diff(&mut doc, &old, &mut new).unwrap();

        assert_eq!(
            doc.inner_html(doc.root()),
            "<div><ul><li>1</li></ul></div>"
        );
    }
}
