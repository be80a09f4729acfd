//! Tree builder.

use super::types::{Attributes, Children, VNode};

/// Build a tree node from a tag, its attributes, and its children.
///
/// ```ignore
/// let tree = h("div", attrs! { "id" => "div-wrapper" }, vec![
///     h("h1", attrs! { "id" => "div-test" }, 1),
///     h("span", attrs! { "class" => "span-str" }, "Hello, World"),
/// ]);
/// ```
pub fn h(tag: impl Into<String>, attrs: Attributes, children: impl Into<Children>) -> VNode {
    VNode {
        tag: tag.into(),
        attrs,
        children: children.into(),
        el: None,
    }
}
