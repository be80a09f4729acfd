//! Error kinds surfaced at the mount and diff boundaries.

use crate::types::ElementId;

/// Failure while materializing or patching a tree.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A node whose tag is empty or contains whitespace.
    #[error("malformed node: invalid tag {tag:?}")]
    MalformedNode { tag: String },

    /// `diff` reached a previous node that was never mounted.
    #[error("node <{tag}> has no live handle")]
    MissingHandle { tag: String },

    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    #[error("element {child} is not a child of {parent}")]
    NotAChild { parent: ElementId, child: ElementId },
}

pub type Result<T> = std::result::Result<T, RenderError>;

/// Reject tags a host could not create an element for.
pub(crate) fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() || tag.chars().any(char::is_whitespace) {
        return Err(RenderError::MalformedNode {
            tag: tag.to_string(),
        });
    }
    Ok(())
}
