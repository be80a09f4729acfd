//! Tree Builder - declarative UI tree nodes.
//!
//! This module provides the node shape the renderer consumes:
//! - [`VNode`] - tag, attributes, children, live handle
//! - [`h`] - build a node in one call
//! - [`attrs!`](crate::attrs) - build an attribute map
//!
//! Nodes are plain data. Rendering the same state twice yields two trees
//! that the diff engine reconciles.

mod h;
mod types;

pub use h::h;
pub use types::*;
