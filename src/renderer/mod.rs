//! Renderer - materialize and patch trees in a live structure.
//!
//! - [`Host`] - the live structure API (create, attribute, text, attach)
//! - [`Document`] - in-memory host with a mutation log
//! - [`mount`] - first render of a tree
//! - [`diff`] - reconcile the previous tree with a new one
//! - [`present`] - print a live subtree to a terminal

mod diff;
mod document;
mod host;
mod mount;
pub mod terminal;

pub use diff::diff;
pub use document::{Document, Mutation, NodeKind};
pub use host::Host;
pub use mount::{create_element_tree, mount};
pub use terminal::present;
