//! Application pipeline - drive a component through mount and diff.
//!
//! ```text
//! Component::setup ──► context
//! effect { Component::render(context) ──► mount | diff }
//! ```

pub mod mount;

pub use mount::{create_app, App, Component, MountHandle};
