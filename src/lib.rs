//! # spark-view
//!
//! A small reactive rendering runtime.
//!
//! Application state lives in [`Reactive`] mappings. An effect that reads
//! state is re-run whenever one of the keys it read is written, and the
//! application driver uses one such effect to keep a live element tree in
//! sync with a component's render output.
//!
//! ## Architecture
//!
//! ```text
//! state.set(k, v) ──► notify ──► render effect ──► render(ctx) ──► diff(prev, next) ──► Host
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (ids, `Scalar`, `MutationKind`)
//! - [`engine`] - Dependency store, effects, `Reactive` and `Signal`
//! - [`primitives`] - Tree nodes and the `h` builder
//! - [`renderer`] - `Host` trait, in-memory `Document`, mount and diff engines
//! - [`pipeline`] - Application driver (`Component`, `create_app`)
//! - [`config`] - Per-thread runtime switches
//! - [`error`] - `RenderError`

pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{ReplaceMode, RuntimeConfig};

pub use engine::{
    create_reactive, run_effect, signal, untrack, Effect, EffectHandle, Reactive, Signal,
};

pub use error::{RenderError, Result};

pub use pipeline::{create_app, App, Component, MountHandle};

pub use primitives::{h, Attributes, Children, VNode};

pub use renderer::{create_element_tree, diff, mount, present, Document, Host, Mutation, NodeKind};
