//! Reactivity Engine - dependency tracking and effects.
//!
//! The engine manages three pieces:
//! - Registry: the Dependency Store (target → key → effects)
//! - Effect: the runner and the per-thread current-effect stack
//! - Reactive / Signal: wrappers whose reads track and whose writes notify
//!
//! # Data Flow
//!
//! ```text
//! run_effect(f) ──► f reads state.get("count") ──► registry.track(state, "count", f)
//!
//! state.set("count", 2) ──► write ──► registry.notify(state, "count") ──► f runs again
//! ```
//!
//! Everything happens inline on the writer's call stack: no queue, no
//! batching. Engine state is thread-local and the handles are `!Send`, so
//! the engine is confined to the thread that created it.

mod effect;
mod reactive;
mod registry;
mod signal;

pub use effect::*;
pub use reactive::*;
pub use registry::*;
pub use signal::*;
