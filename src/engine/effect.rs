//! Effect Runner - run a computation with dependency tracking.
//!
//! The "current effect" is a per-thread stack. `Effect::run` pushes the
//! effect, calls its body once, and pops it again through a scope guard, so
//! the marker is restored on every exit path (including a panicking body).
//! Nested runs attribute reads to the innermost effect.
//!
//! The runner never loops. Re-invocation happens when the Dependency Store
//! calls `run` again from `notify`.
//!
//! # Example
//!
//! ```ignore
//! use spark_view::engine::{create_reactive, run_effect};
//!
//! let user = create_reactive([("age", Scalar::from(19))]);
//! let user_clone = user.clone();
//! let handle = run_effect(move || {
//!     println!("age: {:?}", user_clone.get("age"));
//! });
//!
//! user.set("age", 20); // prints again
//! handle.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use scopeguard::defer;
use tracing::trace;

use super::registry;
use crate::config;
use crate::types::{EffectId, TargetId};

// =============================================================================
// Current Effect Stack
// =============================================================================

thread_local! {
    /// Running effects, innermost last. `None` suspends tracking.
    static EFFECT_STACK: RefCell<Vec<Option<Effect>>> = RefCell::new(Vec::new());

    static NEXT_EFFECT_ID: Cell<u64> = const { Cell::new(0) };
}

fn push_current(effect: Option<Effect>) {
    EFFECT_STACK.with(|stack| stack.borrow_mut().push(effect));
}

fn pop_current() {
    EFFECT_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });
}

/// The effect reads are currently attributed to, if any.
pub fn current_effect() -> Option<Effect> {
    EFFECT_STACK.with(|stack| stack.borrow().last().cloned().flatten())
}

/// Depth of the current effect stack (including untracked frames).
pub fn effect_depth() -> usize {
    EFFECT_STACK.with(|stack| stack.borrow().len())
}

/// Register the current effect (if any) as a dependent of `key` of `target`.
pub fn track_read(target: TargetId, key: &str) {
    if let Some(effect) = current_effect() {
        registry::track(target, key, &effect);
    }
}

/// Run `f` without attributing its reads to the current effect.
pub fn untrack<R>(f: impl FnOnce() -> R) -> R {
    push_current(None);
    defer! {
        pop_current();
    }
    f()
}

// =============================================================================
// Effect
// =============================================================================

struct EffectInner {
    id: EffectId,
    body: Rc<dyn Fn()>,
    /// (target, key) pairs this effect is registered under.
    deps: RefCell<HashSet<(TargetId, String)>>,
    active: Cell<bool>,
    runs: Cell<u64>,
}

/// A re-runnable computation.
///
/// Cloning shares the same effect; identity is [`Effect::id`].
#[derive(Clone)]
pub struct Effect {
    inner: Rc<EffectInner>,
}

impl Effect {
    fn new(body: impl Fn() + 'static) -> Self {
        let id = NEXT_EFFECT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            EffectId(id)
        });
        Self {
            inner: Rc::new(EffectInner {
                id,
                body: Rc::new(body),
                deps: RefCell::new(HashSet::new()),
                active: Cell::new(true),
                runs: Cell::new(0),
            }),
        }
    }

    pub fn id(&self) -> EffectId {
        self.inner.id
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.get()
    }

    /// How many times the body has been invoked.
    pub fn run_count(&self) -> u64 {
        self.inner.runs.get()
    }

    /// Number of (target, key) pairs this effect is registered under.
    pub fn dependency_count(&self) -> usize {
        self.inner.deps.borrow().len()
    }

    /// Invoke the body once with this effect as the current effect.
    ///
    /// With dependency cleanup enabled, registrations from the previous run
    /// are dropped first so this run's reads become the new dependency set.
    /// A stopped effect does nothing.
    pub fn run(&self) {
        if !self.is_active() {
            trace!(effect = %self.id(), "skip stopped effect");
            return;
        }

        if config::dependency_cleanup() {
            registry::untrack_effect(self);
        }

        self.inner.runs.set(self.inner.runs.get() + 1);
        trace!(effect = %self.id(), run = self.run_count(), "run effect");

        // Clone the body out so a re-entrant run never holds a borrow of self
        let body = Rc::clone(&self.inner.body);
        push_current(Some(self.clone()));
        defer! {
            pop_current();
        }
        body();
    }

    /// Deactivate and drop every registration.
    pub fn stop(&self) {
        self.inner.active.set(false);
        registry::untrack_effect(self);
    }

    pub(crate) fn record_dependency(&self, target: TargetId, key: &str) {
        self.inner.deps.borrow_mut().insert((target, key.to_string()));
    }

    pub(crate) fn take_dependencies(&self) -> HashSet<(TargetId, String)> {
        std::mem::take(&mut *self.inner.deps.borrow_mut())
    }
}

impl PartialEq for Effect {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Effect {}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .field("runs", &self.run_count())
            .field("deps", &self.dependency_count())
            .finish()
    }
}

// =============================================================================
// run_effect
// =============================================================================

/// Handle to an effect created by [`run_effect`].
///
/// Dropping the handle does NOT stop the effect: it stays registered for as
/// long as it has dependencies. Call [`EffectHandle::stop`] to tear it down.
#[derive(Debug, Clone)]
pub struct EffectHandle {
    effect: Effect,
}

impl EffectHandle {
    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn id(&self) -> EffectId {
        self.effect.id()
    }

    pub fn run_count(&self) -> u64 {
        self.effect.run_count()
    }

    pub fn is_active(&self) -> bool {
        self.effect.is_active()
    }

    /// Stop the effect: it will never run again.
    pub fn stop(&self) {
        self.effect.stop();
    }
}

/// Run `body` once under dependency tracking.
///
/// Every reactive read inside `body` registers the effect; a later write to
/// any of those keys runs `body` again, synchronously, before the write
/// returns.
pub fn run_effect(body: impl Fn() + 'static) -> EffectHandle {
    let effect = Effect::new(body);
    effect.run();
    EffectHandle { effect }
}

// =============================================================================
// Tests
// =============================================================================
