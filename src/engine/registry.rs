//! Dependency Store - which effects read which (target, key) pairs.
//!
//! A two-level lookup, created on demand:
//!
//! ```text
//! TargetId → key → { EffectId → Effect }
//! ```
//!
//! - `track` registers interest (deduplicated per effect)
//! - `notify` runs every registered effect, in no particular order
//! - `untrack_effect` drops all registrations of one effect
//!
//! Entries are never evicted: an emptied set stays in place.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::trace;

use super::effect::Effect;
use crate::types::{EffectId, TargetId};

type DepSet = HashMap<EffectId, Effect>;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// target → key → effects that read it.
    static TARGETS: RefCell<HashMap<TargetId, HashMap<String, DepSet>>> = RefCell::new(HashMap::new());

    /// Next target id to hand out.
    static NEXT_TARGET_ID: Cell<u64> = const { Cell::new(0) };
}

/// Allocate a fresh target identity.
pub fn allocate_target_id() -> TargetId {
    NEXT_TARGET_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        TargetId(id)
    })
}

// =============================================================================
// Track / Notify
// =============================================================================

/// Register `effect` as interested in `key` of `target`.
///
/// Registering the same effect twice for one key is a no-op.
pub fn track(target: TargetId, key: &str, effect: &Effect) {
    let inserted = TARGETS.with(|targets| {
        let mut targets = targets.borrow_mut();
        let dep = targets
            .entry(target)
            .or_default()
            .entry(key.to_string())
            .or_default();
        if dep.contains_key(&effect.id()) {
            false
        } else {
            dep.insert(effect.id(), effect.clone());
            true
        }
    });

    if inserted {
        effect.record_dependency(target, key);
        trace!(%target, key, effect = %effect.id(), "track");
    }
}

/// Run every effect registered for `key` of `target`.
///
/// The set is snapshotted first, so effects that re-register (or drop
/// registrations) while running do not disturb the fan-out.
pub fn notify(target: TargetId, key: &str) {
    let effects: Vec<Effect> = TARGETS.with(|targets| {
        targets
            .borrow()
            .get(&target)
            .and_then(|keys| keys.get(key))
            .map(|dep| dep.values().cloned().collect())
            .unwrap_or_default()
    });

    trace!(%target, key, count = effects.len(), "notify");

    for effect in effects {
        effect.run();
    }
}

/// Remove every registration held by `effect`.
pub fn untrack_effect(effect: &Effect) {
    let deps = effect.take_dependencies();
    if deps.is_empty() {
        return;
    }

    TARGETS.with(|targets| {
        let mut targets = targets.borrow_mut();
        for (target, key) in &deps {
            if let Some(dep) = targets.get_mut(target).and_then(|keys| keys.get_mut(key)) {
                dep.remove(&effect.id());
            }
        }
    });

    trace!(effect = %effect.id(), dropped = deps.len(), "untrack");
}

// =============================================================================
// Lookups
// =============================================================================

/// Number of effects registered for `key` of `target`.
pub fn dependent_count(target: TargetId, key: &str) -> usize {
    TARGETS.with(|targets| {
        targets
            .borrow()
            .get(&target)
            .and_then(|keys| keys.get(key))
            .map_or(0, |dep| dep.len())
    })
}

/// Check whether `effect` is registered for `key` of `target`.
pub fn is_tracking(target: TargetId, key: &str, effect: EffectId) -> bool {
    TARGETS.with(|targets| {
        targets
            .borrow()
            .get(&target)
            .and_then(|keys| keys.get(key))
            .is_some_and(|dep| dep.contains_key(&effect))
    })
}

/// Keys of `target` that currently have at least one dependent.
pub fn tracked_keys(target: TargetId) -> Vec<String> {
    TARGETS.with(|targets| {
        let targets = targets.borrow();
        let mut keys: Vec<String> = targets
            .get(&target)
            .map(|keys| {
                keys.iter()
                    .filter(|(_, dep)| !dep.is_empty())
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default();
        keys.sort();
        keys
    })
}

// =============================================================================
// Reset (for testing)
// =============================================================================

/// Drop all registrations (for testing).
pub fn reset_registry() {
    TARGETS.with(|targets| targets.borrow_mut().clear());
}
