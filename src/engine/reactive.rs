//! Reactive mappings - tracked reads, notifying writes.
//!
//! [`Reactive`] wraps a plain key → value mapping. Accessors stand in for
//! property interception:
//!
//! - reads (`get`, `with`, `contains_key`) register the current effect
//! - writes (`set`, `update`, `remove`) store the value first, then notify
//! - `peek` reads without tracking
//!
//! Reactivity is shallow: values are returned as stored, nested mappings
//! are not wrapped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::effect::track_read;
use super::registry::{allocate_target_id, notify};
use crate::types::{Scalar, TargetId};

struct ReactiveInner<V> {
    id: TargetId,
    raw: RefCell<HashMap<String, V>>,
}

/// A reactive key → value mapping.
///
/// Cloning shares the mapping and its identity.
pub struct Reactive<V = Scalar> {
    inner: Rc<ReactiveInner<V>>,
}

impl<V> Clone for Reactive<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Reactive<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactive")
            .field("id", &self.inner.id)
            .field("raw", &self.inner.raw.borrow())
            .finish()
    }
}

impl<V: Clone + 'static> Reactive<V> {
    /// Wrap an existing mapping.
    pub fn wrap(raw: HashMap<String, V>) -> Self {
        Self {
            inner: Rc::new(ReactiveInner {
                id: allocate_target_id(),
                raw: RefCell::new(raw),
            }),
        }
    }

    /// Wrap an empty mapping.
    pub fn new() -> Self {
        Self::wrap(HashMap::new())
    }

    pub fn id(&self) -> TargetId {
        self.inner.id
    }

    /// Check if both handles wrap the same mapping.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Read `key`, registering the current effect.
    pub fn get(&self, key: &str) -> Option<V> {
        track_read(self.inner.id, key);
        self.inner.raw.borrow().get(key).cloned()
    }

    /// Read `key` by reference, registering the current effect.
    ///
    /// `f` must not write to this mapping.
    pub fn with<R>(&self, key: &str, f: impl FnOnce(Option<&V>) -> R) -> R {
        track_read(self.inner.id, key);
        f(self.inner.raw.borrow().get(key))
    }

    /// Check for `key`, registering the current effect.
    pub fn contains_key(&self, key: &str) -> bool {
        track_read(self.inner.id, key);
        self.inner.raw.borrow().contains_key(key)
    }

    /// Read `key` without tracking.
    pub fn peek(&self, key: &str) -> Option<V> {
        self.inner.raw.borrow().get(key).cloned()
    }

    /// Current keys, sorted (untracked).
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.raw.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.raw.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.raw.borrow().is_empty()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Write `value` to `key`, then run the key's dependents.
    ///
    /// The store is updated before notification, so dependents that read the
    /// key again observe the new value. Writing an absent key creates it.
    pub fn set(&self, key: impl Into<String>, value: impl Into<V>) {
        let key = key.into();
        self.inner.raw.borrow_mut().insert(key.clone(), value.into());
        notify(self.inner.id, &key);
    }

    /// Compute a new value from the current one (read untracked), then `set` it.
    pub fn update(&self, key: impl Into<String>, f: impl FnOnce(Option<V>) -> V) {
        let key = key.into();
        let next = f(self.peek(&key));
        self.set(key, next);
    }

    /// Remove `key`, then run its dependents.
    pub fn remove(&self, key: &str) -> Option<V> {
        let removed = self.inner.raw.borrow_mut().remove(key);
        notify(self.inner.id, key);
        removed
    }

    /// Copy of the underlying mapping (untracked).
    pub fn snapshot(&self) -> HashMap<String, V> {
        self.inner.raw.borrow().clone()
    }
}

impl<V: Clone + 'static> Default for Reactive<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: Clone + 'static> FromIterator<(K, V)> for Reactive<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::wrap(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V: Clone + 'static> From<HashMap<String, V>> for Reactive<V> {
    fn from(raw: HashMap<String, V>) -> Self {
        Self::wrap(raw)
    }
}

/// Wrap a plain key → value mapping as a reactive handle.
pub fn create_reactive<K, V, I>(state: I) -> Reactive<V>
where
    K: Into<String>,
    V: Clone + 'static,
    I: IntoIterator<Item = (K, V)>,
{
    state.into_iter().collect()
}

// =============================================================================
// Tests
// =============================================================================
