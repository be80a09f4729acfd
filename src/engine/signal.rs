//! Signal - a single reactive value.
//!
//! The one-slot counterpart of [`Reactive`](super::Reactive): one target
//! identity, one tracked key.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::effect::track_read;
use super::registry::{allocate_target_id, notify};
use crate::types::TargetId;

const VALUE_KEY: &str = "value";

struct SignalInner<T> {
    id: TargetId,
    value: RefCell<T>,
}

/// A reactive cell holding one value.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .finish()
    }
}

impl<T: Clone + 'static> Signal<T> {
    pub fn id(&self) -> TargetId {
        self.inner.id
    }

    /// Read the value, registering the current effect.
    pub fn get(&self) -> T {
        track_read(self.inner.id, VALUE_KEY);
        self.inner.value.borrow().clone()
    }

    /// Read by reference, registering the current effect.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        track_read(self.inner.id, VALUE_KEY);
        f(&self.inner.value.borrow())
    }

    /// Read without tracking.
    pub fn peek(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value`, then run dependents.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        notify(self.inner.id, VALUE_KEY);
    }

    /// Mutate in place, then run dependents.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        notify(self.inner.id, VALUE_KEY);
    }
}

/// Create a signal.
pub fn signal<T: Clone + 'static>(value: T) -> Signal<T> {
    Signal {
        inner: Rc::new(SignalInner {
            id: allocate_target_id(),
            value: RefCell::new(value),
        }),
    }
}
