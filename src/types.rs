//! Core types shared by the reactivity engine and the renderer.
//!
//! - Identity: [`TargetId`], [`EffectId`], [`ElementId`]
//! - Values: [`Scalar`] (the text/number leaf of a tree, default reactive value)
//! - Bookkeeping: [`MutationKind`] flags for live-structure mutations

use std::fmt;

// =============================================================================
// Identity
// =============================================================================

/// Identity of a wrapped reactive target.
///
/// Allocated once when a mapping is wrapped. Every clone of the wrapper
/// shares it, so it plays the role of object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Identity of an effect (computation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

/// Handle to a live node in a [`Host`](crate::renderer::Host).
///
/// This is the "live handle" a mounted [`VNode`](crate::primitives::VNode)
/// carries. Hosts allocate them; they are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Scalar - text or number leaf value
// =============================================================================

/// A text or number value.
///
/// Used as the text child of a tree node and as the default value type of
/// a [`Reactive`](crate::engine::Reactive) mapping. A text value never
/// equals a number value, even when they print the same.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(f64),
}

impl Scalar {
    /// The numeric value, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(_) => None,
        }
    }

    /// The text value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            Scalar::Number(_) => None,
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            // f64 Display already prints integral values without a fraction
            Scalar::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        Scalar::Number(value as f64)
    }
}

// =============================================================================
// Mutation kinds
// =============================================================================

bitflags::bitflags! {
    /// Kinds of live-structure mutation, combinable as a summary.
    ///
    /// Combine with bitwise OR: `MutationKind::SET_ATTRIBUTE | MutationKind::SET_TEXT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MutationKind: u8 {
        const NONE = 0;
        const CREATE = 1 << 0;
        const SET_ATTRIBUTE = 1 << 1;
        const REMOVE_ATTRIBUTE = 1 << 2;
        const SET_TEXT = 1 << 3;
        const APPEND = 1 << 4;
        const REMOVE = 1 << 5;
        const REPLACE = 1 << 6;
    }
}

// =============================================================================
// Tests
// =============================================================================
