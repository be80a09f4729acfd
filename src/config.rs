//! Runtime configuration.
//!
//! Settings live per thread, next to the reactive engine they configure.
//! Read them with the getters; change them with the setters before mounting.

use std::cell::Cell;

// =============================================================================
// Replace Mode
// =============================================================================

/// What `diff` builds when a node's tag changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplaceMode {
    /// Replace with a fresh, empty element of the new tag.
    ///
    /// Attributes and children of the new node are not materialized and its
    /// descendants carry no live handles.
    #[default]
    Empty,
    /// Replace with the full materialization of the new node.
    Remount,
}

// =============================================================================
// Runtime Config
// =============================================================================

/// All runtime settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Tag-change behavior of the diff engine.
    pub replace_mode: ReplaceMode,
    /// Drop an effect's previous registrations before each re-run.
    ///
    /// When false, a registration is permanent: an effect stays subscribed
    /// to every key it ever read.
    pub dependency_cleanup: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            replace_mode: ReplaceMode::Empty,
            dependency_cleanup: true,
        }
    }
}

thread_local! {
    static CONFIG: Cell<RuntimeConfig> = Cell::new(RuntimeConfig::default());
}

/// Get the current configuration.
pub fn config() -> RuntimeConfig {
    CONFIG.with(|c| c.get())
}

/// Replace the whole configuration.
pub fn set_config(config: RuntimeConfig) {
    CONFIG.with(|c| c.set(config));
}

/// Get the current replace mode.
pub fn replace_mode() -> ReplaceMode {
    config().replace_mode
}

/// Set the replace mode.
pub fn set_replace_mode(mode: ReplaceMode) {
    CONFIG.with(|c| {
        let mut current = c.get();
        current.replace_mode = mode;
        c.set(current);
    });
}

/// Whether stale dependencies are dropped before an effect re-runs.
pub fn dependency_cleanup() -> bool {
    config().dependency_cleanup
}

/// Enable or disable stale dependency cleanup.
pub fn set_dependency_cleanup(enabled: bool) {
    CONFIG.with(|c| {
        let mut current = c.get();
        current.dependency_cleanup = enabled;
        c.set(current);
    });
}

/// Restore the defaults (for testing).
pub fn reset_config() {
    set_config(RuntimeConfig::default());
}
