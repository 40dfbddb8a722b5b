//! Gradient Mode - Disable History Tracking
//!
//! Calibration passes only observe activations, so they run with gradient
//! tracking switched off. The mode is thread-local: a forward pass on one
//! thread never changes what another thread records.
//!
//! @version 0.1.0
//! @author `AutomataNexus` Development Team

use std::cell::Cell;

// =============================================================================
// Thread-Local Gradient State
// =============================================================================

thread_local! {
    /// Whether gradient tracking is enabled for this thread.
    static GRAD_ENABLED: Cell<bool> = const { Cell::new(true) };
}

/// Returns whether gradient tracking is currently enabled.
#[must_use]
pub fn is_grad_enabled() -> bool {
    GRAD_ENABLED.with(Cell::get)
}

fn set_grad_enabled(enabled: bool) {
    GRAD_ENABLED.with(|g| g.set(enabled));
}

// =============================================================================
// NoGradGuard
// =============================================================================

/// RAII guard that disables gradient tracking within its scope.
///
/// Dropping the guard restores whatever mode was active when it was
/// created, so guards nest and unwind correctly.
///
/// # Example
/// ```rust
/// use axoncal_core::{is_grad_enabled, NoGradGuard};
///
/// {
///     let _guard = NoGradGuard::new();
///     assert!(!is_grad_enabled());
/// }
/// assert!(is_grad_enabled());
/// ```
#[must_use = "gradient tracking is re-enabled as soon as the guard is dropped"]
pub struct NoGradGuard {
    prev_state: bool,
}

impl NoGradGuard {
    /// Creates a new `NoGradGuard`, disabling gradient tracking.
    pub fn new() -> Self {
        let prev_state = is_grad_enabled();
        set_grad_enabled(false);
        Self { prev_state }
    }
}

impl Drop for NoGradGuard {
    fn drop(&mut self) {
        set_grad_enabled(self.prev_state);
    }
}

impl Default for NoGradGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a closure with gradient tracking disabled.
///
/// # Example
/// ```rust,ignore
/// let output = no_grad(|| model.call(&input))?;
/// ```
pub fn no_grad<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = NoGradGuard::new();
    f()
}

// =============================================================================
// Tests
// =============================================================================
