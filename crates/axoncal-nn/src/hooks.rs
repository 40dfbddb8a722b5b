//! Forward Hooks - Observation Points on Module Outputs
//!
//! Every module owns a [`ForwardHooks`] registry. Registering a hook returns
//! a [`HookHandle`]; the hook fires after each forward call of that module
//! until the handle is removed or dropped.
//!
//! A handle keeps only a weak reference to its registry, so it neither
//! borrows the module nor keeps it alive. Removal consumes the handle, which
//! makes "removed" a terminal state: a removed handle cannot be used again.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::fmt;
use std::sync::{Arc, Weak};

use axoncal_core::Tensor;
use parking_lot::RwLock;

// =============================================================================
// Types
// =============================================================================

/// Callback invoked with `(input, output)` after a module's forward pass.
pub type ForwardHook = Arc<dyn Fn(&Tensor, &Tensor) + Send + Sync>;

#[derive(Default)]
struct HookTable {
    next_id: u64,
    hooks: Vec<(u64, ForwardHook)>,
}

// =============================================================================
// ForwardHooks
// =============================================================================

/// Registry of forward hooks attached to one module.
#[derive(Default)]
pub struct ForwardHooks {
    table: Arc<RwLock<HookTable>>,
}

impl ForwardHooks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `hook`; it runs after every forward call until removed.
    pub fn register(&self, hook: ForwardHook) -> HookHandle {
        let mut table = self.table.write();
        let id = table.next_id;
        table.next_id += 1;
        table.hooks.push((id, hook));

        HookHandle {
            id,
            table: Arc::downgrade(&self.table),
            attached: true,
        }
    }

    /// Invokes every attached hook in registration order.
    ///
    /// Hooks run outside the registry lock.
    pub fn dispatch(&self, input: &Tensor, output: &Tensor) {
        let hooks: Vec<ForwardHook> = {
            let table = self.table.read();
            if table.hooks.is_empty() {
                return;
            }
            table.hooks.iter().map(|(_, h)| Arc::clone(h)).collect()
        };

        for hook in hooks {
            hook(input, output);
        }
    }

    /// Returns the number of attached hooks.
    pub fn len(&self) -> usize {
        self.table.read().hooks.len()
    }

    /// Returns true if no hook is attached.
    pub fn is_empty(&self) -> bool {
        self.table.read().hooks.is_empty()
    }
}

impl fmt::Debug for ForwardHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForwardHooks")
            .field("attached", &self.len())
            .finish()
    }
}

// =============================================================================
// HookHandle
// =============================================================================

/// Token for one attached forward hook.
///
/// Call [`HookHandle::remove`] to detach the hook. Dropping a handle that
/// is still attached detaches it as well.
#[must_use = "dropping a HookHandle immediately detaches its hook"]
pub struct HookHandle {
    id: u64,
    table: Weak<RwLock<HookTable>>,
    attached: bool,
}

impl HookHandle {
    /// Returns the registry-local id of this hook.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns true while the hook is still registered on a live module.
    pub fn is_attached(&self) -> bool {
        self.attached
            && self
                .table
                .upgrade()
                .is_some_and(|t| t.read().hooks.iter().any(|(id, _)| *id == self.id))
    }

    /// Detaches the hook.
    ///
    /// Returns false if the module was already dropped.
    pub fn remove(mut self) -> bool {
        self.detach()
    }

    fn detach(&mut self) -> bool {
        if !std::mem::replace(&mut self.attached, false) {
            return false;
        }

        match self.table.upgrade() {
            Some(table) => {
                let mut table = table.write();
                let before = table.hooks.len();
                table.hooks.retain(|(id, _)| *id != self.id);
                table.hooks.len() != before
            }
            None => false,
        }
    }
}

impl Drop for HookHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for HookHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookHandle")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
