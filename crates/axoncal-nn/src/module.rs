//! Module Trait - Instrumentable Model Interface
//!
//! Defines the `Module` trait implemented by every layer and container.
//! A model only has to expose its named children and support relocation to
//! a device to be instrumented; hook dispatch comes for free through
//! [`Module::call`].
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Device, Result, Tensor};

use crate::hooks::{ForwardHook, ForwardHooks, HookHandle};

// =============================================================================
// Module Trait
// =============================================================================

/// Core trait for all neural network modules.
///
/// Containers must run their children through [`Module::call`] rather than
/// [`Module::forward`], otherwise hooks attached to those children never fire.
pub trait Module: Send + Sync {
    /// Performs this module's own computation.
    fn forward(&self, input: &Tensor) -> Result<Tensor>;

    /// Returns the forward-hook registry owned by this module.
    fn hooks(&self) -> &ForwardHooks;

    /// Runs the forward pass, then every attached forward hook.
    fn call(&self, input: &Tensor) -> Result<Tensor> {
        let output = self.forward(input)?;
        self.hooks().dispatch(input, &output);
        Ok(output)
    }

    /// Attaches a forward hook to this module only.
    fn register_forward_hook(&self, hook: ForwardHook) -> HookHandle {
        self.hooks().register(hook)
    }

    /// Returns the immediate children with their local names.
    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        Vec::new()
    }

    /// Relocates parameters and buffers (recursively) to `device`.
    fn to_device(&mut self, _device: Device) -> Result<()> {
        Ok(())
    }

    /// Sets the training mode (recursively for containers).
    fn set_training(&mut self, _training: bool) {
        // Stateless modules behave the same in both modes
    }

    /// Returns whether the module is in training mode.
    ///
    /// Stateless modules report `false`.
    fn is_training(&self) -> bool {
        false
    }

    /// Sets the module to training mode.
    fn train(&mut self) {
        self.set_training(true);
    }

    /// Sets the module to evaluation mode.
    fn eval(&mut self) {
        self.set_training(false);
    }

    /// Returns the module name for debugging.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<M: Module + ?Sized> Module for Box<M> {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        (**self).forward(input)
    }

    fn hooks(&self) -> &ForwardHooks {
        (**self).hooks()
    }

    fn call(&self, input: &Tensor) -> Result<Tensor> {
        (**self).call(input)
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        (**self).named_children()
    }

    fn to_device(&mut self, device: Device) -> Result<()> {
        (**self).to_device(device)
    }

    fn set_training(&mut self, training: bool) {
        (**self).set_training(training);
    }

    fn is_training(&self) -> bool {
        (**self).is_training()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// =============================================================================
// Tree Traversal
// =============================================================================

/// Enumerates `root` and all of its descendants, depth-first, pre-order.
///
/// The root is named `""`; descendants get dotted paths such as
/// `"block1.conv2"`.
pub fn named_modules(root: &dyn Module) -> Vec<(String, &dyn Module)> {
    let mut out = Vec::new();
    collect_named(String::new(), root, &mut out);
    out
}

fn collect_named<'a>(prefix: String, module: &'a dyn Module, out: &mut Vec<(String, &'a dyn Module)>) {
    let children = module.named_children();
    out.push((prefix.clone(), module));

    for (name, child) in children {
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}.{name}")
        };
        collect_named(path, child, out);
    }
}

/// Returns the number of forward hooks attached anywhere in the tree.
pub fn attached_hook_count(root: &dyn Module) -> usize {
    named_modules(root).iter().map(|(_, m)| m.hooks().len()).sum()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::sequential::Sequential;

    // Simple test module
    #[derive(Default)]
    struct Identity {
        hooks: ForwardHooks,
    }

    impl Module for Identity {
        fn forward(&self, input: &Tensor) -> Result<Tensor> {
            Ok(input.clone())
        }

        fn hooks(&self) -> &ForwardHooks {
            &self.hooks
        }

        fn name(&self) -> &'static str {
            "Identity"
        }
    }

    #[test]
    fn test_named_modules_nested() {
        let block = Sequential::new()
            .add_named("conv1", Identity::default())
            .add_named("conv2", Identity::default());
        let model = Sequential::new()
            .add_named("block1", block)
            .add_named("fc", Identity::default());

        let names: Vec<String> = named_modules(&model).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["", "block1", "block1.conv1", "block1.conv2", "fc"]
        );
    }

    #[test]
    fn test_call_dispatches_hooks() {
        let module = Identity::default();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let handle = module.register_forward_hook(Arc::new(move |_: &Tensor, out: &Tensor| {
            sink.lock().push(out.to_vec());
        }));

        let input = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let output = module.call(&input).unwrap();
        assert_eq!(output.to_vec(), vec![1.0, 2.0]);
        assert_eq!(*seen.lock(), vec![vec![1.0, 2.0]]);

        // forward alone bypasses hooks
        module.forward(&input).unwrap();
        assert_eq!(seen.lock().len(), 1);

        handle.remove();
        assert_eq!(attached_hook_count(&module), 0);
    }

    #[test]
    fn test_boxed_module() {
        let boxed: Box<dyn Module> = Box::new(Identity::default());
        assert_eq!(boxed.name(), "Identity");
        assert!(!boxed.is_training());

        let input = Tensor::ones(&[3]);
        assert_eq!(boxed.call(&input).unwrap().to_vec(), vec![1.0; 3]);
        assert_eq!(named_modules(&boxed).len(), 1);
    }
}
