//! Sequential - Named Container for Modules
//!
//! A container that runs modules in sequence, passing the output of each
//! module as input to the next. Children keep the names they were added
//! with, which become path segments in [`crate::named_modules`].
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use axoncal_core::{Device, Result, Tensor};

use crate::hooks::ForwardHooks;
use crate::module::Module;

// =============================================================================
// Sequential
// =============================================================================

/// Named container that feeds each child the output of the previous one.
///
/// # Example
/// ```ignore
/// let model = Sequential::new()
///     .add_named("conv1", Conv1d::new(1, 4, 3))
///     .add(ReLU::new())
///     .add_named("fc", Linear::new(16, 2));
///
/// let output = model.call(&input)?;
/// ```
pub struct Sequential {
    modules: Vec<(String, Box<dyn Module>)>,
    training: bool,
    hooks: ForwardHooks,
}

impl Sequential {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            training: true,
            hooks: ForwardHooks::new(),
        }
    }

    /// Adds a module named after its position.
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        self.push(module);
        self
    }

    /// Adds a module with a specific name.
    pub fn add_named<M: Module + 'static>(mut self, name: impl Into<String>, module: M) -> Self {
        self.push_named(name, module);
        self
    }

    /// Appends a module in place, named after its position.
    pub fn push<M: Module + 'static>(&mut self, module: M) {
        let name = self.modules.len().to_string();
        self.modules.push((name, Box::new(module)));
    }

    /// Appends a named module in place.
    pub fn push_named<M: Module + 'static>(&mut self, name: impl Into<String>, module: M) {
        self.modules.push((name.into(), Box::new(module)));
    }

    /// Returns the number of children.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the container has no children.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over `(name, child)` pairs in execution order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Module)> {
        self.modules.iter().map(|(n, m)| (n.as_str(), m.as_ref()))
    }
}

impl Default for Sequential {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let mut x = input.clone();
        for (_, module) in &self.modules {
            x = module.call(&x)?;
        }
        Ok(x)
    }

    fn hooks(&self) -> &ForwardHooks {
        &self.hooks
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        self.modules
            .iter()
            .map(|(n, m)| (n.clone(), m.as_ref()))
            .collect()
    }

    fn to_device(&mut self, device: Device) -> Result<()> {
        for (_, module) in &mut self.modules {
            module.to_device(device)?;
        }
        Ok(())
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
        for (_, module) in &mut self.modules {
            module.set_training(training);
        }
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn name(&self) -> &'static str {
        "Sequential"
    }
}

// =============================================================================
// Tests
// =============================================================================
