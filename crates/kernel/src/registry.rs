use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Module};

/// Module registry for managing module lifecycle
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module; modules initialize in registration order
    pub fn register(&mut self, module: Arc<dyn Module>) {
        self.modules.push(module);
    }

    /// Get all registered modules
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Initialize modules in registration order
    pub fn init_modules(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::debug!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::debug!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Initialize modules, run `body`, then stop modules whatever happened
    ///
    /// Stopping covers every registered module, even when initialization or
    /// `body` failed. The first failure is returned; `body`'s error wins over
    /// a stop error.
    pub fn run<T>(
        &self,
        ctx: &InitCtx<'_>,
        body: impl FnOnce() -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let outcome = self.init_modules(ctx).and_then(|()| body());
        let stopped = self.stop_modules();

        let value = outcome?;
        stopped?;
        Ok(value)
    }

    /// Stop modules in reverse registration order
    pub fn stop_modules(&self) -> anyhow::Result<()> {
        tracing::debug!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::debug!(module = module.name(), "stopping module");

            module
                .stop()
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
