//! Rack: the set of live modules in one patch.

use std::collections::BTreeMap;

use patchbay_core::{ModuleContext, ModuleRef, ReadinessCoordinator};

use crate::{ModuleRegistry, RegistryError};

/// Owns live modules by id and routes wiring calls between them.
///
/// Every module in a rack shares the rack's [`ModuleContext`], so
/// [`when_ready()`](Self::when_ready) waits on all of them.
pub struct Rack {
    registry: ModuleRegistry,
    context: ModuleContext,
    modules: BTreeMap<String, ModuleRef>,
}

impl Rack {
    /// Creates an empty rack.
    pub fn new(registry: ModuleRegistry, context: ModuleContext) -> Self {
        Self {
            registry,
            context,
            modules: BTreeMap::new(),
        }
    }

    /// The registry modules are created from.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// The context handed to every factory.
    pub fn context(&self) -> &ModuleContext {
        &self.context
    }

    /// The shared readiness coordinator.
    pub fn coordinator(&self) -> &ReadinessCoordinator {
        self.context.coordinator()
    }

    /// Creates a module of `module_type` and adds it under `id`.
    ///
    /// # Errors
    ///
    /// `DuplicateModuleId` if `id` is taken, `UnknownModuleType` if the type
    /// is not registered.
    pub fn add(
        &mut self,
        module_type: &str,
        id: &str,
        name: &str,
    ) -> Result<ModuleRef, RegistryError> {
        if self.modules.contains_key(id) {
            return Err(RegistryError::DuplicateModuleId(id.to_string()));
        }
        let module = self.registry.create(module_type, id, name, &self.context)?;
        tracing::debug!("rack_add: {module_type} as {id}");
        self.modules.insert(id.to_string(), module.clone());
        Ok(module)
    }

    /// Adds a module built outside the registry.
    ///
    /// # Errors
    ///
    /// `DuplicateModuleId` if its id is taken.
    pub fn insert(&mut self, module: ModuleRef) -> Result<(), RegistryError> {
        let id = module.core().id().to_string();
        if self.modules.contains_key(&id) {
            return Err(RegistryError::DuplicateModuleId(id));
        }
        tracing::debug!("rack_add: {} as {id}", module.core().module_type());
        self.modules.insert(id, module);
        Ok(())
    }

    /// Looks up a module by id.
    pub fn get(&self, id: &str) -> Option<&ModuleRef> {
        self.modules.get(id)
    }

    fn require(&self, id: &str) -> Result<&ModuleRef, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::ModuleNotFound(id.to_string()))
    }

    /// Module ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if the rack holds no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Connects `source.output` to `target.input`.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` for an unknown id; binding errors are passed through.
    pub fn connect(
        &self,
        source: &str,
        output: &str,
        target: &str,
        input: &str,
    ) -> Result<(), RegistryError> {
        let source = self.require(source)?;
        let target = self.require(target)?;
        source.core().connect_output(output, target, input)?;
        Ok(())
    }

    /// Disconnects `source.output` from `target.input`. Returns whether an edge
    /// was removed.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` for an unknown id.
    pub fn disconnect(
        &self,
        source: &str,
        output: &str,
        target: &str,
        input: &str,
    ) -> Result<bool, RegistryError> {
        let source = self.require(source)?;
        let target = self.require(target)?;
        Ok(source.core().disconnect_output(output, target, input))
    }

    /// Disposes the module and drops it from the rack.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` for an unknown id.
    pub fn remove(&mut self, id: &str) -> Result<(), RegistryError> {
        let module = self
            .modules
            .remove(id)
            .ok_or_else(|| RegistryError::ModuleNotFound(id.to_string()))?;
        module.dispose();
        tracing::debug!("rack_remove: {id}");
        Ok(())
    }

    /// Resets readiness bookkeeping, then disposes every module.
    ///
    /// Pending `when_ready` callbacks are dropped without running; the
    /// teardown never releases the barrier.
    pub fn clear(&mut self) {
        self.context.coordinator().reset();
        let modules = std::mem::take(&mut self.modules);
        let count = modules.len();
        for module in modules.values() {
            module.dispose();
        }
        tracing::debug!("rack_clear: {count} modules disposed");
    }

    /// Completes pending backend setup on module `id`. Returns whether there
    /// was setup to complete.
    ///
    /// # Errors
    ///
    /// `ModuleNotFound` for an unknown id.
    pub fn complete_setup(&self, id: &str) -> Result<bool, RegistryError> {
        Ok(self.require(id)?.complete_setup())
    }

    /// Completes pending backend setup on every module. Returns how many
    /// modules completed.
    pub fn complete_all_setup(&self) -> usize {
        self.modules
            .values()
            .filter(|module| module.complete_setup())
            .count()
    }

    /// Runs `callback` once every pending module in the rack is ready.
    pub fn when_ready(&self, callback: impl FnOnce() + 'static) {
        self.context.coordinator().when_all_ready(callback);
    }
}

impl Drop for Rack {
    fn drop(&mut self) {
        if !self.modules.is_empty() {
            self.clear();
        }
    }
}

impl std::fmt::Debug for Rack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rack")
            .field("modules", &self.modules.keys().collect::<Vec<_>>())
            .field("coordinator", self.context.coordinator())
            .finish()
    }
}
