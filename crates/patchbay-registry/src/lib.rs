//! Module registry and factory for patchbay.
//!
//! This crate provides the runtime table that maps a module type to the factory
//! that builds it, plus the [`Rack`] container that owns live modules by id.
//! It enables dynamic module creation by name and provides metadata for
//! building editors.
//!
//! # Features
//!
//! - **Module Discovery**: List all registered module types with metadata
//! - **Factory Pattern**: Create modules by type at runtime
//! - **Category System**: Module types organized by role (source, routing, ...)
//! - **Rack**: Owns modules by id; wires, unwires and disposes them
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{Module, ModuleContext, PortValue};
//! use patchbay_registry::{ModuleCategory, ModuleRegistry, Rack};
//!
//! let registry = ModuleRegistry::new();
//!
//! // List all module types
//! for module in registry.all_modules() {
//!     println!("{}: {}", module.name, module.description);
//! }
//!
//! // Filter by category
//! for module in registry.modules_in_category(ModuleCategory::Source) {
//!     println!("Source: {}", module.name);
//! }
//!
//! // Build and wire a small patch
//! let mut rack = Rack::new(registry, ModuleContext::default());
//! rack.add("constant", "level", "Level").unwrap();
//! rack.add("toggle", "gate", "Gate").unwrap();
//! rack.connect("level", "out", "gate", "gate").unwrap();
//!
//! rack.get("level").unwrap().core().update_parameter("value", 1.0);
//! let out = rack.get("gate").unwrap().core().output("out").unwrap().value();
//! assert_eq!(out, PortValue::Number(1.0));
//! ```

pub mod builtin;
mod error;
pub mod probe;
mod rack;

pub use error::RegistryError;
pub use probe::{Probe, ProbeBackend};
pub use rack::Rack;

use patchbay_core::{ModuleContext, ModuleError, ModuleRef};

/// Category of module for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    /// Produces values (constants, oscillators, sequencers)
    Source,
    /// Converts or combines values (toggles, selectors, collectors)
    Utility,
    /// Consumes audio (mixers, outputs, meters)
    Sink,
}

impl ModuleCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Source",
            ModuleCategory::Utility => "Utility",
            ModuleCategory::Sink => "Sink",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Constants, oscillators, sequencers and other value producers",
            ModuleCategory::Utility => "Toggles, selectors, collectors and other converters",
            ModuleCategory::Sink => "Mixers, outputs and meters that consume audio",
        }
    }

    /// All categories, in display order.
    pub const ALL: [ModuleCategory; 3] = [
        ModuleCategory::Source,
        ModuleCategory::Utility,
        ModuleCategory::Sink,
    ];
}

/// Describes a module type in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    /// Factory key (lowercase, no spaces).
    pub module_type: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the module.
    pub description: &'static str,
    /// Category for organization.
    pub category: ModuleCategory,
}

/// Factory function type for creating modules.
///
/// Receives the new module's id, display name and the shared context.
pub type ModuleFactory = fn(&str, &str, &ModuleContext) -> Result<ModuleRef, ModuleError>;

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ModuleDescriptor,
    factory: ModuleFactory,
}

/// Registry of available module types.
///
/// Built-in utility modules are registered by [`new()`](Self::new); embedders
/// add their own with [`register()`](Self::register).
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a new registry with all built-in modules registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin_modules();
        registry
    }

    /// Create a registry with nothing registered.
    pub fn empty() -> Self {
        Self {
            entries: Vec::with_capacity(5),
        }
    }

    /// Register all built-in modules.
    fn register_builtin_modules(&mut self) {
        let builtins: [(ModuleDescriptor, ModuleFactory); 5] = [
            (
                ModuleDescriptor {
                    module_type: "constant",
                    name: "Constant",
                    description: "Publishes a fixed number on its output",
                    category: ModuleCategory::Source,
                },
                builtin::constant,
            ),
            (
                ModuleDescriptor {
                    module_type: "toggle",
                    name: "Toggle",
                    description: "On/off switch driven by a gate input",
                    category: ModuleCategory::Utility,
                },
                builtin::toggle,
            ),
            (
                ModuleDescriptor {
                    module_type: "selector",
                    name: "Selector",
                    description: "Picks one of a list of options from a control voltage",
                    category: ModuleCategory::Utility,
                },
                builtin::selector,
            ),
            (
                ModuleDescriptor {
                    module_type: "collect",
                    name: "Collect",
                    description: "Merges array producers and reports the element count",
                    category: ModuleCategory::Utility,
                },
                builtin::collect,
            ),
            (
                ModuleDescriptor {
                    module_type: "probe",
                    name: "Probe",
                    description: "Audio sink that records what reaches its backend",
                    category: ModuleCategory::Sink,
                },
                probe::probe,
            ),
        ];

        for (descriptor, factory) in builtins {
            if let Err(err) = self.register(descriptor, factory) {
                tracing::warn!(%err, "builtin registration skipped");
            }
        }
    }

    /// Register a module type.
    ///
    /// # Errors
    ///
    /// [`RegistryError::DuplicateModuleType`] if the type is already taken.
    pub fn register(
        &mut self,
        descriptor: ModuleDescriptor,
        factory: ModuleFactory,
    ) -> Result<(), RegistryError> {
        if self.get(descriptor.module_type).is_some() {
            return Err(RegistryError::DuplicateModuleType(
                descriptor.module_type.to_string(),
            ));
        }
        tracing::debug!("registry_add: {}", descriptor.module_type);
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
        Ok(())
    }

    /// Remove a module type. Returns whether it was registered.
    pub fn unregister(&mut self, module_type: &str) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.descriptor.module_type != module_type);
        before != self.entries.len()
    }

    /// Returns descriptors for all registered module types.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for module types in a specific category.
    pub fn modules_in_category(&self, category: ModuleCategory) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by module type.
    pub fn get(&self, module_type: &str) -> Option<&ModuleDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.module_type == module_type)
            .map(|e| &e.descriptor)
    }

    /// Create a module instance by type.
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownModuleType`] if nothing is registered under
    /// `module_type`; factory failures are passed through.
    pub fn create(
        &self,
        module_type: &str,
        id: &str,
        name: &str,
        context: &ModuleContext,
    ) -> Result<ModuleRef, RegistryError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.descriptor.module_type == module_type)
            .ok_or_else(|| RegistryError::UnknownModuleType(module_type.to_string()))?;
        Ok((entry.factory)(id, name, context)?)
    }

    /// Returns the number of registered module types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no module types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
