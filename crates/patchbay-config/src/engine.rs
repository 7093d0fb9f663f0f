//! Engine configuration.

use std::path::Path;

use patchbay_core::{ModuleContext, ReadinessCoordinator};
use patchbay_registry::{ModuleRegistry, Rack};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, IoAction};

/// Default tracing filter when neither the environment nor the file sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Engine-wide settings, usually loaded from `patchbay.toml`.
///
/// Every field has a default, so an empty file is a valid configuration.
///
/// ```toml
/// backend_available = true
/// log_filter = "patchbay_core=debug,info"
/// disabled_modules = ["probe"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether an audio backend can be acquired. When `false`, async modules
    /// never register as pending and process no audio.
    pub backend_available: bool,

    /// Fallback `tracing` filter directive for the binary.
    pub log_filter: String,

    /// Built-in module types to leave out of the registry.
    pub disabled_modules: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_available: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            disabled_modules: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io(IoAction::Read, path, e))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load a configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::io(IoAction::CreateDir, parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(IoAction::Write, path, e))?;
        Ok(())
    }

    /// Convert the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check the configuration against the built-in registry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyLogFilter`] for a blank filter,
    /// [`ConfigError::UnknownModuleType`] for a disabled entry that names no
    /// built-in module.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        let builtins = ModuleRegistry::new();
        for module_type in &self.disabled_modules {
            if builtins.get(module_type).is_none() {
                return Err(ConfigError::UnknownModuleType(module_type.clone()));
            }
        }
        Ok(())
    }

    /// Returns `true` if `module_type` is disabled.
    pub fn is_disabled(&self, module_type: &str) -> bool {
        self.disabled_modules.iter().any(|m| m == module_type)
    }

    /// A fresh module context carrying this configuration's backend flag.
    pub fn module_context(&self) -> ModuleContext {
        ModuleContext::new(ReadinessCoordinator::new(), self.backend_available)
    }

    /// The built-in registry minus disabled module types.
    ///
    /// Unknown disabled entries are logged and skipped.
    pub fn registry(&self) -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        for module_type in &self.disabled_modules {
            if !registry.unregister(module_type) {
                tracing::warn!(module_type = %module_type, "disabled module type is not registered");
            }
        }
        registry
    }

    /// An empty rack built from [`registry()`](Self::registry) and
    /// [`module_context()`](Self::module_context).
    pub fn rack(&self) -> Rack {
        Rack::new(self.registry(), self.module_context())
    }
}
