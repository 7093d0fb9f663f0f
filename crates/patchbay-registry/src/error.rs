//! Error types for registry and rack operations.

use patchbay_core::ModuleError;
use thiserror::Error;

/// Errors that can occur when creating or wiring modules by id.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// No factory is registered under this module type
    #[error("unknown module type: {0}")]
    UnknownModuleType(String),

    /// A factory is already registered under this module type
    #[error("module type already registered: {0}")]
    DuplicateModuleType(String),

    /// A module with this id already exists in the rack
    #[error("module id already in use: {0}")]
    DuplicateModuleId(String),

    /// No module with this id exists in the rack
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// A binding operation failed
    #[error(transparent)]
    Module(#[from] ModuleError),
}
