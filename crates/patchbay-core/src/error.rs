//! Error types for module and binding operations.

use thiserror::Error;

/// Errors raised by structural module operations.
///
/// Runtime lookups (reading or writing a parameter by a stale key) log and
/// no-op instead of returning these; binding calls return them because a bad
/// port key or type there is a caller bug.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModuleError {
    /// No port with this key exists on the module.
    #[error("port '{port}' not found on module '{module}'")]
    PortNotFound {
        /// Module that was searched.
        module: String,
        /// Requested port key.
        port: String,
    },

    /// No parameter with this key exists on the module.
    #[error("parameter '{param}' not found on module '{module}'")]
    ParameterNotFound {
        /// Module that was searched.
        module: String,
        /// Requested parameter key.
        param: String,
    },

    /// Two ends of a binding carry incompatible value kinds.
    #[error("type mismatch on {context}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Which binding was attempted, e.g. `osc.out -> vcf.cutoff`.
        context: String,
        /// Type the operation required.
        expected: String,
        /// Type actually present.
        found: String,
    },

    /// A value was rejected by a parameter's validation.
    #[error("invalid value for parameter '{param}': {reason}")]
    InvalidParameterValue {
        /// Parameter key.
        param: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The module has already been disposed.
    #[error("module '{0}' has been disposed")]
    AlreadyDisposed(String),
}

impl ModuleError {
    /// Create a port-not-found error.
    pub fn port_not_found(module: impl Into<String>, port: impl Into<String>) -> Self {
        ModuleError::PortNotFound {
            module: module.into(),
            port: port.into(),
        }
    }

    /// Create a parameter-not-found error.
    pub fn parameter_not_found(module: impl Into<String>, param: impl Into<String>) -> Self {
        ModuleError::ParameterNotFound {
            module: module.into(),
            param: param.into(),
        }
    }

    /// Create a type-mismatch error.
    pub fn type_mismatch(
        context: impl Into<String>,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        ModuleError::TypeMismatch {
            context: context.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Create an invalid-parameter-value error.
    pub fn invalid_value(param: impl Into<String>, reason: impl Into<String>) -> Self {
        ModuleError::InvalidParameterValue {
            param: param.into(),
            reason: reason.into(),
        }
    }
}
