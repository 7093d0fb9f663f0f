//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// File operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoAction {
    /// Reading the config file
    Read,
    /// Writing the config file
    Write,
    /// Creating the config file's parent directory
    CreateDir,
}

impl std::fmt::Display for IoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IoAction::Read => "read",
            IoAction::Write => "write",
            IoAction::CreateDir => "create directory",
        })
    }
}

/// Errors from loading, saving or checking an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Filesystem access failed
    #[error("cannot {action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        action: IoAction,
        /// Path involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid config TOML
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("cannot render config as TOML: {0}")]
    Render(#[from] toml::ser::Error),

    /// A disabled module entry names a type the registry does not know
    #[error("unknown module type in disabled_modules: {0}")]
    UnknownModuleType(String),

    /// The log filter is empty
    #[error("log_filter must not be empty")]
    EmptyLogFilter,
}

impl ConfigError {
    /// Wraps an I/O failure for `path`.
    pub fn io(action: IoAction, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}
