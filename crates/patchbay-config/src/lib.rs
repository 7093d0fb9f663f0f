//! Engine configuration for patchbay.
//!
//! This crate loads the settings an embedder hands to the engine: whether an
//! audio backend can be acquired, the fallback log filter, and which built-in
//! module types to leave out of the registry.
//!
//! # Features
//!
//! - **TOML files**: Load and save [`EngineConfig`] with every field optional
//! - **Validation**: Reject blank filters and unknown disabled module types
//! - **Wiring helpers**: Build a [`ModuleContext`](patchbay_core::ModuleContext),
//!   a filtered [`ModuleRegistry`](patchbay_registry::ModuleRegistry) or a
//!   ready-to-use [`Rack`](patchbay_registry::Rack)
//!
//! # Example
//!
//! ```rust
//! use patchbay_config::EngineConfig;
//!
//! let config = EngineConfig::from_toml(r#"
//!     backend_available = false
//!     disabled_modules = ["probe"]
//! "#).unwrap();
//! config.validate().unwrap();
//!
//! let mut rack = config.rack();
//! assert!(rack.add("probe", "p", "Probe").is_err());
//! rack.add("constant", "c", "Constant").unwrap();
//! assert!(rack.coordinator().all_ready());
//! ```

mod engine;
mod error;

pub use engine::{DEFAULT_LOG_FILTER, EngineConfig};
pub use error::{ConfigError, IoAction};
