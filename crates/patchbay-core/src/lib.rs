//! Patchbay Core - reactive module graph for modular synthesis
//!
//! This crate provides the signal-routing engine of a node-based synthesizer:
//! modules expose typed parameters and ports, and callers wire outputs to inputs
//! at runtime while values keep flowing.
//!
//! # Core Abstractions
//!
//! ## Reactive Cells
//!
//! - [`ReactiveCell`] - Single-value broadcast with replay to new subscribers
//! - [`Subscription`] - RAII handle; dropping it unsubscribes
//!
//! ## Modules
//!
//! - [`Module`] - Object-safe trait every module implements
//! - [`ModuleCore`] - Schema, cells and binding bookkeeping shared by all modules
//! - [`Parameter`] / [`ParameterSpec`] - Typed, validated settings
//! - [`Port`] / [`PortType`] - NUMBER, AUDIO and ARRAY connection points
//!
//! ## Bindings
//!
//! - [`ModuleCore::connect_output`] / [`ModuleCore::disconnect_output`] - Typed edges between modules
//! - [`ArrayAggregator`] - Deterministic merge of several ARRAY producers
//! - [`AudioCapable`] - Hooks for modules that mix AUDIO inputs
//!
//! ## Readiness
//!
//! - [`ReadinessCoordinator`] - Barrier over modules whose backend is still initializing
//! - [`AsyncBackend`] - Per-module backend slot with a pending-input queue
//!
//! # Concurrency
//!
//! Everything is single-threaded. [`ReactiveCell::set`] runs every downstream
//! callback before returning, and callbacks may write to other cells
//! (including the one being set). Types are `!Send` by construction.
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::{BasicModule, ModuleCore, ParameterSpec, PortType, PortValue, into_ref};
//!
//! let lfo = into_ref(BasicModule::new(
//!     ModuleCore::new("lfo", "constant", "LFO")
//!         .with_parameter(ParameterSpec::number("rate", 2.0, 0.0, 20.0))
//!         .with_output("out", PortType::Number),
//! ));
//! lfo.core().bind_parameter_to_output("rate", "out").unwrap();
//!
//! let vcf = into_ref(BasicModule::new(
//!     ModuleCore::new("vcf", "filter", "Filter").with_input("cutoff", PortType::Number),
//! ));
//!
//! lfo.core().connect_output("out", &vcf, "cutoff").unwrap();
//! assert_eq!(vcf.core().input("cutoff").unwrap().value(), PortValue::Number(2.0));
//!
//! lfo.core().update_parameter("rate", 5.0);
//! assert_eq!(vcf.core().input("cutoff").unwrap().value(), PortValue::Number(5.0));
//! ```

pub mod aggregate;
pub mod audio;
pub mod binding;
pub mod cell;
pub mod error;
pub mod module;
pub mod param;
pub mod port;
pub mod readiness;
pub mod value;

// Re-export main types at crate root
pub use aggregate::ArrayAggregator;
pub use audio::AudioCapable;
pub use binding::{BindingKey, SourceRef, binding_key, single_binding_key};
pub use cell::{ReactiveCell, Subscription};
pub use error::ModuleError;
pub use module::{BasicModule, Module, ModuleCore, ModuleRef, attach, into_ref};
pub use param::{Parameter, ParameterSpec, ParameterType};
pub use port::{Port, PortDirection, PortType};
pub use readiness::{
    AsyncBackend, BackendState, ModuleContext, PendingAudio, ReadinessCoordinator,
};
pub use value::{AudioHandle, ParamValue, PortValue};
