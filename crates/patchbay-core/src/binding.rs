//! Binding bookkeeping types.
//!
//! A binding is a directed edge from one module's output port into another
//! module's input port. It owns exactly one [`Subscription`] on the source
//! cell; dropping the binding cancels it.
//!
//! Bindings into NUMBER inputs are keyed by the input alone, so a second
//! producer replaces the first. AUDIO and ARRAY inputs key each binding by
//! input, source module and source port, which lets several producers coexist.
//!
//! The formatted key string is only the sort label. Ids may contain `_`, so
//! two sources can format to the same label; [`BindingKey`] carries the
//! source as well and breaks such ties by module id, then port.

use std::fmt;
use std::rc::Weak;

use crate::cell::Subscription;
use crate::module::Module;
use crate::port::PortType;

/// Binding key for `input` fed from `source_module.source_port`.
pub fn binding_key(input: &str, source_module: &str, source_port: &str) -> String {
    format!("input_{input}_{source_module}_{source_port}")
}

/// Binding key for the single producer of a NUMBER `input`.
pub fn single_binding_key(input: &str) -> String {
    format!("input_{input}")
}

/// Identity of a binding within one input.
///
/// Orders by the formatted label first, so iteration follows the
/// lexicographic key order, then by source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingKey {
    label: String,
    source: SourceRef,
}

impl BindingKey {
    /// Key for a binding into an input of `port_type` fed from `source`.
    pub fn new(port_type: PortType, input: &str, source: &SourceRef) -> Self {
        let label = match port_type {
            PortType::Number => single_binding_key(input),
            PortType::Audio | PortType::Array => {
                binding_key(input, &source.module, &source.port)
            }
        };
        Self {
            label,
            source: source.clone(),
        }
    }

    /// The formatted key string.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The producing end.
    pub fn source(&self) -> &SourceRef {
        &self.source
    }
}

/// A bare label with no source, for aggregating outside a module.
impl From<String> for BindingKey {
    fn from(label: String) -> Self {
        Self {
            label,
            source: SourceRef::new("", ""),
        }
    }
}

impl From<&str> for BindingKey {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Identifies the producing end of a binding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceRef {
    /// Source module id.
    pub module: String,
    /// Source output port key.
    pub port: String,
}

impl SourceRef {
    /// Creates a source reference.
    pub fn new(module: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            port: port.into(),
        }
    }

    /// Returns `true` if this source matches the optional filters.
    ///
    /// Omitted filters match anything.
    pub fn matches(&self, module: Option<&str>, port: Option<&str>) -> bool {
        module.is_none_or(|m| m == self.module) && port.is_none_or(|p| p == self.port)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.port)
    }
}

/// A live binding into one of a module's inputs.
pub(crate) struct Binding {
    pub source: SourceRef,
    /// Producing module, used to drop its connection record on teardown.
    pub source_module: Option<Weak<dyn Module>>,
    pub subscription: Subscription,
}

impl Binding {
    /// Cancels the subscription and removes the matching connection record on
    /// the source module, if it is still alive.
    pub fn release(mut self, target_id: &str, input: &str) {
        self.subscription.unsubscribe();
        if let Some(source) = self.source_module.as_ref().and_then(Weak::upgrade) {
            source
                .core()
                .forget_connection(&self.source.port, target_id, input);
        }
    }
}

/// One entry in an output port's connection list.
#[derive(Clone)]
pub(crate) struct OutputConnection {
    pub target: Weak<dyn Module>,
    pub target_id: String,
    pub input: String,
}
