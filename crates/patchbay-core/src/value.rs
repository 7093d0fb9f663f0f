//! Values carried by parameters and ports.
//!
//! Parameters hold a [`ParamValue`]; ports hold a [`PortValue`]. Audio ports
//! carry an [`AudioHandle`], an opaque reference to a backend node that the
//! graph forwards and mixes through module hooks but never inspects.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use crate::port::PortType;

/// Current value of a parameter.
///
/// LIST parameters store the selected option as [`ParamValue::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Numeric value (NUMBER parameters).
    Number(f64),
    /// Boolean value (BOOLEAN parameters).
    Bool(bool),
    /// Text value (LIST and STRING parameters).
    Text(String),
}

impl ParamValue {
    /// Returns the number, if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the text, if this is a `Text`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in log and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Bool(_) => "boolean",
            Self::Text(_) => "string",
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Opaque, reference-counted handle to an audio backend node.
///
/// Equality is identity: two handles are equal when they point at the same
/// node.
#[derive(Clone)]
pub struct AudioHandle(Rc<dyn Any>);

impl AudioHandle {
    /// Wraps a backend node.
    pub fn new<N: Any>(node: N) -> Self {
        Self(Rc::new(node))
    }

    /// Borrows the node as `N`, if that is its concrete type.
    pub fn downcast_ref<N: Any>(&self) -> Option<&N> {
        self.0.downcast_ref::<N>()
    }

    /// Returns `true` when both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for AudioHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AudioHandle({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// Current value of a port.
#[derive(Debug, Clone, PartialEq)]
pub enum PortValue {
    /// Scalar control value.
    Number(f64),
    /// Audio node handle; `None` is the empty handle.
    Audio(Option<AudioHandle>),
    /// Ordered collection, possibly aggregated from several producers.
    Array(Vec<f64>),
}

impl PortValue {
    /// The value a port of `port_type` holds when nothing drives it.
    pub fn neutral(port_type: PortType) -> Self {
        match port_type {
            PortType::Number => Self::Number(0.0),
            PortType::Audio => Self::Audio(None),
            PortType::Array => Self::Array(Vec::new()),
        }
    }

    /// The port type this value belongs to.
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Number(_) => PortType::Number,
            Self::Audio(_) => PortType::Audio,
            Self::Array(_) => PortType::Array,
        }
    }

    /// Returns the number, if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the handle, if this is a non-empty `Audio`.
    pub fn as_audio(&self) -> Option<&AudioHandle> {
        match self {
            Self::Audio(handle) => handle.as_ref(),
            _ => None,
        }
    }

    /// Returns the elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<f64> for PortValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<f64>> for PortValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Array(value)
    }
}

impl From<AudioHandle> for PortValue {
    fn from(value: AudioHandle) -> Self {
        Self::Audio(Some(value))
    }
}
