//! Port definitions for patchbay modules.
//!
//! Ports are the named connection points through which values flow between
//! modules. The [`PortType`] decides how a binding into an input port behaves.

use std::fmt;

use crate::cell::ReactiveCell;
use crate::value::PortValue;

/// Value kind carried by a port.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortType {
    /// Scalar control value. Inputs accept a single producer.
    Number,
    /// Audio node handle. Inputs accept many producers, mixed by the module.
    Audio,
    /// Ordered collection. Inputs accept many producers, concatenated.
    Array,
}

impl PortType {
    /// Returns the lowercase name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            PortType::Number => "number",
            PortType::Audio => "audio",
            PortType::Array => "array",
        }
    }

    /// Returns `true` if an input of this type can hold several bindings.
    pub const fn is_multi_producer(&self) -> bool {
        matches!(self, PortType::Audio | PortType::Array)
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a port on a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Receives values from other modules.
    Input,
    /// Publishes values to other modules.
    Output,
}

impl PortDirection {
    /// Returns a human-readable name for the port direction.
    pub fn name(&self) -> &'static str {
        match self {
            PortDirection::Input => "Input",
            PortDirection::Output => "Output",
        }
    }
}

/// A typed port and the cell that holds its current value.
///
/// Cloning shares the cell.
#[derive(Clone, Debug)]
pub struct Port {
    id: String,
    direction: PortDirection,
    port_type: PortType,
    cell: ReactiveCell<PortValue>,
}

impl Port {
    /// Creates an input port holding the neutral value for `port_type`.
    pub fn input(id: impl Into<String>, port_type: PortType) -> Self {
        Self::new(id, PortDirection::Input, port_type)
    }

    /// Creates an output port holding the neutral value for `port_type`.
    pub fn output(id: impl Into<String>, port_type: PortType) -> Self {
        Self::new(id, PortDirection::Output, port_type)
    }

    fn new(id: impl Into<String>, direction: PortDirection, port_type: PortType) -> Self {
        Self {
            id: id.into(),
            direction,
            port_type,
            cell: ReactiveCell::new(PortValue::neutral(port_type)),
        }
    }

    /// Port key within its module.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this is an input or output.
    pub fn direction(&self) -> PortDirection {
        self.direction
    }

    /// The value kind this port carries.
    pub fn port_type(&self) -> PortType {
        self.port_type
    }

    /// The cell backing this port.
    pub fn cell(&self) -> &ReactiveCell<PortValue> {
        &self.cell
    }

    /// Current value.
    pub fn value(&self) -> PortValue {
        self.cell.get()
    }

    /// Writes `value` to the cell and notifies subscribers.
    pub fn set(&self, value: PortValue) {
        self.cell.set(value);
    }

    /// Writes the neutral value for this port's type.
    pub fn reset(&self) {
        self.cell.set(PortValue::neutral(self.port_type));
    }
}
