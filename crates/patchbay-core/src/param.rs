//! Typed module parameters.
//!
//! A [`Parameter`] pairs a [`ParameterSpec`] (type, bounds, options) with a
//! [`ReactiveCell`] holding the current [`ParamValue`]. Every write goes through
//! [`Parameter::apply`], which validates and coerces before storing, so the
//! cell never holds a value its spec would reject.
//!
//! # Numeric conversion
//!
//! Parameters can drive NUMBER output ports and be driven by NUMBER input
//! ports. The mapping is:
//!
//! | type    | parameter → number                | number `v` → parameter |
//! |---------|-----------------------------------|------------------------|
//! | NUMBER  | value                             | `v` (then clamped)     |
//! | BOOLEAN | `true → 1`, `false → 0`           | `v >= 0.5`             |
//! | LIST    | `index / max(1, len - 1)`         | `options[floor(v * len)]` |
//! | STRING  | not convertible                   | not convertible        |

use std::fmt;

use crate::cell::ReactiveCell;
use crate::error::ModuleError;
use crate::value::ParamValue;

/// Value kind of a parameter. Drives validation on write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Real number, optionally bounded.
    Number,
    /// On/off flag.
    Boolean,
    /// One of a fixed set of string options.
    List,
    /// Free text.
    String,
}

impl ParameterType {
    /// Returns the lowercase name of the type.
    pub const fn name(&self) -> &'static str {
        match self {
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::List => "list",
            ParameterType::String => "string",
        }
    }

    /// Returns `true` if values of this type map to and from numbers.
    pub const fn is_numeric(&self) -> bool {
        !matches!(self, ParameterType::String)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declaration of a parameter: key, type, default and constraints.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSpec {
    /// Parameter key within the module.
    pub id: String,
    /// Value kind.
    pub param_type: ParameterType,
    /// Initial value.
    pub default: ParamValue,
    /// Lower bound (NUMBER only).
    pub min: Option<f64>,
    /// Upper bound (NUMBER only).
    pub max: Option<f64>,
    /// UI step hint (NUMBER only). Not enforced on write.
    pub step: Option<f64>,
    /// Allowed values (LIST only).
    pub options: Vec<String>,
}

impl ParameterSpec {
    /// Creates a bounded NUMBER parameter.
    ///
    /// Inverted bounds are swapped. A NaN bound is dropped, which leaves that
    /// side open.
    pub fn number(id: impl Into<String>, default: f64, min: f64, max: f64) -> Self {
        let (min, max) = match (min.is_nan(), max.is_nan()) {
            (false, false) => (Some(min.min(max)), Some(min.max(max))),
            (false, true) => (Some(min), None),
            (true, false) => (None, Some(max)),
            (true, true) => (None, None),
        };
        let mut spec = Self {
            id: id.into(),
            param_type: ParameterType::Number,
            default: ParamValue::Number(default),
            min,
            max,
            step: None,
            options: Vec::new(),
        };
        if let Some(n) = spec.clamp_to_bounds(default) {
            spec.default = ParamValue::Number(n);
        }
        spec
    }

    /// Creates an unbounded NUMBER parameter.
    pub fn unbounded(id: impl Into<String>, default: f64) -> Self {
        Self {
            id: id.into(),
            param_type: ParameterType::Number,
            default: ParamValue::Number(default),
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
        }
    }

    /// Creates a BOOLEAN parameter.
    pub fn boolean(id: impl Into<String>, default: bool) -> Self {
        Self {
            id: id.into(),
            param_type: ParameterType::Boolean,
            default: ParamValue::Bool(default),
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
        }
    }

    /// Creates a LIST parameter selecting `options[default_index]`.
    ///
    /// An out-of-range index falls back to the first option.
    pub fn list<S: Into<String>>(
        id: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        default_index: usize,
    ) -> Self {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let default = options
            .get(default_index)
            .or_else(|| options.first())
            .cloned()
            .unwrap_or_default();
        Self {
            id: id.into(),
            param_type: ParameterType::List,
            default: ParamValue::Text(default),
            min: None,
            max: None,
            step: None,
            options,
        }
    }

    /// Creates a STRING parameter.
    pub fn string(id: impl Into<String>, default: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            param_type: ParameterType::String,
            default: ParamValue::Text(default.into()),
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
        }
    }

    /// Sets the UI step hint.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Checks `value` against this spec and returns what should be stored.
    ///
    /// NUMBER values are clamped when both bounds are declared. NaN is
    /// rejected.
    pub fn validate(&self, value: ParamValue) -> Result<ParamValue, ModuleError> {
        match (self.param_type, value) {
            (ParameterType::Number, ParamValue::Number(n)) => {
                if n.is_nan() {
                    return Err(ModuleError::invalid_value(&self.id, "NaN is not a number"));
                }
                Ok(ParamValue::Number(self.clamp_to_bounds(n).unwrap_or(n)))
            }
            (ParameterType::Boolean, v @ ParamValue::Bool(_)) => Ok(v),
            (ParameterType::List, ParamValue::Text(s)) => {
                if self.options.iter().any(|o| *o == s) {
                    Ok(ParamValue::Text(s))
                } else {
                    Err(ModuleError::invalid_value(
                        &self.id,
                        format!("'{s}' is not one of {:?}", self.options),
                    ))
                }
            }
            (ParameterType::String, v @ ParamValue::Text(_)) => Ok(v),
            (expected, other) => Err(ModuleError::invalid_value(
                &self.id,
                format!("expected {expected}, got {}", other.kind()),
            )),
        }
    }

    /// Clamps `n` into the declared range when both bounds are usable.
    ///
    /// The fields are public, so bounds may be inverted or NaN here. Inverted
    /// bounds are read in order; a NaN bound disables clamping.
    fn clamp_to_bounds(&self, n: f64) -> Option<f64> {
        let (Some(a), Some(b)) = (self.min, self.max) else {
            return None;
        };
        if a.is_nan() || b.is_nan() {
            return None;
        }
        Some(n.max(a.min(b)).min(a.max(b)))
    }

    /// Index of `option` within the LIST options.
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    /// Converts a value of this parameter to a number.
    ///
    /// Returns `None` for STRING parameters and mismatched values.
    pub fn to_number(&self, value: &ParamValue) -> Option<f64> {
        match (self.param_type, value) {
            (ParameterType::Number, ParamValue::Number(n)) => Some(*n),
            (ParameterType::Boolean, ParamValue::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            (ParameterType::List, ParamValue::Text(s)) => {
                let index = self.option_index(s)?;
                let span = self.options.len().saturating_sub(1).max(1);
                Some(index as f64 / span as f64)
            }
            _ => None,
        }
    }

    /// Converts a number into a value of this parameter's type.
    ///
    /// LIST buckets are clamped to the option range, so `v >= 1.0` selects the
    /// last option. Returns `None` for STRING parameters, empty LISTs, and NaN.
    pub fn from_number(&self, v: f64) -> Option<ParamValue> {
        if v.is_nan() {
            return None;
        }
        match self.param_type {
            ParameterType::Number => Some(ParamValue::Number(v)),
            ParameterType::Boolean => Some(ParamValue::Bool(v >= 0.5)),
            ParameterType::List => {
                let len = self.options.len();
                if len == 0 {
                    return None;
                }
                let bucket = (v * len as f64).floor().clamp(0.0, (len - 1) as f64) as usize;
                Some(ParamValue::Text(self.options[bucket].clone()))
            }
            ParameterType::String => None,
        }
    }
}

/// A parameter instance: spec plus the cell holding its current value.
///
/// Cloning shares the cell.
#[derive(Clone, Debug)]
pub struct Parameter {
    spec: ParameterSpec,
    cell: ReactiveCell<ParamValue>,
}

impl Parameter {
    /// Creates a parameter initialised to the spec's default.
    pub fn new(spec: ParameterSpec) -> Self {
        let cell = ReactiveCell::new(spec.default.clone());
        Self { spec, cell }
    }

    /// Parameter key.
    pub fn id(&self) -> &str {
        &self.spec.id
    }

    /// Declared type.
    pub fn param_type(&self) -> ParameterType {
        self.spec.param_type
    }

    /// Full declaration.
    pub fn spec(&self) -> &ParameterSpec {
        &self.spec
    }

    /// The cell backing this parameter.
    pub fn cell(&self) -> &ReactiveCell<ParamValue> {
        &self.cell
    }

    /// Current value.
    pub fn value(&self) -> ParamValue {
        self.cell.get()
    }

    /// Current value converted to a number, if the type allows it.
    pub fn value_as_number(&self) -> Option<f64> {
        self.cell.with(|v| self.spec.to_number(v))
    }

    /// Validates `value` and stores the result.
    ///
    /// On error the previous value is left untouched.
    pub fn apply(&self, value: ParamValue) -> Result<(), ModuleError> {
        let value = self.spec.validate(value)?;
        self.cell.set(value);
        Ok(())
    }
}
