//! Modules and the binding protocol.
//!
//! A module is a [`ModuleCore`] (schema, cells, binding bookkeeping) wrapped by
//! a type implementing [`Module`]. The core does all of the generic work:
//! parameter validation, typed connect/disconnect between modules, ARRAY
//! aggregation and the dispose cascade. Concrete modules add behavior by
//! tracking internal subscriptions on the core and, for AUDIO sinks, by
//! implementing [`AudioCapable`].
//!
//! # Binding semantics by input type
//!
//! | input  | producers | on push                          | on unbind                    |
//! |--------|-----------|----------------------------------|------------------------------|
//! | NUMBER | one       | overwrite input cell             | reset to `0`                 |
//! | AUDIO  | many      | [`AudioCapable::handle_audio_input`], else overwrite | hook per binding; empty handle when none remain |
//! | ARRAY  | many      | re-aggregate and publish         | re-aggregate; `[]` when none remain |
//!
//! # Ownership
//!
//! Bindings live on the *target* module: each owns the subscription on the
//! source output cell. The source keeps only weak connection records, so
//! dropping either side never keeps the other alive.

use std::cell::{Cell, OnceCell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::aggregate::ArrayAggregator;
use crate::audio::AudioCapable;
use crate::binding::{Binding, BindingKey, OutputConnection, SourceRef};
use crate::cell::Subscription;
use crate::error::ModuleError;
use crate::param::{Parameter, ParameterSpec};
use crate::port::{Port, PortType};
use crate::value::{ParamValue, PortValue};

/// A node in the patch graph.
///
/// Implementors only need to expose their [`ModuleCore`]. Audio sinks override
/// [`as_audio()`](Self::as_audio); modules holding a backend resource override
/// [`release_backend()`](Self::release_backend).
pub trait Module {
    /// Shared schema and binding state.
    fn core(&self) -> &ModuleCore;

    /// Audio hooks, if this module mixes AUDIO inputs itself.
    fn as_audio(&self) -> Option<&dyn AudioCapable> {
        None
    }

    /// Hands back any backend resource. Called by [`dispose()`](Self::dispose)
    /// after bindings are torn down and before cells are completed.
    fn release_backend(&self) {}

    /// Finishes asynchronous backend setup once the environment has acquired
    /// the resource. Returns `true` if this call completed a pending setup.
    fn complete_setup(&self) -> bool {
        false
    }

    /// Tears the module down. Terminal; a second call is a no-op.
    fn dispose(&self) {
        self.core().dispose_with(|| self.release_backend());
    }

    /// Module id.
    fn id(&self) -> &str {
        self.core().id()
    }
}

/// Shared handle to a live module.
pub type ModuleRef = Rc<dyn Module>;

/// Moves `module` into an `Rc` and records the weak self-reference the core
/// needs to route AUDIO pushes through [`Module::as_audio`].
///
/// Modules that are never attached still work, but AUDIO inputs fall back to
/// plain overwrite and sources keep no connection records for them.
pub fn attach<M: Module + 'static>(module: M) -> Rc<M> {
    let module = Rc::new(module);
    let weak: Weak<dyn Module> = Rc::downgrade(&module) as Weak<dyn Module>;
    module.core().attach(weak);
    module
}

/// [`attach()`] returning a type-erased [`ModuleRef`].
pub fn into_ref<M: Module + 'static>(module: M) -> ModuleRef {
    attach(module)
}

/// A module with no behavior beyond its schema.
#[derive(Debug)]
pub struct BasicModule {
    core: ModuleCore,
}

impl BasicModule {
    /// Wraps `core`.
    pub fn new(core: ModuleCore) -> Self {
        Self { core }
    }
}

impl Module for BasicModule {
    fn core(&self) -> &ModuleCore {
        &self.core
    }
}

/// Schema, cells and binding state shared by every module.
pub struct ModuleCore {
    id: String,
    module_type: String,
    name: String,
    parameters: Vec<Parameter>,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    aggregators: HashMap<String, Rc<RefCell<ArrayAggregator>>>,
    /// input key → binding key → binding
    bindings: RefCell<HashMap<String, BTreeMap<BindingKey, Binding>>>,
    /// output key → targets bound from it; entries whose target was dropped
    /// are pruned on the next write to the list
    connections: RefCell<HashMap<String, Vec<OutputConnection>>>,
    internal: RefCell<Vec<Subscription>>,
    this: OnceCell<Weak<dyn Module>>,
    disposed: Cell<bool>,
}

impl ModuleCore {
    /// Creates an empty core. Add parameters and ports with the `with_*`
    /// builders before wrapping it in a module.
    pub fn new(
        id: impl Into<String>,
        module_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            module_type: module_type.into(),
            name: name.into(),
            parameters: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            aggregators: HashMap::new(),
            bindings: RefCell::new(HashMap::new()),
            connections: RefCell::new(HashMap::new()),
            internal: RefCell::new(Vec::new()),
            this: OnceCell::new(),
            disposed: Cell::new(false),
        }
    }

    /// Adds a parameter.
    pub fn with_parameter(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(Parameter::new(spec));
        self
    }

    /// Adds an input port.
    pub fn with_input(mut self, id: impl Into<String>, port_type: PortType) -> Self {
        let port = Port::input(id, port_type);
        if port_type == PortType::Array {
            self.aggregators.insert(
                port.id().to_string(),
                Rc::new(RefCell::new(ArrayAggregator::new())),
            );
        }
        self.inputs.push(port);
        self
    }

    /// Adds an output port.
    pub fn with_output(mut self, id: impl Into<String>, port_type: PortType) -> Self {
        self.outputs.push(Port::output(id, port_type));
        self
    }

    fn attach(&self, this: Weak<dyn Module>) {
        if self.this.set(this).is_err() {
            tracing::warn!(module = %self.id, "module attached twice");
        }
    }

    fn owner(&self) -> Option<ModuleRef> {
        self.this.get().and_then(Weak::upgrade)
    }

    // --- schema -----------------------------------------------------------

    /// Module id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Factory key this module was created from.
    pub fn module_type(&self) -> &str {
        &self.module_type
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All parameters, in declaration order.
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// All input ports, in declaration order.
    pub fn inputs(&self) -> &[Port] {
        &self.inputs
    }

    /// All output ports, in declaration order.
    pub fn outputs(&self) -> &[Port] {
        &self.outputs
    }

    /// Looks up a parameter by key.
    pub fn parameter(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id() == key)
    }

    /// Looks up an input port by key.
    pub fn input(&self, key: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id() == key)
    }

    /// Looks up an output port by key.
    pub fn output(&self, key: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.id() == key)
    }

    /// Returns `true` once [`dispose_with()`](Self::dispose_with) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn ensure_live(&self) -> Result<(), ModuleError> {
        if self.disposed.get() {
            Err(ModuleError::AlreadyDisposed(self.id.clone()))
        } else {
            Ok(())
        }
    }

    fn require_input(&self, key: &str) -> Result<&Port, ModuleError> {
        self.input(key)
            .ok_or_else(|| ModuleError::port_not_found(&self.id, key))
    }

    fn require_output(&self, key: &str) -> Result<&Port, ModuleError> {
        self.output(key)
            .ok_or_else(|| ModuleError::port_not_found(&self.id, key))
    }

    fn require_parameter(&self, key: &str) -> Result<&Parameter, ModuleError> {
        self.parameter(key)
            .ok_or_else(|| ModuleError::parameter_not_found(&self.id, key))
    }

    // --- parameters -------------------------------------------------------

    /// Current value of parameter `key`.
    ///
    /// Unknown keys log a warning and return `None`.
    pub fn get_parameter_value(&self, key: &str) -> Option<ParamValue> {
        match self.parameter(key) {
            Some(param) => Some(param.value()),
            None => {
                tracing::warn!(module = %self.id, param = key, "get_parameter_value: unknown parameter");
                None
            }
        }
    }

    /// Validates and stores a new parameter value.
    ///
    /// Never fails loudly: an unknown key or rejected value is logged and the
    /// previous value kept. Returns whether the value was stored.
    pub fn update_parameter(&self, key: &str, value: impl Into<ParamValue>) -> bool {
        if self.disposed.get() {
            tracing::debug!(module = %self.id, param = key, "update_parameter: module disposed");
            return false;
        }
        let Some(param) = self.parameter(key) else {
            tracing::warn!(module = %self.id, param = key, "update_parameter: unknown parameter");
            return false;
        };
        match param.apply(value.into()) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(module = %self.id, param = key, %err, "update_parameter: value discarded");
                false
            }
        }
    }

    /// Republishes parameter `param` as a number on NUMBER output `output`.
    ///
    /// The output is updated immediately and on every parameter change until
    /// the module is disposed.
    ///
    /// # Errors
    ///
    /// `ParameterNotFound` / `PortNotFound` for unknown keys, `TypeMismatch` if
    /// the output is not NUMBER or the parameter is a STRING.
    pub fn bind_parameter_to_output(&self, param: &str, output: &str) -> Result<(), ModuleError> {
        self.ensure_live()?;
        let parameter = self.require_parameter(param)?;
        let port = self.require_output(output)?;
        let context = format!("{}.{param} -> {output}", self.id);
        if port.port_type() != PortType::Number {
            tracing::warn!(module = %self.id, param, port = output, "bind_parameter_to_output: output is not numeric");
            return Err(ModuleError::type_mismatch(
                context,
                PortType::Number,
                port.port_type(),
            ));
        }
        if !parameter.param_type().is_numeric() {
            tracing::warn!(module = %self.id, param, port = output, "bind_parameter_to_output: parameter is not numeric");
            return Err(ModuleError::type_mismatch(
                context,
                "numeric parameter",
                parameter.param_type(),
            ));
        }

        let spec = parameter.spec().clone();
        let cell = port.cell().clone();
        let subscription = parameter.cell().subscribe(move |value| {
            if let Some(n) = spec.to_number(value) {
                cell.set(PortValue::Number(n));
            }
        });
        self.track(subscription);
        tracing::debug!("param_bind: {}.{param} → {output}", self.id);
        Ok(())
    }

    /// Drives parameter `param` from NUMBER input `input`.
    ///
    /// Only pushes made after the call are forwarded, so an unconnected input
    /// does not overwrite the parameter's default. Converted values go through
    /// normal validation; rejected ones are logged.
    ///
    /// # Errors
    ///
    /// `ParameterNotFound` / `PortNotFound` for unknown keys, `TypeMismatch` if
    /// the input is not NUMBER or the parameter is a STRING.
    pub fn bind_input_to_parameter(&self, input: &str, param: &str) -> Result<(), ModuleError> {
        self.ensure_live()?;
        let port = self.require_input(input)?;
        let parameter = self.require_parameter(param)?;
        let context = format!("{}.{input} -> {param}", self.id);
        if port.port_type() != PortType::Number {
            return Err(ModuleError::type_mismatch(
                context,
                PortType::Number,
                port.port_type(),
            ));
        }
        if !parameter.param_type().is_numeric() {
            return Err(ModuleError::type_mismatch(
                context,
                "numeric parameter",
                parameter.param_type(),
            ));
        }

        let target = parameter.clone();
        let module = self.id.clone();
        let primed = Cell::new(false);
        let subscription = port.cell().subscribe(move |value| {
            if !primed.replace(true) {
                return;
            }
            let Some(n) = value.as_number() else { return };
            let Some(converted) = target.spec().from_number(n) else {
                tracing::debug!(module = %module, param = target.id(), value = n, "input_to_param: not convertible");
                return;
            };
            if let Err(err) = target.apply(converted) {
                tracing::warn!(module = %module, param = target.id(), %err, "input_to_param: value discarded");
            }
        });
        self.track(subscription);
        tracing::debug!("param_bind: {}.{input} → {param}", self.id);
        Ok(())
    }

    // --- internal wiring --------------------------------------------------

    /// Keeps `subscription` alive until the module is disposed.
    pub fn track(&self, subscription: Subscription) {
        if self.disposed.get() {
            tracing::debug!(module = %self.id, "track: module disposed, dropping subscription");
            return;
        }
        self.internal.borrow_mut().push(subscription);
    }

    /// Writes `value` into input `port`.
    ///
    /// Used by audio hooks that still mirror raw values into their cells.
    /// Unknown ports and mismatched value kinds are logged and ignored.
    pub fn write_input(&self, port: &str, value: impl Into<PortValue>) -> bool {
        Self::write_port(&self.id, self.input(port), port, value.into())
    }

    /// Publishes `value` on output `port`.
    ///
    /// Unknown ports and mismatched value kinds are logged and ignored.
    pub fn set_output(&self, port: &str, value: impl Into<PortValue>) -> bool {
        Self::write_port(&self.id, self.output(port), port, value.into())
    }

    fn write_port(module: &str, port: Option<&Port>, key: &str, value: PortValue) -> bool {
        let Some(port) = port else {
            tracing::warn!(module, port = key, "write: unknown port");
            return false;
        };
        if port.port_type() != value.port_type() {
            tracing::warn!(
                module,
                port = key,
                expected = %port.port_type(),
                found = %value.port_type(),
                "write: value kind does not match port"
            );
            return false;
        }
        port.set(value);
        true
    }

    // --- binding manager --------------------------------------------------

    /// Binds `output` on this module to `input` on `target` and records the
    /// connection.
    ///
    /// # Errors
    ///
    /// `AlreadyDisposed` if either module is disposed, `PortNotFound` for an
    /// unknown key on either side, `TypeMismatch` if the port types differ. No
    /// binding is created on error.
    pub fn connect_output(
        &self,
        output: &str,
        target: &ModuleRef,
        input: &str,
    ) -> Result<(), ModuleError> {
        self.ensure_live()?;
        let source_port = self.require_output(output)?;
        let target_core = target.core();
        let target_port = target_core.require_input(input)?;
        if source_port.port_type() != target_port.port_type() {
            return Err(ModuleError::type_mismatch(
                format!("{}.{output} -> {}.{input}", self.id, target_core.id),
                target_port.port_type(),
                source_port.port_type(),
            ));
        }

        target_core.bind_input_to_output(input, self, output)?;

        let mut connections = self.connections.borrow_mut();
        let list = connections.entry(output.to_string()).or_default();
        list.retain(|c| c.target.strong_count() > 0);
        if !list
            .iter()
            .any(|c| c.target_id == target_core.id && c.input == input)
        {
            list.push(OutputConnection {
                target: Rc::downgrade(target),
                target_id: target_core.id.clone(),
                input: input.to_string(),
            });
        }
        Ok(())
    }

    /// Subscribes input `input` on this module to `source_port` on `source`.
    ///
    /// NUMBER inputs drop any existing binding first. AUDIO and ARRAY inputs
    /// keep other producers and replace only a binding from the same source
    /// port. The source's current value is delivered before this returns.
    ///
    /// Most callers want [`connect_output()`](Self::connect_output), which also
    /// records the connection on the source.
    ///
    /// # Errors
    ///
    /// `AlreadyDisposed`, `PortNotFound` or `TypeMismatch`, as for
    /// [`connect_output()`](Self::connect_output).
    pub fn bind_input_to_output(
        &self,
        input: &str,
        source: &ModuleCore,
        source_port: &str,
    ) -> Result<(), ModuleError> {
        self.ensure_live()?;
        source.ensure_live()?;
        let port = self.require_input(input)?;
        let output = source.require_output(source_port)?;
        let port_type = port.port_type();
        if output.port_type() != port_type {
            return Err(ModuleError::type_mismatch(
                format!("{}.{source_port} -> {}.{input}", source.id, self.id),
                port_type,
                output.port_type(),
            ));
        }

        let source_ref = SourceRef::new(source.id(), source_port);
        let key = BindingKey::new(port_type, input, &source_ref);

        let replaced: Vec<Binding> = {
            let mut bindings = self.bindings.borrow_mut();
            let entry = bindings.entry(input.to_string()).or_default();
            match port_type {
                PortType::Number => std::mem::take(entry).into_values().collect(),
                PortType::Audio | PortType::Array => entry.remove(&key).into_iter().collect(),
            }
        };
        for binding in replaced {
            tracing::debug!("graph_rebind: {} replaced on {}.{input}", binding.source, self.id);
            binding.release(&self.id, input);
        }

        let subscription = match port_type {
            PortType::Number => {
                let cell = port.cell().clone();
                output.cell().subscribe(move |value| cell.set(value.clone()))
            }
            PortType::Audio => {
                let cell = port.cell().clone();
                let this = self.this.get().cloned();
                let input = input.to_string();
                let source_ref = source_ref.clone();
                output.cell().subscribe(move |value| {
                    let PortValue::Audio(Some(handle)) = value else {
                        return;
                    };
                    let target = this.as_ref().and_then(Weak::upgrade);
                    match target.as_deref().and_then(|m| m.as_audio()) {
                        Some(audio) => audio.handle_audio_input(&input, handle, &source_ref),
                        None => cell.set(value.clone()),
                    }
                })
            }
            PortType::Array => {
                let Some(aggregator) = self.aggregators.get(input).cloned() else {
                    return Err(ModuleError::port_not_found(&self.id, input));
                };
                let cell = port.cell().clone();
                let key = key.clone();
                output.cell().subscribe(move |value| {
                    let items = value.as_array().map(<[f64]>::to_vec).unwrap_or_default();
                    let merged = {
                        let mut aggregator = aggregator.borrow_mut();
                        aggregator.contribute(key.clone(), items);
                        aggregator.aggregate()
                    };
                    cell.set(PortValue::Array(merged));
                })
            }
        };

        self.bindings
            .borrow_mut()
            .entry(input.to_string())
            .or_default()
            .insert(
                key,
                Binding {
                    source: source_ref,
                    source_module: source.this.get().cloned(),
                    subscription,
                },
            );
        tracing::debug!("graph_connect: {}.{source_port} → {}.{input}", source.id, self.id);
        Ok(())
    }

    /// Removes bindings into `input` that match the optional source filters.
    ///
    /// Omitted filters match every binding. Returns whether anything was
    /// unbound; unbinding an edge that does not exist is not an error.
    pub fn unbind_input(
        &self,
        input: &str,
        source_module: Option<&str>,
        source_port: Option<&str>,
    ) -> bool {
        let Some(port) = self.input(input) else {
            tracing::warn!(module = %self.id, port = input, "unbind_input: unknown port");
            return false;
        };

        let (removed, remaining) = {
            let mut bindings = self.bindings.borrow_mut();
            let Some(entry) = bindings.get_mut(input) else {
                return false;
            };
            let keys: Vec<BindingKey> = entry
                .iter()
                .filter(|(_, b)| b.source.matches(source_module, source_port))
                .map(|(k, _)| k.clone())
                .collect();
            let removed: Vec<(BindingKey, Binding)> = keys
                .into_iter()
                .filter_map(|k| entry.remove_entry(&k))
                .collect();
            (removed, entry.len())
        };
        if removed.is_empty() {
            tracing::debug!(module = %self.id, port = input, "unbind_input: no matching binding");
            return false;
        }

        let mut sources = Vec::with_capacity(removed.len());
        let mut keys = Vec::with_capacity(removed.len());
        for (key, binding) in removed {
            tracing::debug!("graph_disconnect: {} → {}.{input}", binding.source, self.id);
            sources.push(binding.source.clone());
            keys.push(key);
            binding.release(&self.id, input);
        }

        match port.port_type() {
            PortType::Number => port.reset(),
            PortType::Audio => {
                let owner = self.owner();
                if let Some(audio) = owner.as_deref().and_then(|m| m.as_audio()) {
                    for source in &sources {
                        audio.handle_audio_disconnect(input, source);
                    }
                }
                if remaining == 0 {
                    port.reset();
                }
            }
            PortType::Array => {
                let merged = self.aggregators.get(input).map(|aggregator| {
                    let mut aggregator = aggregator.borrow_mut();
                    for key in &keys {
                        aggregator.remove(key);
                    }
                    aggregator.aggregate()
                });
                port.set(PortValue::Array(merged.unwrap_or_default()));
            }
        }
        true
    }

    /// Removes the connection from `output` to `target.input` and unbinds the
    /// target side. Returns whether anything was removed.
    pub fn disconnect_output(&self, output: &str, target: &ModuleRef, input: &str) -> bool {
        let target_core = target.core();
        let recorded = self.forget_connection(output, &target_core.id, input);
        let unbound = target_core.unbind_input(input, Some(&self.id), Some(output));
        if !recorded && !unbound {
            tracing::debug!(
                module = %self.id,
                port = output,
                "disconnect_output: no connection to {}.{input}",
                target_core.id
            );
        }
        recorded || unbound
    }

    /// Disconnects every recorded downstream binding. Returns how many targets
    /// were unbound.
    pub fn disconnect_all_outputs(&self) -> usize {
        let connections = std::mem::take(&mut *self.connections.borrow_mut());
        let mut count = 0;
        for (output, list) in connections {
            for connection in list {
                let Some(target) = connection.target.upgrade() else {
                    continue;
                };
                if target
                    .core()
                    .unbind_input(&connection.input, Some(&self.id), Some(&output))
                {
                    count += 1;
                }
            }
        }
        count
    }

    /// Drops the record of `output → target_id.input`. Returns whether one
    /// existed.
    pub(crate) fn forget_connection(&self, output: &str, target_id: &str, input: &str) -> bool {
        let mut connections = self.connections.borrow_mut();
        let Some(list) = connections.get_mut(output) else {
            return false;
        };
        let is_match = |c: &OutputConnection| c.target_id == target_id && c.input == input;
        let removed = list.iter().any(is_match);
        list.retain(|c| c.target.strong_count() > 0 && !is_match(c));
        if list.is_empty() {
            connections.remove(output);
        }
        removed
    }

    // --- introspection ----------------------------------------------------

    /// Binding keys currently feeding `input`, in aggregation order.
    pub fn input_bindings(&self, input: &str) -> Vec<BindingKey> {
        self.bindings
            .borrow()
            .get(input)
            .map(|entry| entry.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// `(target id, input)` pairs currently bound from `output`.
    pub fn output_connections(&self, output: &str) -> Vec<(String, String)> {
        self.connections
            .borrow()
            .get(output)
            .map(|list| {
                list.iter()
                    .map(|c| (c.target_id.clone(), c.input.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // --- lifecycle --------------------------------------------------------

    /// Runs the dispose cascade, calling `release_backend` between binding
    /// teardown and cell completion.
    ///
    /// Downstream targets are unbound first so they reset their inputs. A
    /// second call is logged and ignored.
    pub fn dispose_with(&self, release_backend: impl FnOnce()) {
        if self.disposed.replace(true) {
            tracing::debug!(module = %self.id, "dispose: already disposed");
            return;
        }

        let downstream = self.disconnect_all_outputs();

        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        let mut upstream = 0;
        for (input, entry) in bindings {
            for binding in entry.into_values() {
                binding.release(&self.id, &input);
                upstream += 1;
            }
        }

        let internal = std::mem::take(&mut *self.internal.borrow_mut());
        let internal_count = internal.len();
        drop(internal);

        release_backend();

        for param in &self.parameters {
            param.cell().complete();
        }
        for port in self.inputs.iter().chain(&self.outputs) {
            port.cell().complete();
        }
        for aggregator in self.aggregators.values() {
            aggregator.borrow_mut().clear();
        }

        tracing::debug!(
            downstream,
            upstream,
            internal = internal_count,
            "module_dispose: {}",
            self.id
        );
    }
}

impl fmt::Debug for ModuleCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleCore")
            .field("id", &self.id)
            .field("module_type", &self.module_type)
            .field("parameters", &self.parameters.len())
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .field("disposed", &self.disposed.get())
            .finish_non_exhaustive()
    }
}
