//! Built-in utility modules.
//!
//! None of these do any signal processing. They exist so a rack can be wired
//! and inspected without an audio backend, and they double as reference
//! implementations of the module contract.

use patchbay_core::{
    BasicModule, Module, ModuleContext, ModuleCore, ModuleError, ModuleRef, ParameterSpec,
    PortType, PortValue, into_ref,
};

/// Options offered by the `selector` module.
pub const SELECTOR_OPTIONS: [&str; 4] = ["sine", "triangle", "saw", "square"];

/// `constant`: publishes its `value` parameter on NUMBER output `out`.
pub fn constant(id: &str, name: &str, _context: &ModuleContext) -> Result<ModuleRef, ModuleError> {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "constant", name)
            .with_parameter(ParameterSpec::unbounded("value", 0.0))
            .with_output("out", PortType::Number),
    ));
    module.core().bind_parameter_to_output("value", "out")?;
    Ok(module)
}

/// `toggle`: BOOLEAN `on` parameter, driven by NUMBER input `gate` and
/// published as `0`/`1` on NUMBER output `out`.
pub fn toggle(id: &str, name: &str, _context: &ModuleContext) -> Result<ModuleRef, ModuleError> {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "toggle", name)
            .with_parameter(ParameterSpec::boolean("on", false))
            .with_input("gate", PortType::Number)
            .with_output("out", PortType::Number),
    ));
    module.core().bind_input_to_parameter("gate", "on")?;
    module.core().bind_parameter_to_output("on", "out")?;
    Ok(module)
}

/// `selector`: LIST `choice` parameter over [`SELECTOR_OPTIONS`], driven by
/// NUMBER input `cv` and published as its normalized index on `out`.
pub fn selector(id: &str, name: &str, _context: &ModuleContext) -> Result<ModuleRef, ModuleError> {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "selector", name)
            .with_parameter(ParameterSpec::list("choice", SELECTOR_OPTIONS, 0))
            .with_input("cv", PortType::Number)
            .with_output("out", PortType::Number),
    ));
    module.core().bind_input_to_parameter("cv", "choice")?;
    module.core().bind_parameter_to_output("choice", "out")?;
    Ok(module)
}

/// `collect`: forwards the aggregate on ARRAY input `items` to ARRAY output
/// `out` and its length to NUMBER output `count`.
pub fn collect(id: &str, name: &str, _context: &ModuleContext) -> Result<ModuleRef, ModuleError> {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "collect", name)
            .with_input("items", PortType::Array)
            .with_output("out", PortType::Array)
            .with_output("count", PortType::Number),
    ));

    let core = module.core();
    let missing = |port: &str| ModuleError::port_not_found(id, port);
    let input = core.input("items").ok_or_else(|| missing("items"))?;
    let out = core.output("out").ok_or_else(|| missing("out"))?.clone();
    let count = core.output("count").ok_or_else(|| missing("count"))?.clone();

    let subscription = input.cell().subscribe(move |value| {
        let len = value.as_array().map_or(0, <[f64]>::len);
        out.set(value.clone());
        count.set(PortValue::Number(len as f64));
    });
    core.track(subscription);
    Ok(module)
}
