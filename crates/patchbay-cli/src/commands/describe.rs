//! Module schema command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use patchbay_config::EngineConfig;
use patchbay_core::{
    Module, ModuleContext, ModuleCore, ParamValue, ParameterSpec, Port, ReadinessCoordinator,
};
use serde_json::{Value, json};

#[derive(Args)]
pub struct DescribeArgs {
    /// Module type to describe
    #[arg(value_name = "TYPE")]
    module_type: String,

    /// Print the schema as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(config: &EngineConfig, args: DescribeArgs) -> anyhow::Result<()> {
    let registry = config.registry();
    let descriptor = registry
        .get(&args.module_type)
        .ok_or_else(|| anyhow::anyhow!("Unknown module type: {}", args.module_type))?;

    // A throwaway instance without a backend, so nothing registers as pending.
    let context = ModuleContext::new(ReadinessCoordinator::new(), false);
    let module = registry.create(descriptor.module_type, "describe", descriptor.name, &context)?;

    if args.json {
        let schema = json!({
            "type": descriptor.module_type,
            "name": descriptor.name,
            "description": descriptor.description,
            "category": descriptor.category.name(),
            "parameters": module.core().parameters().iter().map(|p| spec_json(p.spec())).collect::<Vec<_>>(),
            "inputs": module.core().inputs().iter().map(port_json).collect::<Vec<_>>(),
            "outputs": module.core().outputs().iter().map(port_json).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        print_schema(descriptor.name, descriptor.description, module.core());
    }

    module.dispose();
    Ok(())
}

fn print_schema(name: &str, description: &str, core: &ModuleCore) {
    println!("{name}");
    println!("{}", "=".repeat(name.len()));
    println!();
    println!("{description}");
    println!();

    println!("Parameters:");
    println!();
    println!("  {:10}  {:8}  {:10}  {}", "Name", "Type", "Default", "Range");
    println!("  {:10}  {:8}  {:10}  {}", "----", "----", "-------", "-----");
    for param in core.parameters() {
        let spec = param.spec();
        println!(
            "  {:10}  {:8}  {:10}  {}",
            spec.id,
            spec.param_type.name(),
            spec.default.to_string(),
            range_text(spec)
        );
    }
    if core.parameters().is_empty() {
        println!("  (none)");
    }

    println!();
    println!("Ports:");
    println!();
    for port in core.inputs().iter().chain(core.outputs()) {
        println!(
            "  {:10}  {:6}  {}",
            port.id(),
            port.direction().name(),
            port.port_type().name()
        );
    }
}

fn range_text(spec: &ParameterSpec) -> String {
    if !spec.options.is_empty() {
        return spec.options.join(" | ");
    }
    match (spec.min, spec.max) {
        (Some(min), Some(max)) => format!("{min} to {max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "-".to_string(),
    }
}

fn spec_json(spec: &ParameterSpec) -> Value {
    let default = match &spec.default {
        ParamValue::Number(n) => json!(n),
        ParamValue::Bool(b) => json!(b),
        ParamValue::Text(s) => json!(s),
    };
    json!({
        "id": spec.id,
        "type": spec.param_type.name(),
        "default": default,
        "min": spec.min,
        "max": spec.max,
        "step": spec.step,
        "options": spec.options,
    })
}

fn port_json(port: &Port) -> Value {
    json!({
        "id": port.id(),
        "type": port.port_type().name(),
    })
}
