//! Demo patch command.
//!
//! Wires a control chain, an array merge and an audio path through the
//! built-in modules, then walks a few values through it and tears it down.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use clap::Args;
use patchbay_config::EngineConfig;
use patchbay_core::{
    AudioHandle, BasicModule, Module, ModuleCore, ModuleRef, PortType, PortValue, into_ref,
};
use patchbay_registry::Rack;

#[derive(Args)]
pub struct DemoArgs {
    /// Control values to sweep through the selector (0 to 1)
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.0, 0.4, 1.0])]
    cv: Vec<f64>,

    /// Number of audio handles sent to the probe before its backend is ready
    #[arg(long, default_value = "2")]
    early_audio: usize,
}

pub fn run(config: &EngineConfig, args: DemoArgs) -> anyhow::Result<()> {
    let mut rack = config.rack();
    build(&mut rack)?;

    let ready = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ready);
    rack.when_ready(move || {
        tracing::info!("all modules ready");
        flag.set(true);
    });

    println!("Control chain: cv.out -> wave.cv, wave.out -> gate.gate");
    println!();
    for value in &args.cv {
        module(&rack, "cv")?.core().update_parameter("value", *value);
        let choice = module(&rack, "wave")?
            .core()
            .get_parameter_value("choice")
            .map(|v| v.to_string())
            .unwrap_or_default();
        println!(
            "  cv = {value:<5}  wave = {choice:<9}  gate = {}",
            show(&output(&rack, "gate", "out")?)
        );
    }

    println!();
    println!("Array merge: steps_b.out, steps_a.out -> merge.items");
    println!();
    println!(
        "  merge.out = {}  merge.count = {}",
        show(&output(&rack, "merge", "out")?),
        show(&output(&rack, "merge", "count")?)
    );
    rack.disconnect("steps_a", "out", "merge", "items")?;
    println!(
        "  after removing steps_a: merge.out = {}",
        show(&output(&rack, "merge", "out")?)
    );

    println!();
    println!("Audio path: osc.out -> probe.in");
    println!();
    let osc = module(&rack, "osc")?;
    for n in 0..args.early_audio {
        osc.core().set_output("out", AudioHandle::new(n));
    }
    println!(
        "  before setup: probe.received = {}  ready = {}",
        show(&output(&rack, "probe", "received")?),
        ready.get()
    );
    let completed = rack.complete_all_setup();
    println!(
        "  after setup ({completed} completed): probe.received = {}  ready = {}",
        show(&output(&rack, "probe", "received")?),
        ready.get()
    );
    osc.core().set_output("out", AudioHandle::new(args.early_audio));
    println!(
        "  live: probe.received = {}",
        show(&output(&rack, "probe", "received")?)
    );

    println!();
    rack.remove("cv")?;
    let wave_cv = module(&rack, "wave")?
        .core()
        .input("cv")
        .map(|p| p.value())
        .ok_or_else(|| anyhow::anyhow!("no input wave.cv"))?;
    println!("Removed cv: wave.cv = {}", show(&wave_cv));

    let count = rack.len();
    rack.clear();
    println!("Cleared {count} modules.");
    Ok(())
}

fn build(rack: &mut Rack) -> anyhow::Result<()> {
    rack.add("constant", "cv", "CV").context("adding cv")?;
    rack.add("selector", "wave", "Wave").context("adding wave")?;
    rack.add("toggle", "gate", "Gate").context("adding gate")?;
    rack.add("collect", "merge", "Merge").context("adding merge")?;
    rack.add("probe", "probe", "Probe").context("adding probe")?;

    for (id, steps) in [("steps_b", vec![3.0, 4.0]), ("steps_a", vec![1.0, 2.0])] {
        let source = into_ref(BasicModule::new(
            ModuleCore::new(id, "steps", id).with_output("out", PortType::Array),
        ));
        source.core().set_output("out", steps);
        rack.insert(source)?;
    }
    rack.insert(into_ref(BasicModule::new(
        ModuleCore::new("osc", "osc", "Osc").with_output("out", PortType::Audio),
    )))?;

    rack.connect("cv", "out", "wave", "cv")?;
    rack.connect("wave", "out", "gate", "gate")?;
    rack.connect("steps_b", "out", "merge", "items")?;
    rack.connect("steps_a", "out", "merge", "items")?;
    rack.connect("osc", "out", "probe", "in")?;
    Ok(())
}

fn module<'a>(rack: &'a Rack, id: &str) -> anyhow::Result<&'a ModuleRef> {
    rack.get(id)
        .ok_or_else(|| anyhow::anyhow!("module not in rack: {}", id))
}

fn output(rack: &Rack, id: &str, port: &str) -> anyhow::Result<PortValue> {
    module(rack, id)?
        .core()
        .output(port)
        .map(|p| p.value())
        .ok_or_else(|| anyhow::anyhow!("no output {}.{}", id, port))
}

fn show(value: &PortValue) -> String {
    match value {
        PortValue::Number(n) => n.to_string(),
        PortValue::Array(items) => format!("{items:?}"),
        PortValue::Audio(Some(_)) => "<audio>".to_string(),
        PortValue::Audio(None) => "<silent>".to_string(),
    }
}
