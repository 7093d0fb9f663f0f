//! Criterion benchmarks for the patchbay binding engine.
//!
//! Measures propagation cost through module graphs, independent of any module
//! behavior. Three axes:
//!
//! - **Propagate**: one parameter write pushed through a NUMBER chain
//! - **Fan-in**: ARRAY re-aggregation with a varying number of producers
//! - **Rewire**: connect + disconnect of a single edge
//!
//! Run with: `cargo bench -p patchbay-core -- graph/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use patchbay_core::{BasicModule, ModuleCore, ModuleRef, ParameterSpec, PortType, into_ref};

const PRODUCER_COUNTS: &[usize] = &[1, 4, 16, 64];

// ---------------------------------------------------------------------------
// Graph constructors
// ---------------------------------------------------------------------------

fn thru(id: &str) -> ModuleRef {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "thru", "Thru")
            .with_parameter(ParameterSpec::unbounded("value", 0.0))
            .with_input("in", PortType::Number)
            .with_output("out", PortType::Number),
    ));
    module.core().bind_input_to_parameter("in", "value").unwrap();
    module.core().bind_parameter_to_output("value", "out").unwrap();
    module
}

/// Chain of `n` pass-through modules; returns them head first.
fn make_chain(n: usize) -> Vec<ModuleRef> {
    let modules: Vec<ModuleRef> = (0..n).map(|i| thru(&format!("m{i}"))).collect();
    for pair in modules.windows(2) {
        pair[0].core().connect_output("out", &pair[1], "in").unwrap();
    }
    modules
}

fn make_fan_in(producers: usize) -> (Vec<ModuleRef>, ModuleRef) {
    let sink = into_ref(BasicModule::new(
        ModuleCore::new("sink", "sink", "Sink").with_input("steps", PortType::Array),
    ));
    let sources: Vec<ModuleRef> = (0..producers)
        .map(|i| {
            let source = into_ref(BasicModule::new(
                ModuleCore::new(format!("p{i:03}"), "steps", "Steps")
                    .with_output("out", PortType::Array),
            ));
            source.core().set_output("out", vec![i as f64; 8]);
            source.core().connect_output("out", &sink, "steps").unwrap();
            source
        })
        .collect();
    (sources, sink)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/propagate");

    for &len in &[2usize, 8, 32] {
        let chain = make_chain(len);
        let head = chain[0].clone();
        let mut value = 0.0;
        group.bench_function(BenchmarkId::new("chain", len), |b| {
            b.iter(|| {
                value += 1.0;
                head.core().update_parameter("value", black_box(value));
            });
        });
    }

    group.finish();
}

fn bench_fan_in(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/fan_in");

    for &producers in PRODUCER_COUNTS {
        let (sources, sink) = make_fan_in(producers);
        let last = sources[sources.len() - 1].clone();
        group.bench_with_input(
            BenchmarkId::new("array_update", producers),
            &producers,
            |b, _| {
                b.iter(|| {
                    last.core().set_output("out", black_box(vec![1.0; 8]));
                    black_box(sink.core().input("steps").map(|p| p.value()));
                });
            },
        );
    }

    group.finish();
}

fn bench_rewire(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/rewire");
    let chain = make_chain(2);
    let (src, dst) = (chain[0].clone(), chain[1].clone());
    src.core().disconnect_output("out", &dst, "in");

    group.bench_function("connect_disconnect", |b| {
        b.iter(|| {
            src.core().connect_output("out", &dst, "in").unwrap();
            black_box(src.core().disconnect_output("out", &dst, "in"));
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

criterion_group!(benches, bench_propagate, bench_fan_in, bench_rewire);
criterion_main!(benches);
