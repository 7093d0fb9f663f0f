//! Integration tests for patchbay-core.
//!
//! Exercises the binding protocol across several modules: typed connect and
//! disconnect, single-producer replacement on NUMBER inputs, ARRAY aggregation,
//! AUDIO hook routing, the readiness queue, and the dispose cascade.

use std::cell::RefCell;
use std::rc::Rc;

use patchbay_core::{
    AsyncBackend, AudioCapable, AudioHandle, BasicModule, Module, ModuleContext, ModuleCore,
    ModuleError, ModuleRef, ParamValue, ParameterSpec, PendingAudio, PortType, PortValue,
    SourceRef, attach, into_ref,
};

// ============================================================================
// Helpers
// ============================================================================

/// NUMBER source with a `value` parameter republished on `out`.
fn number_source(id: &str, value: f64) -> ModuleRef {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "constant", "Constant")
            .with_parameter(ParameterSpec::unbounded("value", value))
            .with_output("out", PortType::Number),
    ));
    module.core().bind_parameter_to_output("value", "out").unwrap();
    module
}

/// ARRAY source whose output is written directly.
fn array_source(id: &str, items: Vec<f64>) -> ModuleRef {
    let module = into_ref(BasicModule::new(
        ModuleCore::new(id, "steps", "Steps").with_output("out", PortType::Array),
    ));
    module.core().set_output("out", items);
    module
}

/// AUDIO source whose output is written directly.
fn audio_source(id: &str) -> ModuleRef {
    into_ref(BasicModule::new(
        ModuleCore::new(id, "osc", "Oscillator").with_output("out", PortType::Audio),
    ))
}

fn sink(id: &str) -> ModuleRef {
    into_ref(BasicModule::new(
        ModuleCore::new(id, "sink", "Sink")
            .with_input("level", PortType::Number)
            .with_input("steps", PortType::Array)
            .with_input("in", PortType::Audio),
    ))
}

fn input_value(module: &ModuleRef, port: &str) -> PortValue {
    module.core().input(port).unwrap().value()
}

fn binding_labels(module: &ModuleRef, port: &str) -> Vec<String> {
    module
        .core()
        .input_bindings(port)
        .iter()
        .map(|key| key.label().to_string())
        .collect()
}

/// Audio-capable mixer that records hook calls and forwards through an
/// `AsyncBackend`.
struct Mixer {
    core: ModuleCore,
    backend: AsyncBackend<RefCell<Vec<String>>>,
    events: RefCell<Vec<String>>,
}

impl Mixer {
    fn new(id: &str, context: &ModuleContext) -> Rc<Self> {
        attach(Self {
            core: ModuleCore::new(id, "mixer", "Mixer").with_input("in", PortType::Audio),
            backend: AsyncBackend::new(id, context),
            events: RefCell::new(Vec::new()),
        })
    }

    fn deliver(backend: &RefCell<Vec<String>>, input: PendingAudio) {
        let label = input.handle.downcast_ref::<&str>().copied().unwrap_or("?");
        backend.borrow_mut().push(format!("{}:{label}", input.source));
    }
}

impl AudioCapable for Mixer {
    fn handle_audio_input(&self, port: &str, handle: &AudioHandle, source: &SourceRef) {
        self.core.write_input(port, handle.clone());
        self.events.borrow_mut().push(format!("connect {source}"));
        self.backend.submit(
            PendingAudio {
                port: port.to_string(),
                handle: handle.clone(),
                source: source.clone(),
            },
            Self::deliver,
        );
    }

    fn handle_audio_disconnect(&self, _port: &str, source: &SourceRef) {
        self.events.borrow_mut().push(format!("disconnect {source}"));
    }
}

impl Module for Mixer {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn as_audio(&self) -> Option<&dyn AudioCapable> {
        Some(self)
    }

    fn release_backend(&self) {
        self.backend.release();
    }
}

// ============================================================================
// 1. Type safety and lookup errors
// ============================================================================

#[test]
fn mismatched_port_types_create_no_binding() {
    let src = number_source("lfo", 1.0);
    let dst = sink("vca");

    let err = src.core().connect_output("out", &dst, "steps").unwrap_err();
    assert!(matches!(err, ModuleError::TypeMismatch { .. }));
    assert!(dst.core().input_bindings("steps").is_empty());
    assert!(src.core().output_connections("out").is_empty());
    assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![]));
}

#[test]
fn unknown_ports_are_reported() {
    let src = number_source("lfo", 1.0);
    let dst = sink("vca");

    assert_eq!(
        src.core().connect_output("nope", &dst, "level"),
        Err(ModuleError::port_not_found("lfo", "nope"))
    );
    assert_eq!(
        src.core().connect_output("out", &dst, "nope"),
        Err(ModuleError::port_not_found("vca", "nope"))
    );
}

// ============================================================================
// 2. NUMBER inputs
// ============================================================================

#[test]
fn number_binding_republishes_source() {
    let src = number_source("lfo", 3.0);
    let dst = sink("vca");

    src.core().connect_output("out", &dst, "level").unwrap();
    assert_eq!(input_value(&dst, "level"), PortValue::Number(3.0));

    src.core().update_parameter("value", 7.5);
    assert_eq!(input_value(&dst, "level"), PortValue::Number(7.5));
    assert_eq!(
        src.core().output_connections("out"),
        vec![("vca".to_string(), "level".to_string())]
    );
    assert_eq!(binding_labels(&dst, "level"), vec!["input_level"]);
}

#[test]
fn second_number_source_replaces_first() {
    let a = number_source("a", 1.0);
    let b = number_source("b", 2.0);
    let dst = sink("vca");

    a.core().connect_output("out", &dst, "level").unwrap();
    b.core().connect_output("out", &dst, "level").unwrap();
    assert_eq!(input_value(&dst, "level"), PortValue::Number(2.0));

    // The replaced producer no longer reaches the input or lists the edge.
    a.core().update_parameter("value", 100.0);
    assert_eq!(input_value(&dst, "level"), PortValue::Number(2.0));
    assert!(a.core().output_connections("out").is_empty());
    assert_eq!(b.core().output_connections("out").len(), 1);
    assert_eq!(dst.core().input_bindings("level").len(), 1);
}

#[test]
fn number_unbind_resets_to_zero() {
    let src = number_source("lfo", 4.0);
    let dst = sink("vca");
    src.core().connect_output("out", &dst, "level").unwrap();

    assert!(src.core().disconnect_output("out", &dst, "level"));
    assert_eq!(input_value(&dst, "level"), PortValue::Number(0.0));
    assert!(src.core().output_connections("out").is_empty());

    src.core().update_parameter("value", 9.0);
    assert_eq!(input_value(&dst, "level"), PortValue::Number(0.0));

    // Unbinding again is not an error, just a no-op.
    assert!(!src.core().disconnect_output("out", &dst, "level"));
    assert!(!dst.core().unbind_input("level", None, None));
}

#[test]
fn number_unbind_with_non_matching_source_keeps_binding() {
    let src = number_source("lfo", 4.0);
    let dst = sink("vca");
    src.core().connect_output("out", &dst, "level").unwrap();

    assert!(!dst.core().unbind_input("level", Some("other"), None));
    assert_eq!(input_value(&dst, "level"), PortValue::Number(4.0));
    assert!(dst.core().unbind_input("level", Some("lfo"), Some("out")));
    assert_eq!(input_value(&dst, "level"), PortValue::Number(0.0));
}

#[test]
fn input_to_parameter_chain() {
    let src = number_source("lfo", 0.0);
    let osc = into_ref(BasicModule::new(
        ModuleCore::new("osc", "osc", "Oscillator")
            .with_parameter(ParameterSpec::list("wave", ["sine", "saw", "square"], 1))
            .with_input("wave_cv", PortType::Number),
    ));
    osc.core().bind_input_to_parameter("wave_cv", "wave").unwrap();
    assert_eq!(
        osc.core().get_parameter_value("wave"),
        Some(ParamValue::from("saw"))
    );

    src.core().connect_output("out", &osc, "wave_cv").unwrap();
    assert_eq!(
        osc.core().get_parameter_value("wave"),
        Some(ParamValue::from("sine"))
    );
    src.core().update_parameter("value", 0.99);
    assert_eq!(
        osc.core().get_parameter_value("wave"),
        Some(ParamValue::from("square"))
    );
}

// ============================================================================
// 3. ARRAY aggregation
// ============================================================================

#[test]
fn array_aggregate_independent_of_connection_order() {
    for reversed in [false, true] {
        let p1 = array_source("p1", vec![1.0, 2.0]);
        let p2 = array_source("p2", vec![3.0, 4.0]);
        let dst = sink("seq");

        if reversed {
            p2.core().connect_output("out", &dst, "steps").unwrap();
            p1.core().connect_output("out", &dst, "steps").unwrap();
        } else {
            p1.core().connect_output("out", &dst, "steps").unwrap();
            p2.core().connect_output("out", &dst, "steps").unwrap();
        }
        assert_eq!(
            input_value(&dst, "steps"),
            PortValue::Array(vec![1.0, 2.0, 3.0, 4.0])
        );
        assert_eq!(
            binding_labels(&dst, "steps"),
            vec!["input_steps_p1_out", "input_steps_p2_out"]
        );

        assert!(p1.core().disconnect_output("out", &dst, "steps"));
        assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![3.0, 4.0]));

        assert!(p2.core().disconnect_output("out", &dst, "steps"));
        assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![]));
    }
}

#[test]
fn array_update_replaces_only_that_contribution() {
    let p1 = array_source("p1", vec![1.0]);
    let p2 = array_source("p2", vec![2.0]);
    let dst = sink("seq");
    p1.core().connect_output("out", &dst, "steps").unwrap();
    p2.core().connect_output("out", &dst, "steps").unwrap();

    p2.core().set_output("out", vec![5.0, 6.0, 7.0]);
    assert_eq!(
        input_value(&dst, "steps"),
        PortValue::Array(vec![1.0, 5.0, 6.0, 7.0])
    );

    // Reconnecting the same producer refreshes, not duplicates.
    p1.core().connect_output("out", &dst, "steps").unwrap();
    assert_eq!(dst.core().input_bindings("steps").len(), 2);
    assert_eq!(p1.core().output_connections("out").len(), 1);
    assert_eq!(
        input_value(&dst, "steps"),
        PortValue::Array(vec![1.0, 5.0, 6.0, 7.0])
    );
}

#[test]
fn underscored_ids_with_equal_labels_both_contribute() {
    // `a_b.c` and `a.b_c` format to the same key string.
    let left = into_ref(BasicModule::new(
        ModuleCore::new("a_b", "steps", "Steps").with_output("c", PortType::Array),
    ));
    let right = into_ref(BasicModule::new(
        ModuleCore::new("a", "steps", "Steps").with_output("b_c", PortType::Array),
    ));
    left.core().set_output("c", vec![1.0]);
    right.core().set_output("b_c", vec![2.0]);
    let dst = sink("seq");

    left.core().connect_output("c", &dst, "steps").unwrap();
    right.core().connect_output("b_c", &dst, "steps").unwrap();

    // Equal labels are ordered by source module id: "a" < "a_b".
    assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![2.0, 1.0]));
    assert_eq!(
        binding_labels(&dst, "steps"),
        vec!["input_steps_a_b_c", "input_steps_a_b_c"]
    );
    assert_eq!(left.core().output_connections("c").len(), 1);
    assert_eq!(right.core().output_connections("b_c").len(), 1);

    assert!(left.core().disconnect_output("c", &dst, "steps"));
    assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![2.0]));
    assert_eq!(right.core().output_connections("b_c").len(), 1);
}

#[test]
fn dropped_targets_are_pruned_from_connection_list() {
    let src = array_source("p1", vec![1.0]);
    for round in 0..3 {
        let dst = sink(&format!("seq{round}"));
        src.core().connect_output("out", &dst, "steps").unwrap();
        // Dropped without dispose.
    }
    let kept = sink("kept");
    src.core().connect_output("out", &kept, "steps").unwrap();
    assert_eq!(
        src.core().output_connections("out"),
        vec![("kept".to_string(), "steps".to_string())]
    );
}

#[test]
fn array_unbind_all_clears() {
    let p1 = array_source("p1", vec![1.0]);
    let p2 = array_source("p2", vec![2.0]);
    let dst = sink("seq");
    p1.core().connect_output("out", &dst, "steps").unwrap();
    p2.core().connect_output("out", &dst, "steps").unwrap();

    assert!(dst.core().unbind_input("steps", None, None));
    assert_eq!(input_value(&dst, "steps"), PortValue::Array(vec![]));
    assert!(p1.core().output_connections("out").is_empty());
    assert!(p2.core().output_connections("out").is_empty());
}

// ============================================================================
// 4. AUDIO routing
// ============================================================================

#[test]
fn audio_without_hooks_overwrites_and_resets_when_last_source_leaves() {
    let a = audio_source("a");
    let b = audio_source("b");
    let dst = sink("out");
    let ha = AudioHandle::new("a");
    let hb = AudioHandle::new("b");
    a.core().set_output("out", ha.clone());
    b.core().set_output("out", hb.clone());

    a.core().connect_output("out", &dst, "in").unwrap();
    b.core().connect_output("out", &dst, "in").unwrap();
    assert_eq!(input_value(&dst, "in"), PortValue::Audio(Some(hb)));

    assert!(b.core().disconnect_output("out", &dst, "in"));
    // One producer remains, so the cell is not reset.
    assert!(input_value(&dst, "in").as_audio().is_some());
    assert!(a.core().disconnect_output("out", &dst, "in"));
    assert_eq!(input_value(&dst, "in"), PortValue::Audio(None));
}

#[test]
fn audio_hooks_receive_connect_and_disconnect() {
    let context = ModuleContext::default();
    let mixer = Mixer::new("mix", &context);
    let target: ModuleRef = mixer.clone();
    let osc1 = audio_source("osc1");
    let osc2 = audio_source("osc2");
    osc1.core().set_output("out", AudioHandle::new("one"));

    osc1.core().connect_output("out", &target, "in").unwrap();
    // osc2 has only the empty handle; it is bound but nothing is forwarded.
    osc2.core().connect_output("out", &target, "in").unwrap();
    assert_eq!(*mixer.events.borrow(), vec!["connect osc1.out"]);
    assert_eq!(mixer.core.input_bindings("in").len(), 2);

    assert!(target.core().unbind_input("in", None, None));
    assert_eq!(
        *mixer.events.borrow(),
        vec!["connect osc1.out", "disconnect osc1.out", "disconnect osc2.out"]
    );
    assert_eq!(input_value(&target, "in"), PortValue::Audio(None));
}

// ============================================================================
// 5. Readiness queue
// ============================================================================

#[test]
fn pending_audio_replays_in_arrival_order() {
    let context = ModuleContext::default();
    let mixer = Mixer::new("mix", &context);
    let target: ModuleRef = mixer.clone();
    let osc = audio_source("osc");
    osc.core().connect_output("out", &target, "in").unwrap();

    for label in ["v1", "v2", "v3"] {
        osc.core().set_output("out", AudioHandle::new(label));
    }
    assert_eq!(mixer.backend.pending_len(), 3);
    // Raw values still land in the input cell while pending.
    assert!(input_value(&target, "in").as_audio().is_some());

    let ready = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ready);
    context
        .coordinator()
        .when_all_ready(move || *flag.borrow_mut() = true);
    assert!(!*ready.borrow());

    mixer.backend.complete_setup(RefCell::new(Vec::new()), Mixer::deliver);
    assert!(*ready.borrow());
    assert_eq!(mixer.backend.pending_len(), 0);
    let backend = mixer.backend.backend().unwrap();
    assert_eq!(
        *backend.borrow(),
        vec!["osc.out:v1", "osc.out:v2", "osc.out:v3"]
    );
}

#[test]
fn disposing_pending_module_releases_barrier() {
    let context = ModuleContext::default();
    let a = Mixer::new("a", &context);
    let b = Mixer::new("b", &context);

    let ready = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&ready);
    context
        .coordinator()
        .when_all_ready(move || *flag.borrow_mut() = true);

    b.dispose();
    assert!(!*ready.borrow());
    a.backend.complete_setup(RefCell::new(Vec::new()), Mixer::deliver);
    assert!(*ready.borrow());
}

#[test]
fn no_backend_means_nothing_pending() {
    let context = ModuleContext::new(Default::default(), false);
    let mixer = Mixer::new("mix", &context);
    assert!(context.coordinator().all_ready());

    let target: ModuleRef = mixer.clone();
    let osc = audio_source("osc");
    osc.core().set_output("out", AudioHandle::new("x"));
    osc.core().connect_output("out", &target, "in").unwrap();
    assert_eq!(mixer.backend.pending_len(), 0);
    assert!(input_value(&target, "in").as_audio().is_some());
}

// ============================================================================
// 6. Dispose cascade
// ============================================================================

#[test]
fn dispose_unbinds_upstream_and_downstream() {
    let src = number_source("lfo", 2.0);
    let mid = into_ref(BasicModule::new(
        ModuleCore::new("mid", "thru", "Thru")
            .with_input("in", PortType::Number)
            .with_output("out", PortType::Number),
    ));
    let dst = sink("vca");

    src.core().connect_output("out", &mid, "in").unwrap();
    mid.core().set_output("out", 6.0);
    mid.core().connect_output("out", &dst, "level").unwrap();
    assert_eq!(input_value(&dst, "level"), PortValue::Number(6.0));

    mid.dispose();

    // Downstream input was reset, upstream record dropped.
    assert_eq!(input_value(&dst, "level"), PortValue::Number(0.0));
    assert!(dst.core().input_bindings("level").is_empty());
    assert!(src.core().output_connections("out").is_empty());

    // Cells are completed: subscribing neither fails nor delivers.
    let input = mid.core().input("in").unwrap();
    assert!(input.cell().is_completed());
    let sub = input.cell().subscribe(|_| panic!("delivered after dispose"));
    assert!(!sub.is_active());
    src.core().update_parameter("value", 11.0);

    assert_eq!(
        mid.core().connect_output("out", &dst, "level"),
        Err(ModuleError::AlreadyDisposed("mid".into()))
    );
    assert_eq!(
        src.core().connect_output("out", &mid, "in"),
        Err(ModuleError::AlreadyDisposed("mid".into()))
    );
    mid.dispose();
}

#[test]
fn dropping_target_does_not_keep_source_alive() {
    let src = number_source("lfo", 1.0);
    let dst = sink("vca");
    src.core().connect_output("out", &dst, "level").unwrap();
    let weak = Rc::downgrade(&dst);
    drop(dst);
    assert!(weak.upgrade().is_none());

    // The dangling record is skipped.
    assert_eq!(src.core().disconnect_all_outputs(), 0);
    src.core().update_parameter("value", 3.0);
}
