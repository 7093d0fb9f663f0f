//! The `probe` module: an audio sink that records what reaches its backend.
//!
//! A probe stands in for any module whose AUDIO processing needs a backend
//! resource that is acquired asynchronously. Input that arrives before
//! [`Module::complete_setup`] is queued and replayed in order afterwards.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use patchbay_core::{
    AsyncBackend, AudioCapable, AudioHandle, BackendState, BindingKey, Module, ModuleContext,
    ModuleCore, ModuleError, ModuleRef, ParamValue, ParameterSpec, PendingAudio, PortType,
    PortValue, SourceRef, attach,
};

/// Backend resource owned by a [`Probe`] once setup completes.
#[derive(Debug, Default)]
pub struct ProbeBackend {
    received: RefCell<Vec<PendingAudio>>,
}

impl ProbeBackend {
    /// Every input delivered so far, in delivery order.
    pub fn received(&self) -> Vec<PendingAudio> {
        self.received.borrow().clone()
    }
}

/// Audio sink with an asynchronously acquired backend.
///
/// Ports: AUDIO input `in`, NUMBER output `received` (number of inputs the
/// backend has processed). Parameters: BOOLEAN `enabled`.
pub struct Probe {
    core: ModuleCore,
    backend: AsyncBackend<ProbeBackend>,
    /// Live producers by binding key.
    sources: RefCell<BTreeMap<BindingKey, AudioHandle>>,
    delivered: Rc<Cell<usize>>,
}

impl Probe {
    /// Creates an attached probe.
    pub fn new(id: &str, name: &str, context: &ModuleContext) -> Rc<Self> {
        attach(Self {
            core: ModuleCore::new(id, "probe", name)
                .with_parameter(ParameterSpec::boolean("enabled", true))
                .with_input("in", PortType::Audio)
                .with_output("received", PortType::Number),
            backend: AsyncBackend::new(id, context),
            sources: RefCell::new(BTreeMap::new()),
            delivered: Rc::new(Cell::new(0)),
        })
    }

    /// The readiness slot.
    pub fn backend(&self) -> &AsyncBackend<ProbeBackend> {
        &self.backend
    }

    /// Binding keys of producers currently mixed into `in`.
    pub fn live_sources(&self) -> Vec<String> {
        self.sources
            .borrow()
            .keys()
            .map(|key| key.label().to_string())
            .collect()
    }

    fn deliver(&self) -> impl FnMut(&ProbeBackend, PendingAudio) + 'static {
        let delivered = Rc::clone(&self.delivered);
        let output = self.core.output("received").cloned();
        move |backend, input| {
            backend.received.borrow_mut().push(input);
            delivered.set(delivered.get() + 1);
            if let Some(output) = &output {
                output.set(PortValue::Number(delivered.get() as f64));
            }
        }
    }
}

impl AudioCapable for Probe {
    fn handle_audio_input(&self, port: &str, handle: &AudioHandle, source: &SourceRef) {
        self.core.write_input(port, handle.clone());
        self.sources.borrow_mut().insert(
            BindingKey::new(PortType::Audio, port, source),
            handle.clone(),
        );
        if !self.is_enabled() {
            tracing::trace!(module = self.core.id(), port, "probe: disabled, not forwarding");
            return;
        }
        self.backend.submit(
            PendingAudio {
                port: port.to_string(),
                handle: handle.clone(),
                source: source.clone(),
            },
            self.deliver(),
        );
    }

    fn handle_audio_disconnect(&self, port: &str, source: &SourceRef) {
        self.sources
            .borrow_mut()
            .remove(&BindingKey::new(PortType::Audio, port, source));
    }

    fn is_enabled(&self) -> bool {
        self.core
            .get_parameter_value("enabled")
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }

    fn set_enabled(&self, enabled: bool) {
        self.core.update_parameter("enabled", ParamValue::Bool(enabled));
    }
}

impl Module for Probe {
    fn core(&self) -> &ModuleCore {
        &self.core
    }

    fn as_audio(&self) -> Option<&dyn AudioCapable> {
        Some(self)
    }

    fn release_backend(&self) {
        self.backend.release();
        self.sources.borrow_mut().clear();
    }

    fn complete_setup(&self) -> bool {
        if self.backend.state() != BackendState::Pending {
            return false;
        }
        self.backend
            .complete_setup(ProbeBackend::default(), self.deliver());
        true
    }
}

/// Registry factory for `probe`.
pub fn probe(id: &str, name: &str, context: &ModuleContext) -> Result<ModuleRef, ModuleError> {
    Ok(Probe::new(id, name, context))
}
