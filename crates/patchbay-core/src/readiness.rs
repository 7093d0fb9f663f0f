//! Asynchronous backend readiness.
//!
//! Some modules cannot process AUDIO input until a heavyweight backend resource
//! has been acquired. [`ReadinessCoordinator`] tracks which modules are still
//! pending and runs barrier callbacks once none are. [`AsyncBackend`] is the
//! per-module slot: it queues inbound audio while setup is outstanding and
//! replays the queue, in arrival order, when the backend arrives.
//!
//! Setup completion is driven from outside: whoever acquires the backend calls
//! [`AsyncBackend::complete_setup`]. There is no timeout; a module whose setup
//! never completes stays pending.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::binding::SourceRef;
use crate::value::AudioHandle;

#[derive(Default)]
struct CoordinatorState {
    pending: BTreeSet<String>,
    initialized: BTreeSet<String>,
    waiters: Vec<Box<dyn FnOnce()>>,
}

/// Shared pending/initialized bookkeeping for a graph.
///
/// Cloning shares the state.
#[derive(Clone, Default)]
pub struct ReadinessCoordinator {
    state: Rc<RefCell<CoordinatorState>>,
}

impl ReadinessCoordinator {
    /// Creates a coordinator with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `module_id` as waiting for setup.
    pub fn register_pending(&self, module_id: &str) {
        let mut state = self.state.borrow_mut();
        state.initialized.remove(module_id);
        state.pending.insert(module_id.to_string());
        tracing::debug!(module = module_id, "readiness: registered pending");
    }

    /// Moves `module_id` from pending to initialized.
    ///
    /// Runs the barrier callbacks if this was the last pending module.
    pub fn mark_initialized(&self, module_id: &str) {
        {
            let mut state = self.state.borrow_mut();
            if !state.pending.remove(module_id) {
                tracing::debug!(module = module_id, "readiness: initialized without pending entry");
            }
            state.initialized.insert(module_id.to_string());
        }
        tracing::debug!(module = module_id, "readiness: initialized");
        self.fire_if_settled();
    }

    /// Forgets a module that will never initialize (disposed while pending).
    pub fn unregister(&self, module_id: &str) {
        let removed = {
            let mut state = self.state.borrow_mut();
            state.initialized.remove(module_id);
            state.pending.remove(module_id)
        };
        if removed {
            tracing::debug!(module = module_id, "readiness: unregistered pending module");
            self.fire_if_settled();
        }
    }

    /// Runs `callback` once every currently pending module has initialized.
    ///
    /// Runs it immediately if nothing is pending.
    pub fn when_all_ready(&self, callback: impl FnOnce() + 'static) {
        {
            let mut state = self.state.borrow_mut();
            if !state.pending.is_empty() {
                state.waiters.push(Box::new(callback));
                return;
            }
        }
        callback();
    }

    /// Returns `true` if `module_id` is waiting for setup.
    pub fn is_pending(&self, module_id: &str) -> bool {
        self.state.borrow().pending.contains(module_id)
    }

    /// Returns `true` if `module_id` has completed setup.
    pub fn is_initialized(&self, module_id: &str) -> bool {
        self.state.borrow().initialized.contains(module_id)
    }

    /// Number of modules still waiting for setup.
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Returns `true` when no module is pending.
    pub fn all_ready(&self) -> bool {
        self.state.borrow().pending.is_empty()
    }

    /// Clears all bookkeeping, including callbacks that have not fired.
    pub fn reset(&self) {
        let dropped = {
            let mut state = self.state.borrow_mut();
            state.pending.clear();
            state.initialized.clear();
            std::mem::take(&mut state.waiters).len()
        };
        tracing::debug!(dropped_waiters = dropped, "readiness: reset");
    }

    fn fire_if_settled(&self) {
        let waiters = {
            let mut state = self.state.borrow_mut();
            if !state.pending.is_empty() {
                return;
            }
            std::mem::take(&mut state.waiters)
        };
        if !waiters.is_empty() {
            tracing::debug!(count = waiters.len(), "readiness: barrier released");
        }
        for waiter in waiters {
            waiter();
        }
    }
}

impl fmt::Debug for ReadinessCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ReadinessCoordinator")
            .field("pending", &state.pending)
            .field("initialized", &state.initialized)
            .field("waiters", &state.waiters.len())
            .finish()
    }
}

/// Environment handed to module constructors.
///
/// Carries the graph's shared [`ReadinessCoordinator`] and whether an audio
/// backend exists at all. Without one, async modules skip setup entirely and
/// never register as pending.
#[derive(Debug, Clone)]
pub struct ModuleContext {
    coordinator: ReadinessCoordinator,
    backend_available: bool,
}

impl ModuleContext {
    /// Creates a context.
    pub fn new(coordinator: ReadinessCoordinator, backend_available: bool) -> Self {
        Self {
            coordinator,
            backend_available,
        }
    }

    /// The shared coordinator.
    pub fn coordinator(&self) -> &ReadinessCoordinator {
        &self.coordinator
    }

    /// Whether an audio backend can be acquired.
    pub fn backend_available(&self) -> bool {
        self.backend_available
    }
}

impl Default for ModuleContext {
    fn default() -> Self {
        Self::new(ReadinessCoordinator::new(), true)
    }
}

/// An AUDIO push that arrived while the backend was still pending.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAudio {
    /// Input port the value arrived on.
    pub port: String,
    /// The handle pushed by the producer.
    pub handle: AudioHandle,
    /// Producer of the value.
    pub source: SourceRef,
}

/// Lifecycle of an [`AsyncBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendState {
    /// No backend capability in this environment; input is never processed.
    Unavailable,
    /// Setup outstanding; input is queued.
    Pending,
    /// Backend acquired; input is delivered immediately.
    Ready,
    /// Backend handed back on dispose; input is dropped.
    Released,
}

enum Slot<B> {
    Unavailable,
    Pending,
    Ready(Rc<B>),
    Released,
}

impl<B> Slot<B> {
    fn state(&self) -> BackendState {
        match self {
            Slot::Unavailable => BackendState::Unavailable,
            Slot::Pending => BackendState::Pending,
            Slot::Ready(_) => BackendState::Ready,
            Slot::Released => BackendState::Released,
        }
    }
}

/// Per-module backend slot with a FIFO queue for input that arrives early.
pub struct AsyncBackend<B> {
    module_id: String,
    coordinator: ReadinessCoordinator,
    slot: RefCell<Slot<B>>,
    queue: RefCell<VecDeque<PendingAudio>>,
}

impl<B> AsyncBackend<B> {
    /// Creates the slot and, when the context has a backend, registers the
    /// module as pending.
    pub fn new(module_id: impl Into<String>, context: &ModuleContext) -> Self {
        let module_id = module_id.into();
        let slot = if context.backend_available() {
            context.coordinator().register_pending(&module_id);
            Slot::Pending
        } else {
            tracing::debug!(module = %module_id, "readiness: backend unavailable");
            Slot::Unavailable
        };
        Self {
            module_id,
            coordinator: context.coordinator().clone(),
            slot: RefCell::new(slot),
            queue: RefCell::new(VecDeque::new()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BackendState {
        self.slot.borrow().state()
    }

    /// Returns `true` once setup has completed and before release.
    pub fn is_ready(&self) -> bool {
        self.state() == BackendState::Ready
    }

    /// Number of queued inputs.
    pub fn pending_len(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Borrowed view of the backend, if ready.
    pub fn backend(&self) -> Option<Rc<B>> {
        match &*self.slot.borrow() {
            Slot::Ready(backend) => Some(Rc::clone(backend)),
            _ => None,
        }
    }

    /// Delivers `input` now if the backend is ready, queues it if setup is
    /// pending, and drops it otherwise.
    pub fn submit(&self, input: PendingAudio, deliver: impl FnOnce(&B, PendingAudio)) {
        let backend = match &*self.slot.borrow() {
            Slot::Ready(backend) => Some(Rc::clone(backend)),
            Slot::Pending => None,
            Slot::Unavailable | Slot::Released => {
                tracing::trace!(module = %self.module_id, port = %input.port, "readiness: input dropped, no backend");
                return;
            }
        };
        match backend {
            Some(backend) => deliver(&backend, input),
            None => {
                tracing::trace!(module = %self.module_id, port = %input.port, "readiness: input queued");
                self.queue.borrow_mut().push_back(input);
            }
        }
    }

    /// Installs `backend`, replays queued input in arrival order through
    /// `deliver`, then reports the module initialized.
    ///
    /// Input submitted while the replay is running joins the back of the queue,
    /// so arrival order is preserved. Ignored unless setup is pending.
    pub fn complete_setup(&self, backend: B, mut deliver: impl FnMut(&B, PendingAudio)) {
        let state = self.state();
        if state != BackendState::Pending {
            tracing::warn!(module = %self.module_id, ?state, "readiness: setup completed in unexpected state");
            return;
        }

        let backend = Rc::new(backend);
        let mut replayed = 0usize;
        loop {
            let next = self.queue.borrow_mut().pop_front();
            let Some(input) = next else { break };
            deliver(&backend, input);
            replayed += 1;
        }
        *self.slot.borrow_mut() = Slot::Ready(backend);
        tracing::debug!(module = %self.module_id, replayed, "readiness: backend ready");
        self.coordinator.mark_initialized(&self.module_id);
    }

    /// Hands the backend back and drops queued input.
    ///
    /// A module released while still pending is unregistered from the
    /// coordinator so barriers do not wait on it.
    pub fn release(&self) -> Option<B> {
        let previous = std::mem::replace(&mut *self.slot.borrow_mut(), Slot::Released);
        self.queue.borrow_mut().clear();
        match previous {
            Slot::Ready(backend) => Rc::try_unwrap(backend).ok(),
            Slot::Pending => {
                self.coordinator.unregister(&self.module_id);
                None
            }
            Slot::Unavailable | Slot::Released => None,
        }
    }
}

impl<B> fmt::Debug for AsyncBackend<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBackend")
            .field("module_id", &self.module_id)
            .field("state", &self.state())
            .field("queued", &self.pending_len())
            .finish()
    }
}
