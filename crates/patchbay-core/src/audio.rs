//! Audio capability hooks.
//!
//! AUDIO values are backend node handles that must be mixed, not replaced, so
//! bindings into AUDIO inputs hand each push to the target module instead of
//! overwriting the input cell. A module opts in by implementing
//! [`AudioCapable`] and returning itself from
//! [`Module::as_audio()`](crate::Module::as_audio). Modules that don't get the
//! fallback: last write wins on the input cell.

use crate::binding::SourceRef;
use crate::value::AudioHandle;

/// Hooks for modules that mix or process AUDIO inputs.
pub trait AudioCapable {
    /// Called for every non-empty handle pushed by a producer bound to `port`.
    ///
    /// Implementations usually write the handle into the input cell (so UI
    /// readers see it) and connect it to their backend.
    fn handle_audio_input(&self, port: &str, handle: &AudioHandle, source: &SourceRef);

    /// Called when the binding from `source` into `port` is removed.
    fn handle_audio_disconnect(&self, _port: &str, _source: &SourceRef) {}

    /// Whether the module currently forwards audio to its backend.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Enables or disables forwarding to the backend.
    fn set_enabled(&self, _enabled: bool) {}
}
