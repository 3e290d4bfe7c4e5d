use crate::error::Result;
use crate::synth::MappingSpec;
use crate::trigger::Trigger;
use crate::types::InputMode;

/// The host editor's mapping table.
pub trait Host {
    /// Installs one binding. Must fail with
    /// [`Error::DuplicateTrigger`](crate::Error::DuplicateTrigger) if the
    /// trigger is already mapped in `spec.mode`.
    fn install(&mut self, spec: &MappingSpec) -> Result<()>;

    fn remove(&mut self, mode: InputMode, trigger: &Trigger) -> Result<()>;
}

/// Executes host command text, e.g. Ex commands in a Vim session.
///
/// Errors carry the host's message verbatim.
pub trait CommandSink {
    fn execute(&mut self, command: &str) -> std::result::Result<(), String>;
}
