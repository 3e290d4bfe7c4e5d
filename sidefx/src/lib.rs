pub mod actions;
mod dispatch;
pub mod engine;
pub mod error;
pub mod names;
pub mod options;
pub mod render;
pub mod synth;
pub mod traits;
pub mod trigger;
pub mod types;

pub use crate::engine::{SideEffects, Snapshot, SnapshotEntry, WeakSideEffects};
pub use crate::error::{Error, NameRule, Result};
pub use crate::names::{RESERVED_PREFIX, format_valid as name_format_valid};
pub use crate::options::Options;
pub use crate::render::CommandHost;
pub use crate::synth::{Call, Capture, CountArg, ExprForm, MappingSpec, Mechanism, Strategy};
pub use crate::traits::{CommandSink, Host};
pub use crate::trigger::Trigger;
pub use crate::types::{
    Action, ActionId, ActionKind, Count, CountFlavor, InputMode, ModeGroup, Modes,
};
