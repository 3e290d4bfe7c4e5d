use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Modes;

/// Per-registration settings.
///
/// Deserializes from a map with the optional keys `modes` (a string over
/// `n`, `v`, `x`, `s`, `o`) and `name`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Modes to install a binding in. Defaults to `nvo`.
    pub modes: Modes,
    /// Explicit action name. When absent one is generated from the id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the modes from their character form, e.g. `"nx"`.
    pub fn in_modes(mut self, modes: &str) -> Result<Self> {
        self.modes = modes.parse()?;
        Ok(self)
    }

    pub fn with_modes(mut self, modes: Modes) -> Self {
        self.modes = modes;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
