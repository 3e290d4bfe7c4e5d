use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::types::{Action, ActionId, ActionKind, InputMode, Modes};

/// What the registry keeps for one id.
#[derive(Debug, Clone)]
pub struct Registration {
    pub kind: ActionKind,
    /// Modes a binding is currently installed in.
    pub modes: Modes,
    pub action: Action,
}

/// Callbacks keyed by id. Knows nothing about names.
#[derive(Debug, Default)]
pub struct ActionTable {
    entries: HashMap<ActionId, Registration>,
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ActionId, kind: ActionKind, action: Action) {
        self.entries.insert(
            id,
            Registration {
                kind,
                modes: Modes::empty(),
                action,
            },
        );
    }

    pub fn get(&self, id: ActionId) -> Result<&Registration> {
        self.entries.get(&id).ok_or(Error::UnknownId(id))
    }

    /// A shared handle to the callback, so it can run after the table's
    /// borrow has ended.
    pub fn action(&self, id: ActionId) -> Result<Action> {
        self.get(id).map(|entry| entry.action.clone())
    }

    pub fn mark_installed(&mut self, id: ActionId, mode: InputMode) -> Result<()> {
        let entry = self.entries.get_mut(&id).ok_or(Error::UnknownId(id))?;
        entry.modes |= Modes::from(mode);
        Ok(())
    }

    pub fn remove(&mut self, id: ActionId) -> Result<Registration> {
        self.entries.remove(&id).ok_or(Error::UnknownId(id))
    }

    pub fn contains(&self, id: ActionId) -> bool {
        self.entries.contains_key(&id)
    }
}
