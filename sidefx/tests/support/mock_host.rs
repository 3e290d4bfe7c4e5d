use std::collections::HashMap;

use vim_sidefx::{Count, Error, Host, InputMode, MappingSpec, Result, SideEffects, Trigger};

#[derive(Debug, Clone)]
enum Entry {
    /// A mapping the user made by hand, outside the registry.
    Foreign,
    Synthesized(MappingSpec),
}

/// In-memory mapping table with Vim's `<unique>` behavior.
#[derive(Debug, Default)]
pub struct MockHost {
    table: HashMap<(InputMode, String), Entry>,
    pub installs: usize,
    pub removals: usize,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `keys` in `mode` to something unrelated, so a later install clashes.
    pub fn occupy(&mut self, mode: InputMode, keys: &str) {
        self.table.insert((mode, keys.to_string()), Entry::Foreign);
    }

    /// Drops a mapping behind the registry's back, as a user `:unmap` would.
    pub fn forget(&mut self, mode: InputMode, keys: &str) {
        self.table.remove(&(mode, keys.to_string()));
    }

    pub fn mapping(&self, mode: InputMode, keys: &str) -> Option<&MappingSpec> {
        match self.table.get(&(mode, keys.to_string()))? {
            Entry::Synthesized(spec) => Some(spec),
            Entry::Foreign => None,
        }
    }

    pub fn is_mapped(&self, mode: InputMode, keys: &str) -> bool {
        self.table.contains_key(&(mode, keys.to_string()))
    }

    /// Number of synthesized bindings currently installed.
    pub fn binding_count(&self) -> usize {
        self.table
            .values()
            .filter(|entry| matches!(entry, Entry::Synthesized(_)))
            .count()
    }
}

impl Host for MockHost {
    fn install(&mut self, spec: &MappingSpec) -> Result<()> {
        let key = (spec.mode, spec.trigger.keys());
        if self.table.contains_key(&key) {
            return Err(Error::DuplicateTrigger {
                mode: spec.mode,
                trigger: spec.trigger.clone(),
            });
        }
        self.table.insert(key, Entry::Synthesized(spec.clone()));
        self.installs += 1;
        Ok(())
    }

    fn remove(&mut self, mode: InputMode, trigger: &Trigger) -> Result<()> {
        match self.table.remove(&(mode, trigger.keys())) {
            Some(_) => {
                self.removals += 1;
                Ok(())
            }
            None => Err(Error::Host(format!("E31: No such mapping: {trigger}"))),
        }
    }
}

/// Drives triggers the way the editor's key loop would, including the
/// "repeat last change" command.
pub struct Editor {
    pub fx: SideEffects<MockHost>,
    last_change: Option<(MappingSpec, Count)>,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            fx: SideEffects::new(MockHost::new()),
            last_change: None,
        }
    }

    /// Types `count` (0 for none) followed by `keys` in `mode`.
    pub fn press(&mut self, mode: InputMode, keys: &str, count: u32) -> Result<String> {
        let spec = self
            .fx
            .host()
            .mapping(mode, keys)
            .cloned()
            .ok_or_else(|| Error::Host(format!("nothing mapped to {keys} in {mode}")))?;
        let count = Count(count);
        let inserted = self.fx.run(&spec, count)?;
        if spec.mechanism.touches_repeat_state() {
            self.last_change = Some((spec, count));
        }
        Ok(inserted)
    }

    /// Replays the last recorded change. Returns false if there was none.
    pub fn repeat_last_change(&mut self) -> Result<bool> {
        let Some((spec, count)) = self.last_change.clone() else {
            return Ok(false);
        };
        self.fx.run(&spec, count)?;
        Ok(true)
    }

    /// A native edit (e.g. `x`) that becomes the new last change.
    pub fn native_change(&mut self) {
        self.last_change = None;
    }
}
