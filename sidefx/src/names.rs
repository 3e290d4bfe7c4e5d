//! Action names: the id ↔ name store and the rules a name must follow.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{Error, NameRule, Result};
use crate::types::ActionId;

/// Prefix reserved for generated names. User names may not start with it,
/// in any letter case.
pub const RESERVED_PREFIX: &str = "MapToSideEffects";

pub const MAX_NAME_LEN: usize = 45;

/// Checks a name against the format rules and reports the first one broken.
pub fn check_format(name: &str) -> std::result::Result<(), NameRule> {
    if name.is_empty() {
        return Err(NameRule::Empty);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameRule::TooLong { len });
    }
    if let Some(c) = name.chars().find(|c| !is_name_char(*c)) {
        return Err(NameRule::InvalidChar(c));
    }
    if has_reserved_prefix(name) {
        return Err(NameRule::ReservedPrefix);
    }
    Ok(())
}

/// True if `name` matches `^[-_.:A-Za-z0-9]{1,45}$` and does not start with
/// [`RESERVED_PREFIX`].
pub fn format_valid(name: &str) -> bool {
    check_format(name).is_ok()
}

/// The name given to a registration set up without an explicit one.
pub fn generated_name(id: ActionId) -> String {
    format!("{RESERVED_PREFIX}-{id}")
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':')
}

fn has_reserved_prefix(name: &str) -> bool {
    name.get(..RESERVED_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(RESERVED_PREFIX))
}

/// Bidirectional id ↔ name association plus the id generator.
///
/// While both sides exist exactly one name maps to one id. The generator only
/// moves forward; neither [`NameStore::unbind`] nor [`NameStore::reset`]
/// rewinds it, so an id is never handed out twice.
#[derive(Debug)]
pub struct NameStore {
    next_id: ActionId,
    names: BTreeMap<ActionId, String>,
    ids: HashMap<String, ActionId>,
}

impl Default for NameStore {
    fn default() -> Self {
        Self {
            next_id: ActionId::FIRST,
            names: BTreeMap::new(),
            ids: HashMap::new(),
        }
    }
}

impl NameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next id. Always succeeds.
    pub fn allocate(&mut self) -> ActionId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// The id the next [`NameStore::allocate`] call will return.
    pub fn peek_next_id(&self) -> ActionId {
        self.next_id
    }

    pub fn available(&self, name: &str) -> bool {
        !self.ids.contains_key(name)
    }

    /// Fails with the rule broken, or with `NameNotAvailable` if the name is
    /// well formed but already claimed.
    pub fn validate(&self, name: &str) -> Result<()> {
        check_format(name).map_err(|rule| Error::InvalidNameFormat {
            name: name.to_owned(),
            rule,
        })?;
        if !self.available(name) {
            return Err(Error::NameNotAvailable(name.to_owned()));
        }
        Ok(())
    }

    /// Associates `name` with `id`, replacing any name `id` had before.
    ///
    /// The name must already have passed [`NameStore::validate`] (generated
    /// names skip the format check).
    pub fn bind_name(&mut self, id: ActionId, name: String) {
        debug_assert!(
            self.ids.get(&name).is_none_or(|owner| *owner == id),
            "name {name:?} is claimed by another id"
        );
        if let Some(old) = self.names.insert(id, name.clone()) {
            self.ids.remove(&old);
        }
        self.ids.insert(name, id);
    }

    /// Drops both directions of the association and returns the name.
    pub fn unbind(&mut self, id: ActionId) -> Result<String> {
        let name = self.names.remove(&id).ok_or(Error::UnknownId(id))?;
        self.ids.remove(&name);
        Ok(name)
    }

    pub fn resolve(&self, name: &str) -> Result<ActionId> {
        self.ids
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownName(name.to_owned()))
    }

    pub fn name_of(&self, id: ActionId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn all_names(&self) -> BTreeSet<String> {
        self.ids.keys().cloned().collect()
    }

    /// Live ids in ascending order, copied out so callers may mutate the
    /// store while walking them.
    pub fn ids(&self) -> Vec<ActionId> {
        self.names.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Forgets every association. The id generator keeps its position.
    pub fn reset(&mut self) {
        self.names.clear();
        self.ids.clear();
    }
}
