use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeSet, HashSet};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::actions::ActionTable;
use crate::error::{Error, Result};
use crate::names::{self, NameStore};
use crate::options::Options;
use crate::synth;
use crate::traits::Host;
use crate::trigger::Trigger;
use crate::types::{Action, ActionId, ActionKind, Modes};

pub(crate) struct Shared<H> {
    pub(crate) names: RefCell<NameStore>,
    pub(crate) actions: RefCell<ActionTable>,
    pub(crate) host: RefCell<H>,
}

/// The registry context: ids, names, callbacks and the host they are bound in.
///
/// `SideEffects` is a cheap handle; clones share one registry. Every call is
/// synchronous. Registry borrows are released before a callback runs, so
/// callbacks may set up or clear actions themselves. The host is borrowed
/// mutably only for the length of each install or remove call. Use
/// [`SideEffects::downgrade`] when a callback needs to reach back into the
/// registry without keeping it alive.
pub struct SideEffects<H> {
    pub(crate) shared: Rc<Shared<H>>,
}

impl<H> Clone for SideEffects<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// A non-owning [`SideEffects`] handle.
pub struct WeakSideEffects<H> {
    shared: Weak<Shared<H>>,
}

impl<H> Clone for WeakSideEffects<H> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<H> WeakSideEffects<H> {
    pub fn upgrade(&self) -> Option<SideEffects<H>> {
        self.shared.upgrade().map(|shared| SideEffects { shared })
    }
}

/// One live registration as seen from outside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub id: ActionId,
    pub name: String,
    pub kind: ActionKind,
    pub modes: Modes,
}

/// Observable registry state, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl<H: Host> SideEffects<H> {
    pub fn new(host: H) -> Self {
        Self {
            shared: Rc::new(Shared {
                names: RefCell::new(NameStore::new()),
                actions: RefCell::new(ActionTable::new()),
                host: RefCell::new(host),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakSideEffects<H> {
        WeakSideEffects {
            shared: Rc::downgrade(&self.shared),
        }
    }

    pub fn host(&self) -> Ref<'_, H> {
        self.shared.host.borrow()
    }

    pub fn host_mut(&self) -> RefMut<'_, H> {
        self.shared.host.borrow_mut()
    }

    pub fn set_up_idempotent(
        &self,
        action: impl Fn() + 'static,
        options: Options,
    ) -> Result<ActionId> {
        self.set_up(ActionKind::Idempotent, Action::nullary(action), options)
    }

    pub fn set_up_repeatable(
        &self,
        action: impl Fn() + 'static,
        options: Options,
    ) -> Result<ActionId> {
        self.set_up(ActionKind::Repeatable, Action::nullary(action), options)
    }

    pub fn set_up_with_count(
        &self,
        action: impl Fn(u32) + 'static,
        options: Options,
    ) -> Result<ActionId> {
        self.set_up(ActionKind::WithCount, Action::unary(action), options)
    }

    pub fn set_up_with_count1(
        &self,
        action: impl Fn(u32) + 'static,
        options: Options,
    ) -> Result<ActionId> {
        self.set_up(ActionKind::WithCount1, Action::unary(action), options)
    }

    /// Registers `action` and installs one binding per requested mode.
    ///
    /// Fails before anything is stored if the name is malformed or taken, or
    /// if the callback's arity does not fit `kind`. If the host rejects one of
    /// the bindings, everything installed by this call is torn down again and
    /// the host's error is returned; the id it consumed is not reissued.
    pub fn set_up(&self, kind: ActionKind, action: Action, options: Options) -> Result<ActionId> {
        if action.arity() != kind.arity() {
            return Err(Error::ArityMismatch {
                kind,
                found: action.arity(),
            });
        }
        let Options { modes, name } = options;
        if let Some(name) = &name {
            self.shared.names.borrow().validate(name)?;
        }

        let (id, name) = {
            let mut store = self.shared.names.borrow_mut();
            let id = store.allocate();
            let name = name.unwrap_or_else(|| names::generated_name(id));
            store.bind_name(id, name.clone());
            (id, name)
        };
        self.shared.actions.borrow_mut().insert(id, kind, action);

        let trigger = Trigger::new(name);
        for mode in modes.modes() {
            let spec = synth::synthesize(id, kind, mode, trigger.clone());
            let installed = self.shared.host.borrow_mut().install(&spec);
            if let Err(err) = installed {
                warn!(%id, %mode, %trigger, error = %err, "binding rejected, rolling back");
                if let Err(rollback) = self.tear_down(id) {
                    warn!(%id, error = %rollback, "rollback incomplete");
                }
                return Err(err);
            }
            self.shared.actions.borrow_mut().mark_installed(id, mode)?;
        }

        debug!(%id, %trigger, ?kind, %modes, "action set up");
        Ok(id)
    }

    pub fn clear_one(&self, id: ActionId) -> Result<()> {
        self.tear_down(id)?;
        debug!(%id, "action cleared");
        Ok(())
    }

    pub fn clear_one_by_name(&self, name: &str) -> Result<()> {
        let id = self.shared.names.borrow().resolve(name)?;
        self.clear_one(id)
    }

    /// Clears every listed id. All ids are checked first, so an unknown one
    /// fails the call before anything is cleared. Repeated ids are cleared once.
    pub fn clear_multiple(&self, ids: impl IntoIterator<Item = ActionId>) -> Result<()> {
        let mut seen = HashSet::new();
        let ids: Vec<ActionId> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
        {
            let actions = self.shared.actions.borrow();
            if let Some(missing) = ids.iter().find(|id| !actions.contains(**id)) {
                return Err(Error::UnknownId(*missing));
            }
        }
        self.clear_snapshot(ids)
    }

    pub fn clear_multiple_by_names<S: AsRef<str>>(
        &self,
        names: impl IntoIterator<Item = S>,
    ) -> Result<()> {
        let ids = {
            let store = self.shared.names.borrow();
            names
                .into_iter()
                .map(|name| store.resolve(name.as_ref()))
                .collect::<Result<Vec<_>>>()?
        };
        self.clear_multiple(ids)
    }

    /// Clears every registration. The id generator is not rewound.
    pub fn reset(&self) -> Result<()> {
        let ids = self.shared.names.borrow().ids();
        let count = ids.len();
        let result = self.clear_snapshot(ids);
        self.shared.names.borrow_mut().reset();
        debug!(count, "registry reset");
        result
    }

    pub fn name_available(&self, name: &str) -> bool {
        self.shared.names.borrow().available(name)
    }

    pub fn id_of(&self, name: &str) -> Result<ActionId> {
        self.shared.names.borrow().resolve(name)
    }

    pub fn name_of(&self, id: ActionId) -> Result<String> {
        self.shared
            .names
            .borrow()
            .name_of(id)
            .map(str::to_owned)
            .ok_or(Error::UnknownId(id))
    }

    pub fn kind_of(&self, id: ActionId) -> Result<ActionKind> {
        self.shared.actions.borrow().get(id).map(|entry| entry.kind)
    }

    pub fn modes_of(&self, id: ActionId) -> Result<Modes> {
        self.shared.actions.borrow().get(id).map(|entry| entry.modes)
    }

    pub fn trigger_of(&self, id: ActionId) -> Result<Trigger> {
        self.name_of(id).map(Trigger::new)
    }

    pub fn names(&self) -> BTreeSet<String> {
        self.shared.names.borrow().all_names()
    }

    /// The id the next successful set up will return.
    pub fn peek_next_id(&self) -> ActionId {
        self.shared.names.borrow().peek_next_id()
    }

    pub fn len(&self) -> usize {
        self.shared.names.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.names.borrow().is_empty()
    }

    pub fn snapshot(&self) -> Snapshot {
        let store = self.shared.names.borrow();
        let actions = self.shared.actions.borrow();
        let entries = store
            .ids()
            .into_iter()
            .filter_map(|id| {
                let entry = actions.get(id).ok()?;
                Some(SnapshotEntry {
                    id,
                    name: store.name_of(id)?.to_owned(),
                    kind: entry.kind,
                    modes: entry.modes,
                })
            })
            .collect();
        Snapshot { entries }
    }

    fn clear_snapshot(&self, ids: Vec<ActionId>) -> Result<()> {
        let mut first_err = None;
        for id in ids {
            if !self.shared.actions.borrow().contains(id) {
                trace!(%id, "already cleared");
                continue;
            }
            if let Err(err) = self.clear_one(id) {
                warn!(%id, error = %err, "clear failed");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Drops the registry state for `id` first, then removes its bindings, so
    /// no caller sees a half-removed registration.
    fn tear_down(&self, id: ActionId) -> Result<()> {
        let registration = self.shared.actions.borrow_mut().remove(id)?;
        let name = self.shared.names.borrow_mut().unbind(id)?;
        let trigger = Trigger::new(name);

        let mut first_err = None;
        for mode in registration.modes.modes() {
            let removed = self.shared.host.borrow_mut().remove(mode, &trigger);
            if let Err(err) = removed {
                warn!(%id, %mode, %trigger, error = %err, "binding removal failed");
                first_err.get_or_insert(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
