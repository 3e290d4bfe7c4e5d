//! Dispatch shims: the fixed entry points a triggered binding calls.
//!
//! There is one shim per (strategy, call shape). Each looks the callback up by
//! id, releases the registry borrow, and runs it. An unknown id here means a
//! binding outlived its registration.

use tracing::{trace, warn};

use crate::engine::SideEffects;
use crate::error::{Error, Result};
use crate::synth::{Call, MappingSpec, Strategy};
use crate::traits::Host;
use crate::types::{Action, ActionId, Count};

impl<H: Host> SideEffects<H> {
    /// Runs the shim `spec` targets. `count` is the prefix the host saw when
    /// it built (literal capture) or evaluated (live capture) the call.
    ///
    /// Expression shims return the text the host should insert, which is
    /// always empty; command-line shims return an empty string as well.
    pub fn run(&self, spec: &MappingSpec, count: Count) -> Result<String> {
        let id = spec.target.id;
        trace!(%id, mode = %spec.mode, ?count, "dispatch");
        match (spec.mechanism.strategy(), spec.target.call) {
            (Strategy::Expression, Call::Once) => self.expr_call0(id),
            (Strategy::Expression, Call::Repeat(arg)) => self.expr_repeat0(id, arg.resolve(count)),
            (Strategy::Expression, Call::WithCount(arg)) => self.expr_call1(id, arg.resolve(count)),
            (Strategy::CommandLine, Call::Once) => self.cmd_call0(id).map(|()| String::new()),
            (Strategy::CommandLine, Call::Repeat(arg)) => self
                .cmd_repeat0(id, arg.resolve(count))
                .map(|()| String::new()),
            (Strategy::CommandLine, Call::WithCount(arg)) => self
                .cmd_call1(id, arg.resolve(count))
                .map(|()| String::new()),
        }
    }

    pub fn expr_call0(&self, id: ActionId) -> Result<String> {
        self.call0(id, 1)?;
        Ok(String::new())
    }

    pub fn expr_repeat0(&self, id: ActionId, count1: u32) -> Result<String> {
        self.call0(id, count1)?;
        Ok(String::new())
    }

    pub fn expr_call1(&self, id: ActionId, count: u32) -> Result<String> {
        self.call1(id, count)?;
        Ok(String::new())
    }

    pub fn cmd_call0(&self, id: ActionId) -> Result<()> {
        self.call0(id, 1)
    }

    pub fn cmd_repeat0(&self, id: ActionId, count1: u32) -> Result<()> {
        self.call0(id, count1)
    }

    pub fn cmd_call1(&self, id: ActionId, count: u32) -> Result<()> {
        self.call1(id, count)
    }

    fn lookup(&self, id: ActionId) -> Result<Action> {
        let actions = self.shared.actions.borrow();
        actions.action(id).inspect_err(|_| {
            warn!(%id, "stale binding: no action registered under this id");
        })
    }

    /// Counts down from `times` to 1; `0` runs nothing. Stops quietly once
    /// the action has been cleared, even if the callback cleared itself.
    fn call0(&self, id: ActionId, times: u32) -> Result<()> {
        let Action::Nullary(f) = self.lookup(id)? else {
            return Err(self.arity_fault(id, 1));
        };
        for remaining in (1..=times).rev() {
            if remaining < times && !self.shared.actions.borrow().contains(id) {
                trace!(%id, remaining, "action cleared mid-repeat");
                break;
            }
            f();
        }
        Ok(())
    }

    fn call1(&self, id: ActionId, count: u32) -> Result<()> {
        let Action::Unary(f) = self.lookup(id)? else {
            return Err(self.arity_fault(id, 0));
        };
        f(count);
        Ok(())
    }

    fn arity_fault(&self, id: ActionId, found: u8) -> Error {
        match self.kind_of(id) {
            Ok(kind) => Error::ArityMismatch { kind, found },
            Err(err) => err,
        }
    }
}
