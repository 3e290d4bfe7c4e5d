//! Vim host adapter.
//!
//! Turns [`MappingSpec`]s into Vim mapping commands and feeds them to a
//! [`CommandSink`]. The shims are expected to be reachable from Vim script as
//! autoload functions under [`SHIM_NAMESPACE`].

use tracing::trace;

use crate::error::{Error, Result};
use crate::synth::{Call, Capture, CountArg, ExprForm, MappingSpec, Mechanism, Strategy};
use crate::traits::{CommandSink, Host};
use crate::trigger::Trigger;
use crate::types::{CountFlavor, InputMode};

pub const SHIM_NAMESPACE: &str = "sidefx#";

/// Vim's "mapping already exists" error code, raised for `<unique>` clashes.
const DUPLICATE_MAPPING: &str = "E227";

/// Name of the shim a spec calls, without the namespace.
pub fn shim_name(strategy: Strategy, call: Call) -> &'static str {
    match (strategy, call) {
        (Strategy::Expression, Call::Once) => "expr_call0",
        (Strategy::Expression, Call::Repeat(_)) => "expr_repeat0",
        (Strategy::Expression, Call::WithCount(_)) => "expr_call1",
        (Strategy::CommandLine, Call::Once) => "cmd_call0",
        (Strategy::CommandLine, Call::Repeat(_)) => "cmd_repeat0",
        (Strategy::CommandLine, Call::WithCount(_)) => "cmd_call1",
    }
}

fn count_var(flavor: CountFlavor) -> &'static str {
    match flavor {
        CountFlavor::Raw => "v:count",
        CountFlavor::AtLeastOne => "v:count1",
    }
}

/// `sidefx#<shim>(<id>[, <count>])` with the count read live.
fn live_call(spec: &MappingSpec) -> String {
    let shim = shim_name(spec.mechanism.strategy(), spec.target.call);
    let id = spec.target.id;
    match spec.target.call.count_arg() {
        None => format!("{SHIM_NAMESPACE}{shim}({id})"),
        Some(arg) => format!("{SHIM_NAMESPACE}{shim}({id}, {})", count_var(arg.flavor)),
    }
}

/// An `<expr>` body that builds `@=<call><CR>` with the count spliced in as
/// a literal at the moment Vim evaluates the mapping.
fn literal_call(spec: &MappingSpec, arg: CountArg) -> String {
    let shim = shim_name(spec.mechanism.strategy(), spec.target.call);
    let id = spec.target.id;
    format!(
        "'@={SHIM_NAMESPACE}{shim}({id}, ' . {} . \")\\<CR>\"",
        count_var(arg.flavor)
    )
}

fn literal_arg(call: Call) -> Option<CountArg> {
    call.count_arg().filter(|arg| arg.capture == Capture::Literal)
}

/// Renders the command that installs `spec`, e.g.
/// `nnoremap <silent> <unique> <Plug>(grep) :<C-u>call sidefx#cmd_call1(3, v:count)<CR>`.
pub fn map_command(spec: &MappingSpec) -> String {
    let (is_expr, rhs) = match spec.mechanism {
        Mechanism::Expression(ExprForm::Consuming) => (true, live_call(spec)),
        Mechanism::Expression(ExprForm::NonEffecting) => match literal_arg(spec.target.call) {
            Some(arg) => (true, literal_call(spec, arg)),
            None => (false, format!("@={}<CR>", live_call(spec))),
        },
        Mechanism::CommandLine { cancel_range } => {
            let cancel = if cancel_range { "<C-u>" } else { "" };
            (false, format!(":{cancel}call {}<CR>", live_call(spec)))
        }
    };
    let expr = if is_expr { " <expr>" } else { "" };
    format!(
        "{}noremap <silent> <unique>{expr} {} {rhs}",
        spec.mode.as_char(),
        spec.trigger
    )
}

pub fn unmap_command(mode: InputMode, trigger: &Trigger) -> String {
    format!("{}unmap {trigger}", mode.as_char())
}

/// A [`Host`] that drives Vim through rendered commands.
#[derive(Debug, Default)]
pub struct CommandHost<S> {
    sink: S,
}

impl<S: CommandSink> CommandHost<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: CommandSink> Host for CommandHost<S> {
    fn install(&mut self, spec: &MappingSpec) -> Result<()> {
        let command = map_command(spec);
        trace!(%command, "install");
        self.sink.execute(&command).map_err(|message| {
            if message.contains(DUPLICATE_MAPPING) {
                Error::DuplicateTrigger {
                    mode: spec.mode,
                    trigger: spec.trigger.clone(),
                }
            } else {
                Error::Host(message)
            }
        })
    }

    fn remove(&mut self, mode: InputMode, trigger: &Trigger) -> Result<()> {
        let command = unmap_command(mode, trigger);
        trace!(%command, "remove");
        self.sink.execute(&command).map_err(Error::Host)
    }
}
