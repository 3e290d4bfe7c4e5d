//! Mapping synthesis.
//!
//! For every (action kind, input mode) pair this picks one of two ways for
//! the host to reach the dispatch shims when a trigger fires:
//!
//! - **Expression evaluation** ([`Mechanism::Expression`]). The binding
//!   evaluates a shim call and discards the result. The *consuming* form is
//!   evaluated once per keypress and reads the live count. The
//!   *non-effecting* form runs the call without touching the mode's
//!   selection or repeat state; in selection modes the count has to be baked
//!   into the expression as a literal when the host builds it, because it is
//!   not readable from inside that evaluation.
//! - **Command-line invocation** ([`Mechanism::CommandLine`]). The binding
//!   issues a direct call. In ordinary mode a range-cancelling prefix keeps a
//!   stray count from becoming a line range. Pending-operator mode never gets
//!   the prefix, since it would break operator composition.
//!
//! The selection itself is a fixed table indexed by [`ActionKind`] and
//! [`ModeGroup`]. Nothing here knows host syntax; rendering to mapping
//! commands lives in [`crate::render`].

use crate::trigger::Trigger;
use crate::types::{ActionId, ActionKind, Count, CountFlavor, InputMode, ModeGroup};

/// Expression-evaluation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprForm {
    /// Evaluated per keypress, result inserted and always empty.
    Consuming,
    /// Evaluated without perturbing selection or repeat state.
    NonEffecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Expression,
    CommandLine,
}

/// How the host reaches the shim when the trigger fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mechanism {
    Expression(ExprForm),
    CommandLine { cancel_range: bool },
}

impl Mechanism {
    pub const fn strategy(self) -> Strategy {
        match self {
            Mechanism::Expression(_) => Strategy::Expression,
            Mechanism::CommandLine { .. } => Strategy::CommandLine,
        }
    }

    /// Whether the host's "repeat last change" facility may record a
    /// keypress handled through this mechanism.
    pub const fn touches_repeat_state(self) -> bool {
        matches!(self, Mechanism::Expression(ExprForm::Consuming))
    }
}

/// When the count handed to a shim is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capture {
    /// Read from the host's count variable while the call runs.
    Live,
    /// Spliced into the call text when the host builds the expression.
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountArg {
    pub flavor: CountFlavor,
    pub capture: Capture,
}

impl CountArg {
    pub const fn live(flavor: CountFlavor) -> Self {
        Self {
            flavor,
            capture: Capture::Live,
        }
    }

    pub const fn literal(flavor: CountFlavor) -> Self {
        Self {
            flavor,
            capture: Capture::Literal,
        }
    }

    pub const fn resolve(self, count: Count) -> u32 {
        self.flavor.read(count)
    }
}

/// Which shim a binding calls and what it passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    /// Call a 0-ary action once.
    Once,
    /// Call a 0-ary action as many times as the count says.
    Repeat(CountArg),
    /// Call a 1-ary action once with the count.
    WithCount(CountArg),
}

impl Call {
    pub const fn count_arg(self) -> Option<CountArg> {
        match self {
            Call::Once => None,
            Call::Repeat(arg) | Call::WithCount(arg) => Some(arg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetCall {
    pub id: ActionId,
    pub call: Call,
}

/// One binding, ready for a host adapter to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSpec {
    pub mode: InputMode,
    pub trigger: Trigger,
    pub mechanism: Mechanism,
    pub target: TargetCall,
}

/// The per-cell choice in the synthesis table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub mechanism: Mechanism,
    pub call: Call,
}

const LIVE_COUNT: CountArg = CountArg::live(CountFlavor::Raw);
const LIVE_COUNT1: CountArg = CountArg::live(CountFlavor::AtLeastOne);

const EXPR_ONCE: Plan = Plan {
    mechanism: Mechanism::Expression(ExprForm::NonEffecting),
    call: Call::Once,
};

const EXPR_REPEAT: Plan = Plan {
    mechanism: Mechanism::Expression(ExprForm::Consuming),
    call: Call::Repeat(LIVE_COUNT1),
};

const fn cmd(cancel_range: bool, call: Call) -> Plan {
    Plan {
        mechanism: Mechanism::CommandLine { cancel_range },
        call,
    }
}

const fn expr_literal(flavor: CountFlavor) -> Plan {
    Plan {
        mechanism: Mechanism::Expression(ExprForm::NonEffecting),
        call: Call::WithCount(CountArg::literal(flavor)),
    }
}

/// Rows follow [`ActionKind`], columns follow [`ModeGroup`]
/// (ordinary, selection, pending-operator).
static TABLE: [[Plan; ModeGroup::COUNT]; ActionKind::ALL.len()] = [
    // Idempotent
    [EXPR_ONCE, EXPR_ONCE, cmd(false, Call::Once)],
    // Repeatable
    [EXPR_REPEAT, EXPR_REPEAT, cmd(false, Call::Repeat(LIVE_COUNT1))],
    // WithCount
    [
        cmd(true, Call::WithCount(LIVE_COUNT)),
        expr_literal(CountFlavor::Raw),
        cmd(false, Call::WithCount(LIVE_COUNT)),
    ],
    // WithCount1
    [
        cmd(true, Call::WithCount(LIVE_COUNT1)),
        expr_literal(CountFlavor::AtLeastOne),
        cmd(false, Call::WithCount(LIVE_COUNT1)),
    ],
];

pub fn plan(kind: ActionKind, mode: InputMode) -> Plan {
    TABLE[kind.index()][mode.group().index()]
}

pub fn synthesize(
    id: ActionId,
    kind: ActionKind,
    mode: InputMode,
    trigger: Trigger,
) -> MappingSpec {
    let Plan { mechanism, call } = plan(kind, mode);
    MappingSpec {
        mode,
        trigger,
        mechanism,
        target: TargetCall { id, call },
    }
}
