use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Identifier handed out for every registered action.
///
/// Ids are positive, issued in increasing order, and never reissued within the
/// lifetime of a [`SideEffects`](crate::SideEffects) context, even after the
/// action they named has been cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(u64);

impl ActionId {
    /// The first id a fresh context issues.
    pub const FIRST: ActionId = ActionId(1);

    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> ActionId {
        ActionId(self.0 + 1)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an action is invoked and whether it may run more than once per keypress.
///
/// The kind is fixed when the action is set up. Clearing and setting up again
/// is the only way to change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Takes no argument and must not be re-run by the host's repeat facility.
    Idempotent,
    /// Takes no argument and may be run any number of times in a row.
    Repeatable,
    /// Takes the raw count prefix, `0` when none was typed.
    WithCount,
    /// Takes the count prefix, `1` when none was typed.
    WithCount1,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Idempotent,
        ActionKind::Repeatable,
        ActionKind::WithCount,
        ActionKind::WithCount1,
    ];

    /// Number of arguments the callback for this kind receives.
    pub const fn arity(self) -> u8 {
        match self {
            ActionKind::Idempotent | ActionKind::Repeatable => 0,
            ActionKind::WithCount | ActionKind::WithCount1 => 1,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// One of the modal contexts a binding can be installed in.
///
/// Each variant corresponds to a mode character accepted in
/// [`Options::modes`](crate::Options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputMode {
    /// Ordinary command mode (`n`).
    Normal,
    /// Visual and select mode together (`v`).
    VisualSelect,
    /// Visual mode only (`x`).
    Visual,
    /// Select mode only (`s`).
    Select,
    /// Pending-operator mode (`o`).
    OperatorPending,
}

impl InputMode {
    pub const ALL: [InputMode; 5] = [
        InputMode::Normal,
        InputMode::VisualSelect,
        InputMode::Visual,
        InputMode::Select,
        InputMode::OperatorPending,
    ];

    pub fn from_char(c: char) -> Result<Self, Error> {
        match c {
            'n' => Ok(InputMode::Normal),
            'v' => Ok(InputMode::VisualSelect),
            'x' => Ok(InputMode::Visual),
            's' => Ok(InputMode::Select),
            'o' => Ok(InputMode::OperatorPending),
            other => Err(Error::UnsupportedMode(other)),
        }
    }

    pub const fn as_char(self) -> char {
        match self {
            InputMode::Normal => 'n',
            InputMode::VisualSelect => 'v',
            InputMode::Visual => 'x',
            InputMode::Select => 's',
            InputMode::OperatorPending => 'o',
        }
    }

    /// The execution-model family this mode belongs to.
    pub const fn group(self) -> ModeGroup {
        match self {
            InputMode::Normal => ModeGroup::Normal,
            InputMode::VisualSelect | InputMode::Visual | InputMode::Select => {
                ModeGroup::Selection
            }
            InputMode::OperatorPending => ModeGroup::OperatorPending,
        }
    }

    const fn flag(self) -> Modes {
        match self {
            InputMode::Normal => Modes::NORMAL,
            InputMode::VisualSelect => Modes::VISUAL_SELECT,
            InputMode::Visual => Modes::VISUAL,
            InputMode::Select => Modes::SELECT,
            InputMode::OperatorPending => Modes::OPERATOR_PENDING,
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Modes that share an execution model and therefore an invocation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeGroup {
    Normal,
    Selection,
    OperatorPending,
}

impl ModeGroup {
    pub(crate) const COUNT: usize = 3;

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// A set of input modes, written as a string over `n`, `v`, `x`, `s`, `o`.
    ///
    /// Parsing is strict: any other character fails with
    /// [`Error::UnsupportedMode`]. Repeated characters are harmless.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modes: u8 {
        const NORMAL           = 0b00001;
        const VISUAL_SELECT    = 0b00010;
        const VISUAL           = 0b00100;
        const SELECT           = 0b01000;
        const OPERATOR_PENDING = 0b10000;
    }
}

impl Modes {
    pub fn contains_mode(self, mode: InputMode) -> bool {
        self.contains(mode.flag())
    }

    /// Member modes in a stable order (`n`, `v`, `x`, `s`, `o`).
    pub fn modes(self) -> impl Iterator<Item = InputMode> {
        InputMode::ALL
            .into_iter()
            .filter(move |mode| self.contains_mode(*mode))
    }
}

impl Default for Modes {
    fn default() -> Self {
        Modes::NORMAL | Modes::VISUAL_SELECT | Modes::OPERATOR_PENDING
    }
}

impl From<InputMode> for Modes {
    fn from(mode: InputMode) -> Self {
        mode.flag()
    }
}

impl FromIterator<InputMode> for Modes {
    fn from_iter<I: IntoIterator<Item = InputMode>>(iter: I) -> Self {
        iter.into_iter().fold(Modes::empty(), |acc, mode| acc | mode.flag())
    }
}

impl FromStr for Modes {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars().map(InputMode::from_char).collect()
    }
}

impl fmt::Display for Modes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for mode in self.modes() {
            write!(f, "{}", mode.as_char())?;
        }
        Ok(())
    }
}

impl Serialize for Modes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Modes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The count prefix typed before a trigger, as the host reports it.
///
/// `0` means no count was typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count(pub u32);

impl Count {
    pub const NONE: Count = Count(0);

    /// The raw count, `0` when absent.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The count, `1` when absent.
    pub const fn at_least_one(self) -> u32 {
        if self.0 == 0 { 1 } else { self.0 }
    }
}

/// Which flavor of the host's count prefix a call reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountFlavor {
    /// Defaults to `0` (Vim's `v:count`).
    Raw,
    /// Defaults to `1` (Vim's `v:count1`).
    AtLeastOne,
}

impl CountFlavor {
    pub const fn read(self, count: Count) -> u32 {
        match self {
            CountFlavor::Raw => count.raw(),
            CountFlavor::AtLeastOne => count.at_least_one(),
        }
    }
}

/// A registered callback.
///
/// Callbacks are shared so a dispatch can run one without holding any borrow
/// of the registry, which lets the callback itself set up or clear actions.
#[derive(Clone)]
pub enum Action {
    Nullary(Rc<dyn Fn()>),
    Unary(Rc<dyn Fn(u32)>),
}

impl Action {
    pub fn nullary(f: impl Fn() + 'static) -> Self {
        Action::Nullary(Rc::new(f))
    }

    pub fn unary(f: impl Fn(u32) + 'static) -> Self {
        Action::Unary(Rc::new(f))
    }

    pub fn arity(&self) -> u8 {
        match self {
            Action::Nullary(_) => 0,
            Action::Unary(_) => 1,
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Nullary(_) => f.write_str("Action::Nullary(..)"),
            Action::Unary(_) => f.write_str("Action::Unary(..)"),
        }
    }
}
