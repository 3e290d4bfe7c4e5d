use std::fmt;

use crate::names::{MAX_NAME_LEN, RESERVED_PREFIX};
use crate::trigger::Trigger;
use crate::types::{ActionId, ActionKind, InputMode};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by registration, clearing and dispatch.
///
/// Every error is reported to the immediate caller; nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid action name {name:?}: {rule}")]
    InvalidNameFormat { name: String, rule: NameRule },

    #[error("action name {0:?} is already in use")]
    NameNotAvailable(String),

    #[error("no action is registered with id {0}")]
    UnknownId(ActionId),

    #[error("no action is registered with name {0:?}")]
    UnknownName(String),

    #[error("unsupported mode {0:?}, expected one of n, v, x, s, o")]
    UnsupportedMode(char),

    #[error("{trigger} is already mapped in mode {mode}")]
    DuplicateTrigger { mode: InputMode, trigger: Trigger },

    #[error("{kind:?} actions take {} argument(s), the callback takes {found}", .kind.arity())]
    ArityMismatch { kind: ActionKind, found: u8 },

    #[error("host command failed: {0}")]
    Host(String),
}

/// The name rule a rejected name broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Empty,
    TooLong { len: usize },
    InvalidChar(char),
    ReservedPrefix,
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRule::Empty => f.write_str("names must not be empty"),
            NameRule::TooLong { len } => write!(
                f,
                "names are at most {MAX_NAME_LEN} characters long, this one has {len}"
            ),
            NameRule::InvalidChar(c) => write!(
                f,
                "names may only contain ASCII letters, digits, '-', '_', '.' and ':', found {c:?}"
            ),
            NameRule::ReservedPrefix => write!(
                f,
                "names must not start with {RESERVED_PREFIX:?} in any letter case"
            ),
        }
    }
}
