use std::fmt;

/// The indirect key sequence a binding is installed under.
///
/// A trigger is `<Plug>(<name>)`. `<Plug>` can never be typed, so the only
/// way to reach a trigger is for the user to map their own keys to it, which
/// keeps the choice of physical keys out of this crate entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trigger {
    name: String,
}

impl Trigger {
    /// Key notation for the unreachable prefix every trigger starts with.
    pub const PREFIX: &'static str = "<Plug>";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The action name this trigger routes to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key sequence in host key notation, e.g. `<Plug>(save-all)`.
    pub fn keys(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", Self::PREFIX, self.name)
    }
}
