//! States, stack actions and guarded transitions.

use std::fmt;

/// Index of a state inside its automaton.
pub type StateId = usize;

/// Role of a state in acceptance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum StateKind {
    /// Start state; exactly one per automaton
    Initial,
    /// Intermediate state
    Normal,
    /// Ending here at end of input accepts
    Accepting,
    /// Failed steps land here; the first one added is the designated error state
    Error,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initial => "INITIAL",
            Self::Normal => "NORMAL",
            Self::Accepting => "ACCEPTING",
            Self::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A named PDA state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdaState {
    /// Unique name
    pub name: String,
    /// Acceptance role
    pub kind: StateKind,
    /// Human-readable description
    pub description: String,
}

/// Stack effect of a transition, decided at configuration time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum StackAction {
    /// Leave the stack alone
    #[default]
    None,
    /// Push a symbol; always succeeds
    Push(String),
    /// Pop the top symbol; fails on an empty stack
    Pop,
    /// Pop then push; fails on an empty stack
    Replace(String),
}

impl StackAction {
    /// True if the action needs a symbol above the bottom marker.
    pub fn needs_symbol(&self) -> bool {
        matches!(self, Self::Pop | Self::Replace(_))
    }

    /// Symbol this action writes, if any.
    pub fn written_symbol(&self) -> Option<&str> {
        match self {
            Self::Push(symbol) | Self::Replace(symbol) => Some(symbol),
            Self::None | Self::Pop => None,
        }
    }
}

impl fmt::Display for StackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Push(symbol) => write!(f, "push:{}", symbol),
            Self::Pop => f.write_str("pop"),
            Self::Replace(symbol) => write!(f, "replace:{}", symbol),
        }
    }
}

/// A guarded edge between two states.
///
/// `input: None` matches any symbol (epsilon/wildcard) and `stack_top: None`
/// matches any stack top.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<S> {
    /// Source state
    pub from: StateId,
    /// Target state
    pub to: StateId,
    /// Required input symbol
    pub input: Option<S>,
    /// Required stack top
    pub stack_top: Option<String>,
    /// Stack effect
    pub action: StackAction,
    /// Human-readable description
    pub description: String,
}

impl<S: PartialEq> Transition<S> {
    /// Does this edge fire for `state`, the queried symbol and the stack top?
    ///
    /// A `None` query only matches wildcard edges.
    pub fn matches(&self, state: StateId, input: Option<&S>, stack_top: Option<&str>) -> bool {
        if self.from != state {
            return false;
        }
        if let Some(required) = &self.input {
            if input != Some(required) {
                return false;
            }
        }
        match &self.stack_top {
            Some(required) => stack_top == Some(required.as_str()),
            None => true,
        }
    }
}
