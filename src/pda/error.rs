//! Error types for pushdown automaton configuration and execution.

use thiserror::Error;

/// Errors raised while configuring or stepping a
/// [`PushdownAutomaton`](super::PushdownAutomaton).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PdaError {
    /// A state with this name already exists.
    #[error("State '{0}' is already defined")]
    DuplicateState(String),

    /// A transition refers to a state that was never added.
    #[error("State '{0}' does not exist")]
    UnknownState(String),

    /// A second state of kind `Initial` was added.
    #[error("Initial state already set to '{existing}', cannot add '{incoming}'")]
    MultipleInitialStates {
        /// Current initial state
        existing: String,
        /// Rejected state
        incoming: String,
    },

    /// The automaton was stepped before an initial state was added.
    #[error("Automaton has no initial state")]
    NoInitialState,

    /// No transition matches the current state, symbol and stack top.
    ///
    /// `state` is the state the automaton was in before the failed step.
    #[error("No valid transition for '{symbol}' in state '{state}'")]
    NoTransition {
        /// Rendered input symbol
        symbol: String,
        /// State before the step
        state: String,
    },

    /// A pop or replace was attempted with only the bottom marker left.
    #[error("Stack action '{action}' failed in state '{state}': stack is empty")]
    StackAction {
        /// Rendered stack action
        action: String,
        /// State before the step
        state: String,
    },
}

/// A specialized `Result` type for PDA operations.
pub type Result<T> = std::result::Result<T, PdaError>;
