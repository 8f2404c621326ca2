//! Generic pushdown automaton engine.
//!
//! A [`PushdownAutomaton`] is configured once with named states and guarded
//! transitions, then driven one pre-classified input symbol at a time. Each
//! step is recorded so callers can inspect the full execution afterwards.

mod automaton;
mod diagram;
pub mod error;
mod state;

pub use automaton::{Configuration, InputSymbol, ProcessOutcome, PushdownAutomaton};
pub use diagram::{DiagramState, DiagramTransition, PdaDiagram};
pub use error::{PdaError, Result};
pub use state::{PdaState, StackAction, StateId, StateKind, Transition};
