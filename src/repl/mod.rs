//! Interactive REPL for libautomata
//!
//! A Read-Eval-Print Loop for validating and converting expressions,
//! inspecting the automata and feeding inputs to the combo matcher.

pub mod command;
pub mod helper;
pub mod highlighter;
pub mod state;
pub mod state_machine;

pub use command::{Command, CommandResult};
pub use helper::AutomataHelper;
pub use state::ReplState;
pub use state_machine::{ReplEvent, ReplPhase, ReplStateMachine, Transition};

/// REPL configuration
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string
    pub prompt: String,
    /// History file path
    pub history_file: Option<std::path::PathBuf>,
    /// Maximum history entries
    pub max_history: usize,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "automata".to_string(),
            history_file: Some(
                dirs::home_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join(".automata_history"),
            ),
            max_history: 1000,
        }
    }
}
