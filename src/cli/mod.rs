//! CLI interface for libautomata
//!
//! Provides command-line access to the notation validators and converter,
//! the automaton diagrams and the combo matcher.

pub mod args;
pub mod commands;
pub mod paths;
pub mod session;

pub use args::{Cli, Commands};
pub use paths::{config_dir, PersistentConfig};
pub use session::ComboSession;
