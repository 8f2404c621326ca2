//! CLI argument definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::notation::Notation;

#[derive(Parser)]
#[command(name = "automata")]
#[command(about = "Expression notation validation and trie-based combo matching")]
#[command(version)]
pub struct Cli {
    /// Custom configuration file path
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive REPL
    Repl {
        /// Notation assumed by `validate` and `convert`
        #[arg(short, long)]
        notation: Option<Notation>,

        /// Show traces and conversion steps
        #[arg(long)]
        trace: bool,

        /// Combo catalogue file (JSON)
        #[arg(long)]
        catalogue: Option<PathBuf>,

        /// Combo inter-input timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },

    /// Validate an expression
    Validate {
        /// Expression to validate
        expression: String,

        /// Notation of the expression (defaults to the configured notation)
        #[arg(short, long)]
        notation: Option<Notation>,

        /// Print the automaton trace
        #[arg(long)]
        trace: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert an expression to another notation
    Convert {
        /// Expression to convert
        expression: String,

        /// Source notation (defaults to the configured notation)
        #[arg(short, long)]
        from: Option<Notation>,

        /// Target notation
        #[arg(short, long)]
        to: Notation,

        /// Print the conversion steps
        #[arg(long)]
        trace: bool,
    },

    /// Convert an expression to every other notation
    ConvertAll {
        /// Expression to convert
        expression: String,

        /// Source notation (defaults to the configured notation)
        #[arg(short, long)]
        from: Option<Notation>,
    },

    /// Export the states and transitions of an automaton
    Diagram {
        /// Validator automaton to export
        #[arg(short, long, conflicts_with = "combos")]
        notation: Option<Notation>,

        /// Export the combo trie instead
        #[arg(long)]
        combos: bool,

        /// Combo catalogue file (JSON)
        #[arg(long)]
        catalogue: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the combo catalogue
    Combos {
        /// Combo catalogue file (JSON)
        #[arg(long)]
        catalogue: Option<PathBuf>,
    },

    /// Feed inputs to the combo matcher
    Match {
        /// Inputs by name, letter or glyph (e.g. `R R R S`)
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Combo catalogue file (JSON)
        #[arg(long)]
        catalogue: Option<PathBuf>,
    },

    /// Show or update user settings
    Settings {
        /// Set default notation
        #[arg(long)]
        set_notation: Option<Notation>,

        /// Set whether traces are shown
        #[arg(long)]
        set_show_trace: Option<bool>,

        /// Set combo catalogue file
        #[arg(long)]
        set_catalogue: Option<PathBuf>,

        /// Set combo inter-input timeout in milliseconds
        #[arg(long)]
        set_timeout_ms: Option<u64>,

        /// Reset configuration to defaults
        #[arg(long)]
        reset: bool,
    },
}
