//! # libautomata
//!
//! Trie-based sequence matching and configurable pushdown automata.
//!
//! The crate bundles two independent engines and the applications built on
//! them:
//!
//! - [`trie::TrieMatcher`] recognises labelled symbol sequences from a live
//!   input stream, restarting from the root on a mismatch.
//!   [`combo`] uses it for fighting-game style combo detection with a
//!   separate timing controller.
//! - [`pda::PushdownAutomaton`] executes guarded state/stack transitions one
//!   symbol at a time and records its full execution. [`notation`] uses
//!   three fixed configurations of it to validate infix, postfix and prefix
//!   arithmetic, and converts between them with the Shunting-yard algorithm.
//!
//! ## Example
//!
//! ```rust
//! use libautomata::prelude::*;
//!
//! let result = validate("(3+4)*2", Notation::Infix);
//! assert!(result.is_valid);
//!
//! let converted = convert("(3+4)*2", Notation::Infix, Notation::Prefix);
//! assert_eq!(converted.result_expression.as_deref(), Some("* + 3 4 2"));
//!
//! let config = MatcherConfig::new(vec![
//!     Pattern::new(vec!['a', 'b'], "AB"),
//!     Pattern::new(vec!['a', 'c'], "AC"),
//! ]);
//! let mut matcher = TrieMatcher::build(config).unwrap();
//! assert_eq!(matcher.process_input(&'a'), None);
//! assert_eq!(matcher.process_input(&'c').as_deref(), Some("AC"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod combo;
pub mod notation;
pub mod pda;
pub mod stack;
pub mod trie;

/// Interactive REPL for validating, converting and matching
#[cfg(feature = "cli")]
pub mod repl;

/// CLI interface and utilities
#[cfg(feature = "cli")]
pub mod cli;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::combo::{
        ChargeZone, ComboCatalogue, ComboController, ComboDefinition, ComboInput,
        ControllerEvent, TimingConfig,
    };
    pub use crate::notation::{
        convert, convert_to_all, validate, ConversionResult, ExpressionConverter,
        ExpressionValidator, Notation, OperatorTable, TokenKind, ValidationResult,
    };
    pub use crate::pda::{PdaError, PushdownAutomaton, StackAction, StateKind};
    pub use crate::stack::SymbolStack;
    pub use crate::trie::{DuplicatePolicy, MatcherConfig, Pattern, TrieError, TrieMatcher};
}
