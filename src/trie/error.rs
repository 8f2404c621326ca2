//! Error types for trie construction.

use thiserror::Error;

/// Errors that can occur while building a [`TrieMatcher`](super::TrieMatcher).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TrieError {
    /// A pattern has no symbols.
    ///
    /// An empty sequence would mark the root as accepting, which would make
    /// every input report a match before consuming anything.
    #[error("Pattern '{label}' has an empty sequence")]
    EmptyPattern {
        /// Label of the offending pattern
        label: String,
    },

    /// Two patterns share an identical sequence.
    ///
    /// Only raised under [`DuplicatePolicy::Reject`](super::DuplicatePolicy::Reject).
    #[error("Pattern '{incoming}' has the same sequence as '{existing}'")]
    DuplicateSequence {
        /// Label already attached to the sequence
        existing: String,
        /// Label that tried to claim it
        incoming: String,
    },
}

/// A specialized `Result` type for trie operations.
pub type Result<T> = std::result::Result<T, TrieError>;
