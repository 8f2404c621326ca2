//! Error types for combo catalogues.

use std::path::PathBuf;

use thiserror::Error;

use crate::trie::TrieError;

/// Errors raised while loading, parsing or compiling a combo catalogue.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// An input name did not match any [`ComboInput`](super::ComboInput).
    #[error("Unknown input '{0}' (expected UP, DOWN, LEFT, RIGHT or SPACE)")]
    UnknownInput(String),

    /// The catalogue file could not be read or written.
    #[error("Failed to access catalogue {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The catalogue file is not valid JSON for a catalogue.
    #[cfg(feature = "serialization")]
    #[error("Invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The combos do not form a valid matcher.
    #[error(transparent)]
    Trie(#[from] TrieError),
}

/// A specialized `Result` type for catalogue operations.
pub type Result<T> = std::result::Result<T, CatalogueError>;
