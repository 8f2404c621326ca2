//! Trie-based multi-pattern sequence matching.
//!
//! A [`TrieMatcher`] recognises labelled symbol sequences from a live input
//! stream. Patterns sharing a prefix share nodes, so one cursor tracks every
//! candidate at once.

pub mod error;
mod matcher;
mod node;

pub use error::{Result, TrieError};
pub use matcher::{TrieDiagram, TrieDiagramState, TrieDiagramTransition, TrieMatcher};
pub use node::{DuplicatePolicy, MatcherConfig, NodeId, Pattern, TrieNode, ROOT};
