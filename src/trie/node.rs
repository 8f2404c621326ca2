//! Arena node and pattern types.

use smallvec::SmallVec;

/// Index of a node inside the matcher's arena. The root is always 0.
pub type NodeId = usize;

/// Root node id.
pub const ROOT: NodeId = 0;

/// A node in the prefix tree.
///
/// Edges keep declaration order so that `possible_transitions` and the
/// diagram export are deterministic. Most nodes have one or two children,
/// so edges live inline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrieNode<S> {
    /// Monotonically assigned id, equal to the arena index
    pub id: NodeId,
    /// Edges to child nodes: (symbol, target node id)
    pub edges: SmallVec<[(S, NodeId); 4]>,
    /// Label reported when this node is reached
    pub label: Option<String>,
    /// True if reaching this node completes a pattern
    pub is_accept: bool,
}

impl<S: PartialEq> TrieNode<S> {
    pub(crate) fn new(id: NodeId) -> Self {
        Self {
            id,
            edges: SmallVec::new(),
            label: None,
            is_accept: false,
        }
    }

    /// Child reached by `symbol`, if any.
    #[inline]
    pub fn child(&self, symbol: &S) -> Option<NodeId> {
        self.edges
            .iter()
            .find(|(edge, _)| edge == symbol)
            .map(|&(_, target)| target)
    }
}

/// A labelled symbol sequence registered with the matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Pattern<S> {
    /// Symbols that must be fed in order
    pub sequence: Vec<S>,
    /// Label reported when the sequence completes
    pub label: String,
}

impl<S> Pattern<S> {
    /// Create a pattern.
    pub fn new(sequence: Vec<S>, label: impl Into<String>) -> Self {
        Self {
            sequence,
            label: label.into(),
        }
    }
}

/// How to treat two patterns with identical sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum DuplicatePolicy {
    /// The later pattern's label replaces the earlier one (logged at warn)
    #[default]
    LastWins,
    /// Building fails with [`TrieError::DuplicateSequence`](super::TrieError::DuplicateSequence)
    Reject,
}

/// Construction parameters for a [`TrieMatcher`](super::TrieMatcher).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatcherConfig<S> {
    /// Patterns in declaration order
    pub patterns: Vec<Pattern<S>>,
    /// Policy for identical sequences
    pub duplicate_policy: DuplicatePolicy,
}

impl<S> MatcherConfig<S> {
    /// Config with the default duplicate policy.
    pub fn new(patterns: Vec<Pattern<S>>) -> Self {
        Self {
            patterns,
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    /// Set the duplicate policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

impl<S> Default for MatcherConfig<S> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
