//! Live-cursor matcher over an arena-allocated prefix tree.

use std::fmt;

use log::{debug, trace, warn};

use super::error::{Result, TrieError};
use super::node::{DuplicatePolicy, MatcherConfig, NodeId, Pattern, TrieNode, ROOT};

/// Multi-pattern sequence matcher.
///
/// Holds a prefix tree built from labelled patterns and a cursor that
/// follows a live input stream one symbol at a time. Reaching an accept
/// node reports its label and resets the cursor.
///
/// The matcher has no notion of time. Timeouts and hold durations belong
/// to the caller (see [`ComboController`](crate::combo::ComboController)).
///
/// # Examples
///
/// ```
/// use libautomata::trie::{MatcherConfig, Pattern, TrieMatcher};
///
/// let config = MatcherConfig::new(vec![
///     Pattern::new(vec!['a', 'b', 'c'], "abc"),
///     Pattern::new(vec!['a', 'x'], "ax"),
/// ]);
/// let mut matcher = TrieMatcher::build(config).unwrap();
///
/// assert_eq!(matcher.process_input(&'a'), None);
/// assert_eq!(matcher.possible_transitions(), vec!['b', 'x']);
/// assert_eq!(matcher.process_input(&'x').as_deref(), Some("ax"));
/// assert_eq!(matcher.current_node_id(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct TrieMatcher<S> {
    nodes: Vec<TrieNode<S>>,
    patterns: Vec<Pattern<S>>,
    current: NodeId,
    history: Vec<S>,
}

impl<S: Clone + Eq + fmt::Debug> TrieMatcher<S> {
    /// Build a matcher from a configuration.
    pub fn build(config: MatcherConfig<S>) -> Result<Self> {
        let nodes = Self::build_nodes(&config)?;
        debug!(
            "Built trie with {} nodes from {} patterns",
            nodes.len(),
            config.patterns.len()
        );
        Ok(Self {
            nodes,
            patterns: config.patterns,
            current: ROOT,
            history: Vec::new(),
        })
    }

    /// Rebuild from scratch with a new configuration.
    ///
    /// On error the matcher is left unchanged.
    pub fn rebuild(&mut self, config: MatcherConfig<S>) -> Result<()> {
        *self = Self::build(config)?;
        Ok(())
    }

    fn build_nodes(config: &MatcherConfig<S>) -> Result<Vec<TrieNode<S>>> {
        // Node 0 is always the root
        let mut nodes = vec![TrieNode::new(ROOT)];

        for pattern in &config.patterns {
            if pattern.sequence.is_empty() {
                return Err(TrieError::EmptyPattern {
                    label: pattern.label.clone(),
                });
            }

            let mut node = ROOT;
            for symbol in &pattern.sequence {
                node = match nodes[node].child(symbol) {
                    Some(child) => child,
                    None => {
                        let child = nodes.len();
                        nodes.push(TrieNode::new(child));
                        nodes[node].edges.push((symbol.clone(), child));
                        child
                    }
                };
            }

            let terminal = &mut nodes[node];
            if terminal.is_accept {
                let existing = terminal.label.clone().unwrap_or_default();
                match config.duplicate_policy {
                    DuplicatePolicy::Reject => {
                        return Err(TrieError::DuplicateSequence {
                            existing,
                            incoming: pattern.label.clone(),
                        });
                    }
                    DuplicatePolicy::LastWins => {
                        warn!(
                            "Pattern '{}' overwrites '{}' (identical sequence {:?})",
                            pattern.label, existing, pattern.sequence
                        );
                    }
                }
            }
            terminal.is_accept = true;
            terminal.label = Some(pattern.label.clone());
        }

        Ok(nodes)
    }

    /// Feed one symbol and return the label of a completed pattern.
    ///
    /// A symbol with no edge from the cursor restarts the attempt from the
    /// root when it is itself a valid pattern start; otherwise the cursor
    /// resets and nothing is reported.
    pub fn process_input(&mut self, symbol: &S) -> Option<String> {
        match self.nodes[self.current].child(symbol) {
            Some(next) => {
                self.history.push(symbol.clone());
                self.current = next;
            }
            None => match self.nodes[ROOT].child(symbol) {
                Some(next) => {
                    trace!("Restarting attempt from root on {:?}", symbol);
                    self.history.clear();
                    self.history.push(symbol.clone());
                    self.current = next;
                }
                None => {
                    trace!("No transition for {:?}, resetting", symbol);
                    self.reset();
                    return None;
                }
            },
        }
        trace!("Moved to node {} via {:?}", self.current, symbol);

        let node = &self.nodes[self.current];
        if node.is_accept {
            let label = node.label.clone();
            self.reset();
            return label;
        }
        None
    }

    /// Return the cursor to the root and clear the consumed history.
    pub fn reset(&mut self) {
        self.current = ROOT;
        self.history.clear();
    }

    /// True if `symbol` has an edge from the cursor.
    pub fn has_transition(&self, symbol: &S) -> bool {
        self.nodes[self.current].child(symbol).is_some()
    }

    /// Id of the node under the cursor.
    pub fn current_node_id(&self) -> NodeId {
        self.current
    }

    /// Symbols leaving the cursor, in declaration order.
    pub fn possible_transitions(&self) -> Vec<S> {
        self.nodes[self.current]
            .edges
            .iter()
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }

    /// Consumed history over the longest pattern it is a prefix of.
    ///
    /// Zero when nothing is consumed or no pattern extends the history.
    pub fn progress_fraction(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        let longest = self
            .patterns
            .iter()
            .filter(|p| p.sequence.starts_with(&self.history))
            .map(|p| p.sequence.len())
            .max()
            .unwrap_or(0);
        if longest == 0 {
            return 0.0;
        }
        self.history.len() as f64 / longest as f64
    }

    /// Symbols consumed in the current attempt.
    pub fn history(&self) -> &[S] {
        &self.history
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Registered patterns in declaration order.
    pub fn patterns(&self) -> &[Pattern<S>] {
        &self.patterns
    }

    /// Look up a pattern by label, ignoring ASCII case.
    ///
    /// With duplicate labels the first declared one wins.
    pub fn find_pattern(&self, label: &str) -> Option<&Pattern<S>> {
        self.patterns
            .iter()
            .find(|p| p.label.eq_ignore_ascii_case(label))
    }

    /// Borrow a node by id.
    pub fn node(&self, id: NodeId) -> Option<&TrieNode<S>> {
        self.nodes.get(id)
    }
}

impl<S: Clone + Eq + fmt::Debug + fmt::Display> TrieMatcher<S> {
    /// Structural export for visualization.
    ///
    /// States are listed in depth-first pre-order from the root, following
    /// edges in declaration order. `path` concatenates the symbols that
    /// lead to a state.
    pub fn diagram_data(&self) -> TrieDiagram {
        let mut states = Vec::with_capacity(self.nodes.len());
        let mut transitions = Vec::with_capacity(self.nodes.len().saturating_sub(1));

        // Explicit stack of (node, path); children pushed in reverse so the
        // first declared edge is visited first.
        let mut pending = vec![(ROOT, String::new())];
        while let Some((id, path)) = pending.pop() {
            let node = &self.nodes[id];
            states.push(TrieDiagramState {
                id,
                is_accept: node.is_accept,
                label: node.label.clone(),
                path: path.clone(),
            });
            for (symbol, target) in &node.edges {
                transitions.push(TrieDiagramTransition {
                    from: id,
                    to: *target,
                    input: symbol.to_string(),
                });
            }
            for (symbol, target) in node.edges.iter().rev() {
                pending.push((*target, format!("{}{}", path, symbol)));
            }
        }

        TrieDiagram {
            states,
            transitions,
            initial_state: ROOT,
            total_states: self.nodes.len(),
        }
    }
}

/// A state in a [`TrieDiagram`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TrieDiagramState {
    /// Node id
    pub id: NodeId,
    /// Accept flag
    pub is_accept: bool,
    /// Label of the accept node
    pub label: Option<String>,
    /// Symbols leading here from the root
    pub path: String,
}

/// An edge in a [`TrieDiagram`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TrieDiagramTransition {
    /// Source node id
    pub from: NodeId,
    /// Target node id
    pub to: NodeId,
    /// Rendered input symbol
    pub input: String,
}

/// Structural export of a trie matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TrieDiagram {
    /// States in depth-first order
    pub states: Vec<TrieDiagramState>,
    /// All edges
    pub transitions: Vec<TrieDiagramTransition>,
    /// Root id
    pub initial_state: NodeId,
    /// Node count including the root
    pub total_states: usize,
}
