//! Structural export of a pushdown automaton for visualization.

use super::automaton::{InputSymbol, PushdownAutomaton};
use super::state::StateKind;

/// A state in a [`PdaDiagram`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DiagramState {
    /// State name
    pub name: String,
    /// Acceptance role
    pub kind: StateKind,
    /// Human-readable description
    pub description: String,
    /// True for the initial state
    pub is_initial: bool,
    /// True for `Accepting` states
    pub is_accepting: bool,
}

/// A transition in a [`PdaDiagram`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DiagramTransition {
    /// Source state name
    pub from: String,
    /// Target state name
    pub to: String,
    /// Input symbol, or `ε` for wildcard
    pub input: String,
    /// Stack-top guard, or `any`
    pub stack_top: String,
    /// Rendered stack action
    pub action: String,
    /// Edge label: `input, top → action`
    pub label: String,
}

/// Structural export of a [`PushdownAutomaton`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PdaDiagram {
    /// Automaton name
    pub name: String,
    /// States in insertion order
    pub states: Vec<DiagramState>,
    /// Transitions in declaration order
    pub transitions: Vec<DiagramTransition>,
    /// Rendered input symbols
    pub input_alphabet: Vec<String>,
    /// Stack symbols, bottom marker first
    pub stack_alphabet: Vec<String>,
}

impl<S: InputSymbol> PushdownAutomaton<S> {
    /// Export states, transitions and alphabets.
    pub fn diagram_data(&self) -> PdaDiagram {
        let initial = self.initial_state().map(|s| s.name.as_str());
        let states = self
            .states()
            .iter()
            .map(|state| DiagramState {
                name: state.name.clone(),
                kind: state.kind,
                description: state.description.clone(),
                is_initial: Some(state.name.as_str()) == initial,
                is_accepting: state.kind == StateKind::Accepting,
            })
            .collect();

        let transitions = self
            .transitions()
            .iter()
            .map(|t| {
                let input = t
                    .input
                    .as_ref()
                    .map_or_else(|| "ε".to_string(), ToString::to_string);
                let stack_top = t.stack_top.clone().unwrap_or_else(|| "any".to_string());
                let action = t.action.to_string();
                DiagramTransition {
                    from: self.states()[t.from].name.clone(),
                    to: self.states()[t.to].name.clone(),
                    label: format!("{}, {} → {}", input, stack_top, action),
                    input,
                    stack_top,
                    action,
                }
            })
            .collect();

        PdaDiagram {
            name: self.name().to_string(),
            states,
            transitions,
            input_alphabet: self.input_alphabet().iter().map(ToString::to_string).collect(),
            stack_alphabet: self.stack_alphabet().to_vec(),
        }
    }
}
