//! Configurable pushdown automaton.

use std::fmt;

use log::debug;

use super::error::{PdaError, Result};
use super::state::{PdaState, StackAction, StateId, StateKind, Transition};
use crate::stack::SymbolStack;

/// Marker trait for PDA input alphabets.
///
/// Any cloneable, comparable, printable type qualifies; the notation
/// validators use [`TokenKind`](crate::notation::TokenKind).
pub trait InputSymbol: Clone + Eq + fmt::Debug + fmt::Display {}

impl<T: Clone + Eq + fmt::Debug + fmt::Display> InputSymbol for T {}

/// Instantaneous description of the automaton, for trace and inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Configuration {
    /// State name
    pub state: String,
    /// Symbol about to be consumed, if any
    pub input: Option<String>,
    /// Stack from bottom to top
    pub stack: Vec<String>,
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stack: Vec<&str> = self.stack.iter().rev().map(String::as_str).collect();
        write!(
            f,
            "({}, {}, {})",
            self.state,
            self.input.as_deref().unwrap_or("ε"),
            stack.join("")
        )
    }
}

/// End-to-end result of [`PushdownAutomaton::process`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// True iff input ended in an `Accepting` state
    pub accepted: bool,
    /// Verdict or the first step error
    pub message: String,
    /// Pre-step snapshots, one per attempted step
    pub trace: Vec<Configuration>,
}

/// A pushdown automaton over input alphabet `S`.
///
/// States and guarded transitions are added at configuration time. At run
/// time each [`step`](Self::step) picks the first declared transition that
/// matches the current state, symbol and stack top, so declaration order is
/// part of the contract.
///
/// # Examples
///
/// ```
/// use libautomata::pda::{PushdownAutomaton, StackAction, StateKind};
///
/// // Balanced a^n b^n
/// let mut pda = PushdownAutomaton::new("anbn");
/// pda.add_state("q0", StateKind::Initial, "").unwrap();
/// pda.add_state("q1", StateKind::Normal, "").unwrap();
/// pda.add_state("acc", StateKind::Accepting, "").unwrap();
/// pda.add_transition("q0", "q0", Some('a'), None, StackAction::Push("A".into()), "").unwrap();
/// pda.add_transition("q0", "q1", Some('b'), Some("A"), StackAction::Pop, "").unwrap();
/// pda.add_transition("q1", "q1", Some('b'), Some("A"), StackAction::Pop, "").unwrap();
/// pda.add_transition("q1", "acc", Some('$'), Some("Z0"), StackAction::None, "").unwrap();
///
/// assert!(pda.process("aabb$".chars()).accepted);
/// assert!(!pda.process("aab$".chars()).accepted);
/// ```
#[derive(Clone, Debug)]
pub struct PushdownAutomaton<S> {
    name: String,
    states: Vec<PdaState>,
    transitions: Vec<Transition<S>>,
    initial: Option<StateId>,
    error_state: Option<StateId>,
    current: Option<StateId>,
    stack: SymbolStack,
    input_alphabet: Vec<S>,
    stack_alphabet: Vec<String>,
    execution_history: Vec<Configuration>,
    transition_history: Vec<usize>,
}

impl<S: InputSymbol> PushdownAutomaton<S> {
    /// Create an automaton with no states.
    pub fn new(name: impl Into<String>) -> Self {
        let stack = SymbolStack::new();
        let stack_alphabet = vec![stack.bottom().to_string()];
        Self {
            name: name.into(),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            error_state: None,
            current: None,
            stack,
            input_alphabet: Vec::new(),
            stack_alphabet,
            execution_history: Vec::new(),
            transition_history: Vec::new(),
        }
    }

    /// Automaton name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a state.
    ///
    /// The first `Error` state becomes the designated error state. Adding
    /// the `Initial` state also places the automaton in it.
    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        kind: StateKind,
        description: impl Into<String>,
    ) -> Result<StateId> {
        let name = name.into();
        if self.state_id(&name).is_some() {
            return Err(PdaError::DuplicateState(name));
        }

        if let (StateKind::Initial, Some(existing)) = (kind, self.initial) {
            return Err(PdaError::MultipleInitialStates {
                existing: self.states[existing].name.clone(),
                incoming: name,
            });
        }
        Ok(self.insert_state(name, kind, description))
    }

    /// Add a state without name or initial-state checks.
    ///
    /// Used by fixed tables whose well-formedness is known up front. A second
    /// `Initial` state is stored but never becomes the initial state.
    pub(crate) fn insert_state(
        &mut self,
        name: impl Into<String>,
        kind: StateKind,
        description: impl Into<String>,
    ) -> StateId {
        let id = self.states.len();
        match kind {
            StateKind::Initial if self.initial.is_none() => {
                self.initial = Some(id);
                self.current = Some(id);
            }
            StateKind::Error => {
                self.error_state.get_or_insert(id);
            }
            _ => {}
        }
        self.states.push(PdaState {
            name: name.into(),
            kind,
            description: description.into(),
        });
        id
    }

    /// Add a guarded transition between two existing states.
    ///
    /// Returns the transition's index in declaration order.
    pub fn add_transition(
        &mut self,
        from: &str,
        to: &str,
        input: Option<S>,
        stack_top: Option<&str>,
        action: StackAction,
        description: impl Into<String>,
    ) -> Result<usize> {
        let from = self
            .state_id(from)
            .ok_or_else(|| PdaError::UnknownState(from.to_string()))?;
        let to = self
            .state_id(to)
            .ok_or_else(|| PdaError::UnknownState(to.to_string()))?;
        Ok(self.insert_transition(from, to, input, stack_top, action, description))
    }

    /// Add a transition between state ids returned by `insert_state`.
    pub(crate) fn insert_transition(
        &mut self,
        from: StateId,
        to: StateId,
        input: Option<S>,
        stack_top: Option<&str>,
        action: StackAction,
        description: impl Into<String>,
    ) -> usize {
        if let Some(symbol) = &input {
            if !self.input_alphabet.contains(symbol) {
                self.input_alphabet.push(symbol.clone());
            }
        }
        for symbol in stack_top.into_iter().chain(action.written_symbol()) {
            if !self.stack_alphabet.iter().any(|s| s == symbol) {
                self.stack_alphabet.push(symbol.to_string());
            }
        }

        self.transitions.push(Transition {
            from,
            to,
            input,
            stack_top: stack_top.map(str::to_string),
            action,
            description: description.into(),
        });
        self.transitions.len() - 1
    }

    /// Return to the initial state with a bare stack and empty histories.
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.stack.clear();
        self.execution_history.clear();
        self.transition_history.clear();
    }

    fn find_transition(&self, state: StateId, input: Option<&S>) -> Option<usize> {
        let top = self.stack.peek();
        self.transitions
            .iter()
            .position(|t| t.matches(state, input, top))
    }

    /// Consume one input symbol.
    ///
    /// Records a pre-step snapshot, then fires the first matching transition.
    /// If nothing matches the symbol, wildcard-input transitions are tried
    /// on their own. On failure the automaton moves to the designated error
    /// state (if any) and the stack is left untouched.
    pub fn step(&mut self, symbol: S) -> Result<()> {
        let state = self.current.ok_or(PdaError::NoInitialState)?;
        self.execution_history.push(Configuration {
            state: self.states[state].name.clone(),
            input: Some(symbol.to_string()),
            stack: self.stack.contents(),
        });

        let Some(index) = self
            .find_transition(state, Some(&symbol))
            .or_else(|| self.find_transition(state, None))
        else {
            let err = PdaError::NoTransition {
                symbol: symbol.to_string(),
                state: self.states[state].name.clone(),
            };
            self.enter_error_state();
            debug!("[{}] {}", self.name, err);
            return Err(err);
        };

        let transition = &self.transitions[index];
        if transition.action.needs_symbol() && self.stack.is_empty() {
            let err = PdaError::StackAction {
                action: transition.action.to_string(),
                state: self.states[state].name.clone(),
            };
            self.enter_error_state();
            debug!("[{}] {}", self.name, err);
            return Err(err);
        }

        let to = transition.to;
        match transition.action.clone() {
            StackAction::None => {}
            StackAction::Push(symbol) => self.stack.push(symbol),
            StackAction::Pop => {
                self.stack.pop();
            }
            StackAction::Replace(symbol) => {
                self.stack.pop();
                self.stack.push(symbol);
            }
        }

        debug!(
            "[{}] {} --{}--> {} stack={}",
            self.name, self.states[state].name, symbol, self.states[to].name, self.stack
        );
        self.current = Some(to);
        self.transition_history.push(index);
        Ok(())
    }

    fn enter_error_state(&mut self) {
        if let Some(error) = self.error_state {
            self.current = Some(error);
        }
    }

    /// Reset, step through `input`, and classify the final state.
    ///
    /// Stops at the first failed step. Only the kind of the state reached at
    /// end of input decides acceptance.
    pub fn process<I>(&mut self, input: I) -> ProcessOutcome
    where
        I: IntoIterator<Item = S>,
    {
        self.reset();
        for symbol in input {
            if let Err(err) = self.step(symbol) {
                return ProcessOutcome {
                    accepted: false,
                    message: err.to_string(),
                    trace: self.execution_history.clone(),
                };
            }
        }

        let (accepted, message) = match self.current_state() {
            Some(state) => match state.kind {
                StateKind::Accepting => (true, "Input accepted".to_string()),
                StateKind::Error => (false, "Ended in error state".to_string()),
                StateKind::Initial | StateKind::Normal => (
                    false,
                    format!("Ended in non-accepting state '{}'", state.name),
                ),
            },
            None => (false, PdaError::NoInitialState.to_string()),
        };
        ProcessOutcome {
            accepted,
            message,
            trace: self.execution_history.clone(),
        }
    }

    /// True if the current state has kind `Accepting`.
    pub fn is_accepting(&self) -> bool {
        self.current_state()
            .is_some_and(|s| s.kind == StateKind::Accepting)
    }

    /// Current state, if an initial state was configured.
    pub fn current_state(&self) -> Option<&PdaState> {
        self.current.map(|id| &self.states[id])
    }

    /// Snapshot of the current state and stack.
    pub fn current_configuration(&self) -> Option<Configuration> {
        self.current_state().map(|state| Configuration {
            state: state.name.clone(),
            input: None,
            stack: self.stack.contents(),
        })
    }

    /// Pre-step snapshots since the last reset.
    pub fn execution_history(&self) -> &[Configuration] {
        &self.execution_history
    }

    /// Transitions fired since the last reset, in order.
    pub fn transition_history(&self) -> Vec<&Transition<S>> {
        self.transition_history
            .iter()
            .map(|&i| &self.transitions[i])
            .collect()
    }

    /// The automaton's stack.
    pub fn stack(&self) -> &SymbolStack {
        &self.stack
    }

    /// Look up a state id by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.states.iter().position(|s| s.name == name)
    }

    /// Look up a state by name.
    pub fn state(&self, name: &str) -> Option<&PdaState> {
        self.state_id(name).map(|id| &self.states[id])
    }

    /// All states in insertion order.
    pub fn states(&self) -> &[PdaState] {
        &self.states
    }

    /// All transitions in declaration order.
    pub fn transitions(&self) -> &[Transition<S>] {
        &self.transitions
    }

    /// The initial state, if added.
    pub fn initial_state(&self) -> Option<&PdaState> {
        self.initial.map(|id| &self.states[id])
    }

    /// The designated error state, if any.
    pub fn error_state(&self) -> Option<&PdaState> {
        self.error_state.map(|id| &self.states[id])
    }

    /// Input symbols used by transitions, in first-use order.
    pub fn input_alphabet(&self) -> &[S] {
        &self.input_alphabet
    }

    /// Stack symbols, bottom marker first.
    pub fn stack_alphabet(&self) -> &[String] {
        &self.stack_alphabet
    }
}

impl<S> fmt::Display for PushdownAutomaton<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PDA '{}': {} states, {} transitions",
            self.name,
            self.states.len(),
            self.transitions.len()
        )
    }
}
