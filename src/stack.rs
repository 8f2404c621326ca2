//! LIFO symbol stack with a permanent bottom marker.
//!
//! This is the stack a pushdown automaton owns. The bottom marker (`Z0` by
//! default) is pushed at construction and can never be popped, so "empty"
//! always means "only the marker remains".

use std::fmt;

/// Default bottom-of-stack marker.
pub const BOTTOM_MARKER: &str = "Z0";

/// A single recorded stack mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum StackOp {
    /// A symbol was pushed
    Push(String),
    /// A symbol was popped
    Pop(String),
}

impl fmt::Display for StackOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(symbol) => write!(f, "push:{}", symbol),
            Self::Pop(symbol) => write!(f, "pop:{}", symbol),
        }
    }
}

/// Stack of symbols with a permanent bottom marker.
///
/// Uses a Vec for O(1) amortized push/pop. Every successful mutation is
/// appended to an operation history that [`SymbolStack::clear`] discards.
///
/// # Examples
///
/// ```
/// use libautomata::stack::SymbolStack;
///
/// let mut stack = SymbolStack::new();
/// assert!(stack.is_empty());
///
/// stack.push("(");
/// assert_eq!(stack.peek(), Some("("));
/// assert_eq!(stack.pop().as_deref(), Some("("));
///
/// // Popping the marker is refused, not an error
/// assert_eq!(stack.pop(), None);
/// assert!(stack.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolStack {
    /// Stack contents, bottom marker at index 0
    symbols: Vec<String>,
    /// Successful mutations since the last clear
    history: Vec<StackOp>,
}

impl SymbolStack {
    /// Create a stack holding only the default bottom marker.
    pub fn new() -> Self {
        Self::with_bottom(BOTTOM_MARKER)
    }

    /// Create a stack with a custom bottom marker.
    pub fn with_bottom(marker: impl Into<String>) -> Self {
        Self {
            symbols: vec![marker.into()],
            history: Vec::new(),
        }
    }

    /// The bottom marker symbol.
    pub fn bottom(&self) -> &str {
        &self.symbols[0]
    }

    /// Push a symbol onto the stack.
    pub fn push(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        self.history.push(StackOp::Push(symbol.clone()));
        self.symbols.push(symbol);
    }

    /// Pop and return the top symbol.
    ///
    /// Returns `None` and leaves the stack untouched if only the bottom
    /// marker remains. Callers must check.
    pub fn pop(&mut self) -> Option<String> {
        if self.symbols.len() <= 1 {
            return None;
        }
        let symbol = self.symbols.pop()?;
        self.history.push(StackOp::Pop(symbol.clone()));
        Some(symbol)
    }

    /// Return the top symbol without removing it.
    ///
    /// On an empty stack this is the bottom marker, which lets stack-top
    /// guards test for it.
    pub fn peek(&self) -> Option<&str> {
        self.symbols.last().map(String::as_str)
    }

    /// True iff only the bottom marker remains.
    pub fn is_empty(&self) -> bool {
        self.symbols.len() <= 1
    }

    /// Number of symbols above the bottom marker.
    pub fn len(&self) -> usize {
        self.symbols.len() - 1
    }

    /// Reset to the bottom marker alone and drop the history.
    pub fn clear(&mut self) {
        self.symbols.truncate(1);
        self.history.clear();
    }

    /// Stack contents from bottom to top, marker included.
    pub fn contents(&self) -> Vec<String> {
        self.symbols.clone()
    }

    /// Iterate over the contents from bottom to top, marker included.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.symbols.iter().map(String::as_str)
    }

    /// Operations performed since construction or the last clear.
    pub fn history(&self) -> &[StackOp] {
        &self.history
    }
}

impl Default for SymbolStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.symbols.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stack_is_empty() {
        let stack = SymbolStack::new();
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
        assert_eq!(stack.peek(), Some(BOTTOM_MARKER));
        assert_eq!(stack.contents(), vec!["Z0".to_string()]);
    }

    #[test]
    fn test_push_pop() {
        let mut stack = SymbolStack::new();
        stack.push("X");
        stack.push("Y");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().as_deref(), Some("Y"));
        assert_eq!(stack.pop().as_deref(), Some("X"));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_pop_on_empty_keeps_marker() {
        let mut stack = SymbolStack::new();
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
        assert_eq!(stack.bottom(), "Z0");
        assert!(stack.history().is_empty());
    }

    #[test]
    fn test_history_and_clear() {
        let mut stack = SymbolStack::new();
        stack.push("(");
        stack.pop();
        assert_eq!(
            stack.history(),
            &[StackOp::Push("(".to_string()), StackOp::Pop("(".to_string())]
        );

        stack.push("(");
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.history().is_empty());
    }

    #[test]
    fn test_custom_bottom() {
        let mut stack = SymbolStack::with_bottom("$");
        stack.push("a");
        assert_eq!(stack.to_string(), "[$, a]");
        assert_eq!(stack.iter().collect::<Vec<_>>(), vec!["$", "a"]);
    }
}
