//! PDA-backed validators for the three notations.
//!
//! Infix validity is decided by state transitions plus a parenthesis stack.
//! Postfix and prefix validity is decided by operand counting: each operand
//! pushes a marker, each operator needs two operands and leaves one. Prefix
//! runs the same discipline over the reversed token stream.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use super::token::{tokenize_infix, tokenize_spaced, ExprToken, TokenKind};
use super::Notation;
use crate::pda::{PushdownAutomaton, StackAction, StateKind};

/// Name of the state reported when validation fails outside the automaton.
pub const ERROR_STATE: &str = "q_error";
/// Name of the state reported when a counting validator accepts.
pub const ACCEPT_STATE: &str = "q_accept";

/// One consumed token in a validation trace.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TraceStep {
    /// Token text
    pub token: String,
    /// Token class fed to the automaton
    pub kind: TokenKind,
    /// State before the step
    pub from_state: String,
    /// State after the step
    pub to_state: String,
    /// Live operand count, for counting validators
    pub operands: Option<usize>,
    /// Stack after the step, bottom first
    pub stack: Vec<String>,
    /// True when tokens are scanned right to left
    pub right_to_left: bool,
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token: '{}' ({})", self.token, self.kind)?;
        if self.right_to_left {
            f.write_str(" [R→L]")?;
        }
        match self.operands {
            Some(count) => write!(f, " | Operands: {}", count)?,
            None => write!(f, " | State: {} → {}", self.from_state, self.to_state)?,
        }
        write!(f, " | Stack: [{}]", self.stack.join(", "))
    }
}

/// Verdict of validating one expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ValidationResult {
    /// True if the expression is well formed
    pub is_valid: bool,
    /// Notation checked
    pub notation: Notation,
    /// Verdict; never empty
    pub message: String,
    /// Steps taken before the verdict
    pub trace: Vec<TraceStep>,
    /// Last state name
    pub final_state: String,
}

impl ValidationResult {
    fn rejected(notation: Notation, message: impl Into<String>, trace: Vec<TraceStep>) -> Self {
        Self {
            is_valid: false,
            notation,
            message: message.into(),
            trace,
            final_state: ERROR_STATE.to_string(),
        }
    }

    /// Trace rendered one line per step.
    pub fn trace_lines(&self) -> Vec<String> {
        if self.trace.is_empty() && self.message == EMPTY_EXPRESSION {
            return vec!["No tokens to process".to_string()];
        }
        self.trace.iter().map(ToString::to_string).collect()
    }
}

const EMPTY_EXPRESSION: &str = "Empty expression";

/// Reject empty input and tokens outside the alphabet before any step runs.
fn precheck(notation: Notation, tokens: &[ExprToken]) -> Option<ValidationResult> {
    if tokens.is_empty() {
        return Some(ValidationResult::rejected(notation, EMPTY_EXPRESSION, Vec::new()));
    }
    if let Some(bad) = tokens.iter().find(|t| t.kind == TokenKind::Invalid) {
        return Some(ValidationResult::rejected(
            notation,
            format!("Invalid token: {}", bad.text),
            Vec::new(),
        ));
    }
    if notation != Notation::Infix && tokens.iter().any(ExprToken::is_paren) {
        return Some(ValidationResult::rejected(
            notation,
            format!("Parentheses not allowed in {} notation", notation),
            Vec::new(),
        ));
    }
    None
}

fn state_name(pda: &PushdownAutomaton<TokenKind>) -> String {
    pda.current_state()
        .map_or_else(|| ERROR_STATE.to_string(), |s| s.name.clone())
}

/// Infix validator.
///
/// | from | input | stack top | to | action |
/// |------|-------|-----------|----|--------|
/// | `q_start` | OPERAND | any | `q_expect_operator` | none |
/// | `q_start` | LPAREN | any | `q_expect_operand` | push `(` |
/// | `q_expect_operand` | OPERAND | any | `q_expect_operator` | none |
/// | `q_expect_operand` | LPAREN | any | `q_expect_operand` | push `(` |
/// | `q_expect_operator` | OPERATOR | any | `q_expect_operand` | none |
/// | `q_expect_operator` | RPAREN | `(` | `q_expect_operator` | pop |
///
/// Accepts when input ends in `q_expect_operator` with an empty stack.
#[derive(Debug, Clone)]
pub struct InfixValidator {
    pda: PushdownAutomaton<TokenKind>,
}

impl InfixValidator {
    const EXPECT_OPERATOR: &'static str = "q_expect_operator";

    /// Build the infix automaton.
    pub fn new() -> Self {
        let mut pda = PushdownAutomaton::new("Infix Validator PDA");
        let start = pda.insert_state(
            "q_start",
            StateKind::Initial,
            "Initial state - expecting operand or '('",
        );
        let operand = pda.insert_state(
            "q_expect_operand",
            StateKind::Normal,
            "Expecting an operand (number) or '('",
        );
        let operator = pda.insert_state(
            Self::EXPECT_OPERATOR,
            StateKind::Normal,
            "Expecting an operator or ')' or end",
        );
        pda.insert_state("q_accept", StateKind::Accepting, "Expression accepted");
        pda.insert_state(ERROR_STATE, StateKind::Error, "Invalid expression");

        let open = || StackAction::Push("(".to_string());
        pda.insert_transition(
            start,
            operator,
            Some(TokenKind::Operand),
            None,
            StackAction::None,
            "Read operand, expect operator next",
        );
        pda.insert_transition(
            start,
            operand,
            Some(TokenKind::LParen),
            None,
            open(),
            "Read '(', push to stack, expect operand",
        );
        pda.insert_transition(
            operand,
            operator,
            Some(TokenKind::Operand),
            None,
            StackAction::None,
            "Read operand, expect operator next",
        );
        pda.insert_transition(
            operand,
            operand,
            Some(TokenKind::LParen),
            None,
            open(),
            "Read '(', push to stack, still expect operand",
        );
        pda.insert_transition(
            operator,
            operand,
            Some(TokenKind::Operator),
            None,
            StackAction::None,
            "Read operator, expect operand next",
        );
        pda.insert_transition(
            operator,
            operator,
            Some(TokenKind::RParen),
            Some("("),
            StackAction::Pop,
            "Read ')', pop matching '(' from stack",
        );

        Self { pda }
    }

    /// Validate an infix expression.
    pub fn validate(&mut self, expression: &str) -> ValidationResult {
        self.pda.reset();
        let tokens = tokenize_infix(expression);
        if let Some(rejected) = precheck(Notation::Infix, &tokens) {
            return rejected;
        }

        let mut trace = Vec::with_capacity(tokens.len());
        for token in &tokens {
            let from_state = state_name(&self.pda);
            let stepped = self.pda.step(token.kind);
            trace.push(TraceStep {
                token: token.text.clone(),
                kind: token.kind,
                from_state,
                to_state: state_name(&self.pda),
                operands: None,
                stack: self.pda.stack().contents(),
                right_to_left: false,
            });

            if let Err(err) = stepped {
                debug!("Infix rejected at '{}': {}", token.text, err);
                return ValidationResult {
                    is_valid: false,
                    notation: Notation::Infix,
                    message: err.to_string(),
                    trace,
                    final_state: state_name(&self.pda),
                };
            }
        }

        let final_state = state_name(&self.pda);
        let stack_empty = self.pda.stack().is_empty();
        let (is_valid, message) = if final_state == Self::EXPECT_OPERATOR && stack_empty {
            (true, "Valid infix expression".to_string())
        } else if !stack_empty {
            (false, "Unmatched opening parenthesis".to_string())
        } else {
            (
                false,
                format!("Expression incomplete - ended in state {}", final_state),
            )
        };

        ValidationResult {
            is_valid,
            notation: Notation::Infix,
            message,
            trace,
            final_state,
        }
    }

    /// The underlying automaton.
    pub fn pda(&self) -> &PushdownAutomaton<TokenKind> {
        &self.pda
    }
}

impl Default for InfixValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Operand-counting validator shared by postfix and prefix.
#[derive(Debug, Clone)]
struct CountingValidator {
    notation: Notation,
    pda: PushdownAutomaton<TokenKind>,
}

impl CountingValidator {
    fn new(notation: Notation) -> Self {
        let right_to_left = notation == Notation::Prefix;
        let name = if right_to_left {
            "Prefix Validator PDA"
        } else {
            "Postfix Validator PDA"
        };
        let mut pda = PushdownAutomaton::new(name);
        let start = pda.insert_state(
            "q_start",
            StateKind::Initial,
            if right_to_left {
                "Initial state - process from right"
            } else {
                "Initial state - expecting first token"
            },
        );
        let processing = pda.insert_state(
            "q_processing",
            StateKind::Normal,
            if right_to_left {
                "Processing tokens right-to-left"
            } else {
                "Processing tokens"
            },
        );
        pda.insert_state(ACCEPT_STATE, StateKind::Accepting, "Expression accepted");
        pda.insert_state(ERROR_STATE, StateKind::Error, "Invalid expression");

        let marker = || StackAction::Push("X".to_string());
        pda.insert_transition(
            start,
            processing,
            Some(TokenKind::Operand),
            None,
            marker(),
            "Read first operand, push marker",
        );
        pda.insert_transition(
            processing,
            processing,
            Some(TokenKind::Operand),
            None,
            marker(),
            "Read operand, push marker",
        );
        pda.insert_transition(
            processing,
            processing,
            Some(TokenKind::Operator),
            Some("X"),
            StackAction::Pop,
            "Read operator, two operands become one result",
        );

        Self { notation, pda }
    }

    fn validate(&mut self, expression: &str) -> ValidationResult {
        self.pda.reset();
        let mut tokens = tokenize_spaced(expression);
        if let Some(rejected) = precheck(self.notation, &tokens) {
            return rejected;
        }

        let right_to_left = self.notation == Notation::Prefix;
        if right_to_left {
            tokens.reverse();
        }

        let mut operands = 0usize;
        let mut trace = Vec::with_capacity(tokens.len());
        for token in &tokens {
            if token.kind == TokenKind::Operator {
                if operands < 2 {
                    return ValidationResult::rejected(
                        self.notation,
                        format!("Not enough operands for operator '{}'", token.text),
                        trace,
                    );
                }
                operands -= 1;
            } else {
                operands += 1;
            }

            let from_state = state_name(&self.pda);
            if let Err(err) = self.pda.step(token.kind) {
                return ValidationResult::rejected(self.notation, err.to_string(), trace);
            }
            trace.push(TraceStep {
                token: token.text.clone(),
                kind: token.kind,
                from_state,
                to_state: state_name(&self.pda),
                operands: Some(operands),
                stack: self.pda.stack().contents(),
                right_to_left,
            });
        }

        match operands {
            1 => ValidationResult {
                is_valid: true,
                notation: self.notation,
                message: format!("Valid {} expression", self.notation),
                trace,
                final_state: ACCEPT_STATE.to_string(),
            },
            0 => ValidationResult::rejected(
                self.notation,
                "No result - expression is incomplete",
                trace,
            ),
            n => {
                debug!("{} expression left {} operands", self.notation, n);
                ValidationResult::rejected(
                    self.notation,
                    format!("Too many operands ({}) - missing operators", n),
                    trace,
                )
            }
        }
    }
}

macro_rules! counting_validator {
    ($(#[$doc:meta])* $name:ident, $notation:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name(CountingValidator);

        impl $name {
            /// Build the automaton.
            pub fn new() -> Self {
                Self(CountingValidator::new($notation))
            }

            /// Validate a whitespace-separated expression.
            pub fn validate(&mut self, expression: &str) -> ValidationResult {
                self.0.validate(expression)
            }

            /// The underlying automaton.
            pub fn pda(&self) -> &PushdownAutomaton<TokenKind> {
                &self.0.pda
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

counting_validator!(
    /// Postfix (reverse Polish) validator, scanning left to right.
    PostfixValidator,
    Notation::Postfix
);

counting_validator!(
    /// Prefix (Polish) validator, scanning the reversed token stream.
    PrefixValidator,
    Notation::Prefix
);

/// Facade over the three validators.
#[derive(Debug, Clone, Default)]
pub struct ExpressionValidator {
    infix: InfixValidator,
    postfix: PostfixValidator,
    prefix: PrefixValidator,
}

impl ExpressionValidator {
    /// Build all three automata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `expression` as `notation`.
    pub fn validate(&mut self, expression: &str, notation: Notation) -> ValidationResult {
        let result = match notation {
            Notation::Infix => self.infix.validate(expression),
            Notation::Postfix => self.postfix.validate(expression),
            Notation::Prefix => self.prefix.validate(expression),
        };
        debug!(
            "validate {} {:?}: {} ({})",
            notation, expression, result.is_valid, result.message
        );
        result
    }

    /// Validate `expression` against every notation.
    pub fn validate_all(&mut self, expression: &str) -> BTreeMap<Notation, ValidationResult> {
        Notation::ALL
            .iter()
            .map(|&notation| (notation, self.validate(expression, notation)))
            .collect()
    }

    /// Automaton used for `notation`, for diagram export.
    pub fn pda(&self, notation: Notation) -> &PushdownAutomaton<TokenKind> {
        match notation {
            Notation::Infix => self.infix.pda(),
            Notation::Postfix => self.postfix.pda(),
            Notation::Prefix => self.prefix.pda(),
        }
    }
}

/// Validate an infix expression with a fresh validator.
pub fn validate_infix(expression: &str) -> ValidationResult {
    InfixValidator::new().validate(expression)
}

/// Validate a postfix expression with a fresh validator.
pub fn validate_postfix(expression: &str) -> ValidationResult {
    PostfixValidator::new().validate(expression)
}

/// Validate a prefix expression with a fresh validator.
pub fn validate_prefix(expression: &str) -> ValidationResult {
    PrefixValidator::new().validate(expression)
}

/// Validate `expression` as `notation` with a fresh validator.
pub fn validate(expression: &str, notation: Notation) -> ValidationResult {
    match notation {
        Notation::Infix => validate_infix(expression),
        Notation::Postfix => validate_postfix(expression),
        Notation::Prefix => validate_prefix(expression),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infix_valid() {
        let result = validate_infix("(3+4)*2");
        assert!(result.is_valid, "{}", result.message);
        assert_eq!(result.message, "Valid infix expression");
        assert_eq!(result.trace.len(), 7);
        assert_eq!(result.final_state, "q_expect_operator");
    }

    #[test]
    fn test_infix_trace_line() {
        let result = validate_infix("(3");
        assert_eq!(
            result.trace_lines()[0],
            "Token: '(' (LPAREN) | State: q_start → q_expect_operand | Stack: [Z0, (]"
        );
    }

    #[test]
    fn test_infix_unmatched_open() {
        let result = validate_infix("(3+4");
        assert!(!result.is_valid);
        assert_eq!(result.message, "Unmatched opening parenthesis");
    }

    #[test]
    fn test_infix_unmatched_close() {
        let result = validate_infix("3+4)");
        assert!(!result.is_valid);
        assert_eq!(
            result.message,
            "No valid transition for 'RPAREN' in state 'q_expect_operator'"
        );
        assert_eq!(result.final_state, "q_error");
    }

    #[test]
    fn test_infix_incomplete() {
        let result = validate_infix("3+");
        assert_eq!(
            result.message,
            "Expression incomplete - ended in state q_expect_operand"
        );
    }

    #[test]
    fn test_infix_invalid_token_rejected_before_steps() {
        let result = validate_infix("3+x");
        assert_eq!(result.message, "Invalid token: x");
        assert!(result.trace.is_empty());
    }

    #[test]
    fn test_empty_expression() {
        for notation in Notation::ALL {
            let result = validate("  ", notation);
            assert!(!result.is_valid);
            assert_eq!(result.message, "Empty expression");
            assert_eq!(result.trace_lines(), vec!["No tokens to process"]);
        }
    }

    #[test]
    fn test_postfix_messages() {
        assert!(validate_postfix("3 4 +").is_valid);
        assert_eq!(
            validate_postfix("3 4").message,
            "Too many operands (2) - missing operators"
        );
        assert_eq!(
            validate_postfix("+").message,
            "Not enough operands for operator '+'"
        );
        assert_eq!(
            validate_postfix("( 3 )").message,
            "Parentheses not allowed in postfix notation"
        );
    }

    #[test]
    fn test_postfix_trace() {
        let result = validate_postfix("3 4 +");
        assert_eq!(
            result.trace_lines(),
            vec![
                "Token: '3' (OPERAND) | Operands: 1 | Stack: [Z0, X]",
                "Token: '4' (OPERAND) | Operands: 2 | Stack: [Z0, X, X]",
                "Token: '+' (OPERATOR) | Operands: 1 | Stack: [Z0, X]",
            ]
        );
        assert_eq!(result.final_state, "q_accept");
    }

    #[test]
    fn test_prefix_scans_right_to_left() {
        let result = validate_prefix("* + 3 4 2");
        assert!(result.is_valid);
        assert_eq!(result.message, "Valid prefix expression");
        assert_eq!(result.trace[0].token, "2");
        assert!(result.trace_lines()[0].contains("[R→L]"));
    }

    #[test]
    fn test_prefix_rejects_postfix_order() {
        let result = validate_prefix("3 4 +");
        assert!(!result.is_valid);
        assert_eq!(result.message, "Not enough operands for operator '+'");
    }

    #[test]
    fn test_validate_all() {
        let mut validator = ExpressionValidator::new();
        let results = validator.validate_all("3 4 +");
        assert!(!results[&Notation::Infix].is_valid);
        assert!(results[&Notation::Postfix].is_valid);
        assert!(!results[&Notation::Prefix].is_valid);
    }

    #[test]
    fn test_pda_export() {
        let validator = ExpressionValidator::new();
        let infix = validator.pda(Notation::Infix);
        assert_eq!(infix.states().len(), 5);
        assert_eq!(infix.transitions().len(), 6);
        assert_eq!(validator.pda(Notation::Prefix).name(), "Prefix Validator PDA");
    }
}
