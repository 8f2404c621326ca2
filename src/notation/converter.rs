//! Conversion between infix, postfix and prefix.
//!
//! Every conversion validates its source first. Infix sources go through
//! Shunting-yard (mirrored for prefix), postfix and prefix sources are
//! rebuilt into fully parenthesised infix with a value stack, and
//! postfix↔prefix is routed through infix.

use std::collections::BTreeMap;

use log::debug;

use super::operator::OperatorTable;
use super::token::{render_tokens, tokenize_infix, tokenize_spaced, ExprToken, TokenKind};
use super::validator::ExpressionValidator;
use super::Notation;

/// Outcome of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ConversionResult {
    /// True if `result_expression` is present
    pub success: bool,
    /// Source notation
    pub source: Notation,
    /// Target notation
    pub target: Notation,
    /// Input as given
    pub source_expression: String,
    /// Converted expression
    pub result_expression: Option<String>,
    /// Human-readable steps
    pub steps: Vec<String>,
    /// Failure reason
    pub error_message: Option<String>,
}

impl ConversionResult {
    fn succeeded(
        source: Notation,
        target: Notation,
        expression: &str,
        result: String,
        steps: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            source,
            target,
            source_expression: expression.to_string(),
            result_expression: Some(result),
            steps,
            error_message: None,
        }
    }

    fn failed(
        source: Notation,
        target: Notation,
        expression: &str,
        message: String,
        steps: Vec<String>,
    ) -> Self {
        Self {
            success: false,
            source,
            target,
            source_expression: expression.to_string(),
            result_expression: None,
            steps,
            error_message: Some(message),
        }
    }
}

/// Converter between the three notations.
///
/// # Examples
///
/// ```
/// use libautomata::notation::{ExpressionConverter, Notation};
///
/// let mut converter = ExpressionConverter::new();
/// let result = converter.convert("(3+4)*2", Notation::Infix, Notation::Prefix);
/// assert_eq!(result.result_expression.as_deref(), Some("* + 3 4 2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExpressionConverter {
    validator: ExpressionValidator,
    operators: OperatorTable,
}

impl ExpressionConverter {
    /// Converter with the default operator table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter with a custom operator table.
    ///
    /// The tokenizer still only recognises `+ - * /`; the table changes
    /// how they group.
    pub fn with_operators(operators: OperatorTable) -> Self {
        Self {
            validator: ExpressionValidator::new(),
            operators,
        }
    }

    /// The operator table in use.
    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Validate the source, returning a failed result if it is rejected.
    fn validate_source(
        &mut self,
        expression: &str,
        source: Notation,
        target: Notation,
    ) -> Option<ConversionResult> {
        let validation = self.validator.validate(expression, source);
        if validation.is_valid {
            return None;
        }
        let mut steps = vec![format!("Validation failed: {}", validation.message)];
        steps.extend(validation.trace_lines());
        Some(ConversionResult::failed(
            source,
            target,
            expression,
            validation.message,
            steps,
        ))
    }

    /// Shunting-yard over `tokens`.
    ///
    /// With `mirrored` set, an incoming operator only pops operators of
    /// strictly greater precedence (or equal precedence when it is
    /// right-associative), which is the rule for a reversed stream.
    fn shunting_yard(
        &self,
        tokens: &[ExprToken],
        mirrored: bool,
        steps: &mut Vec<String>,
    ) -> Vec<String> {
        let mut output: Vec<String> = Vec::with_capacity(tokens.len());
        let mut stack: Vec<String> = Vec::new();

        for token in tokens {
            let text = token.text.as_str();
            match token.kind {
                TokenKind::Operand => {
                    output.push(token.text.clone());
                    steps.push(format!(
                        "Operand '{}' → Output: {}, Stack: {}",
                        text,
                        render_tokens(&output),
                        render_tokens(&stack)
                    ));
                }
                TokenKind::Operator => {
                    let incoming = self.operators.precedence(text);
                    let left = self.operators.is_left_associative(text);
                    while let Some(top) = stack.last() {
                        if top == "(" || !self.operators.contains(top) {
                            break;
                        }
                        let top_prec = self.operators.precedence(top);
                        let pop_on_equal = if mirrored { !left } else { left };
                        if top_prec > incoming || (top_prec == incoming && pop_on_equal) {
                            if let Some(op) = stack.pop() {
                                output.push(op);
                            }
                        } else {
                            break;
                        }
                    }
                    stack.push(token.text.clone());
                    steps.push(format!(
                        "Operator '{}' → Output: {}, Stack: {}",
                        text,
                        render_tokens(&output),
                        render_tokens(&stack)
                    ));
                }
                TokenKind::LParen => {
                    stack.push(token.text.clone());
                    steps.push(format!(
                        "'(' → Output: {}, Stack: {}",
                        render_tokens(&output),
                        render_tokens(&stack)
                    ));
                }
                TokenKind::RParen => {
                    while let Some(op) = stack.pop() {
                        if op == "(" {
                            break;
                        }
                        output.push(op);
                    }
                    steps.push(format!(
                        "')' → Output: {}, Stack: {}",
                        render_tokens(&output),
                        render_tokens(&stack)
                    ));
                }
                // Rejected by validation
                TokenKind::Invalid => {}
            }
        }

        while let Some(op) = stack.pop() {
            output.push(op);
        }
        output
    }

    /// Infix to postfix with Shunting-yard.
    pub fn infix_to_postfix(&mut self, expression: &str) -> ConversionResult {
        let (source, target) = (Notation::Infix, Notation::Postfix);
        if let Some(failed) = self.validate_source(expression, source, target) {
            return failed;
        }

        let tokens = tokenize_infix(expression);
        let mut steps = vec![format!("Input tokens: {}", render_tokens(&tokens))];
        let output = self.shunting_yard(&tokens, false, &mut steps);
        let result = output.join(" ");
        steps.push(format!("Final result: {}", result));

        debug!("infix→postfix {:?} = {:?}", expression, result);
        ConversionResult::succeeded(source, target, expression, result, steps)
    }

    /// Infix to prefix: reverse, swap parentheses, mirrored Shunting-yard,
    /// reverse the output.
    pub fn infix_to_prefix(&mut self, expression: &str) -> ConversionResult {
        let (source, target) = (Notation::Infix, Notation::Prefix);
        if let Some(failed) = self.validate_source(expression, source, target) {
            return failed;
        }

        let tokens = tokenize_infix(expression);
        let mut steps = vec![format!("Input tokens: {}", render_tokens(&tokens))];

        let mut reversed = tokens;
        reversed.reverse();
        steps.push(format!("Reversed: {}", render_tokens(&reversed)));

        let swapped: Vec<ExprToken> = reversed
            .into_iter()
            .map(|token| match token.kind {
                TokenKind::LParen => ExprToken::new(")", TokenKind::RParen),
                TokenKind::RParen => ExprToken::new("(", TokenKind::LParen),
                _ => token,
            })
            .collect();
        steps.push(format!("Swapped parentheses: {}", render_tokens(&swapped)));

        let mut output = self.shunting_yard(&swapped, true, &mut steps);
        steps.push(format!("After Shunting-yard: {}", render_tokens(&output)));

        output.reverse();
        let result = output.join(" ");
        steps.push(format!("Final result (reversed): {}", result));

        debug!("infix→prefix {:?} = {:?}", expression, result);
        ConversionResult::succeeded(source, target, expression, result, steps)
    }

    /// Rebuild infix from a postfix or prefix token stream.
    ///
    /// Postfix pops the right operand first; prefix scans right to left
    /// and pops the left operand first.
    fn rebuild_infix(&mut self, expression: &str, source: Notation) -> ConversionResult {
        let target = Notation::Infix;
        if let Some(failed) = self.validate_source(expression, source, target) {
            return failed;
        }

        let mut tokens = tokenize_spaced(expression);
        let mut steps = Vec::with_capacity(tokens.len() + 2);
        if source == Notation::Prefix {
            tokens.reverse();
            steps.push(format!("Input tokens (reversed): {}", render_tokens(&tokens)));
        } else {
            steps.push(format!("Input tokens: {}", render_tokens(&tokens)));
        }

        let mut values: Vec<String> = Vec::new();
        for token in &tokens {
            if token.kind != TokenKind::Operator {
                values.push(token.text.clone());
                steps.push(format!(
                    "Push operand '{}' → Stack: {}",
                    token.text,
                    render_tokens(&values)
                ));
                continue;
            }

            let (Some(first), Some(second)) = (values.pop(), values.pop()) else {
                return ConversionResult::failed(
                    source,
                    target,
                    expression,
                    format!("Not enough operands for operator '{}'", token.text),
                    steps,
                );
            };
            let (left, right) = match source {
                Notation::Prefix => (first, second),
                _ => (second, first),
            };
            let built = format!("({}{}{})", left, token.text, right);
            values.push(built.clone());
            steps.push(format!(
                "Apply '{}' to {}, {} → '{}' → Stack: {}",
                token.text,
                left,
                right,
                built,
                render_tokens(&values)
            ));
        }

        let result = match (values.pop(), values.is_empty()) {
            (Some(result), true) => result,
            _ => {
                return ConversionResult::failed(
                    source,
                    target,
                    expression,
                    "Invalid expression - stack should have exactly one element".to_string(),
                    steps,
                );
            }
        };
        steps.push(format!("Final result: {}", result));

        debug!("{}→infix {:?} = {:?}", source, expression, result);
        ConversionResult::succeeded(source, target, expression, result, steps)
    }

    /// Postfix to fully parenthesised infix.
    pub fn postfix_to_infix(&mut self, expression: &str) -> ConversionResult {
        self.rebuild_infix(expression, Notation::Postfix)
    }

    /// Prefix to fully parenthesised infix.
    pub fn prefix_to_infix(&mut self, expression: &str) -> ConversionResult {
        self.rebuild_infix(expression, Notation::Prefix)
    }

    /// Two-leg conversion through infix.
    fn via_infix(&mut self, expression: &str, source: Notation, target: Notation) -> ConversionResult {
        let first = self.rebuild_infix(expression, source);
        let mut steps = first.steps;
        let infix = match first.result_expression {
            Some(infix) if first.success => infix,
            _ => {
                steps.push(format!(
                    "Conversion aborted - infix to {} was not attempted",
                    target
                ));
                let message = first
                    .error_message
                    .unwrap_or_else(|| "Conversion to infix failed".to_string());
                return ConversionResult::failed(source, target, expression, message, steps);
            }
        };

        let second = match target {
            Notation::Prefix => self.infix_to_prefix(&infix),
            _ => self.infix_to_postfix(&infix),
        };
        steps.push(format!("--- Converting Infix to {} ---", target.title()));
        steps.extend(second.steps);

        ConversionResult {
            success: second.success,
            source,
            target,
            source_expression: expression.to_string(),
            result_expression: second.result_expression,
            steps,
            error_message: second.error_message,
        }
    }

    /// Postfix to prefix, via infix.
    pub fn postfix_to_prefix(&mut self, expression: &str) -> ConversionResult {
        self.via_infix(expression, Notation::Postfix, Notation::Prefix)
    }

    /// Prefix to postfix, via infix.
    pub fn prefix_to_postfix(&mut self, expression: &str) -> ConversionResult {
        self.via_infix(expression, Notation::Prefix, Notation::Postfix)
    }

    /// Convert between any two notations.
    ///
    /// Same-notation requests return the input untouched.
    pub fn convert(&mut self, expression: &str, source: Notation, target: Notation) -> ConversionResult {
        match (source, target) {
            (s, t) if s == t => ConversionResult::succeeded(
                s,
                t,
                expression,
                expression.to_string(),
                vec!["No conversion needed - same notation".to_string()],
            ),
            (Notation::Infix, Notation::Postfix) => self.infix_to_postfix(expression),
            (Notation::Infix, _) => self.infix_to_prefix(expression),
            (Notation::Postfix, Notation::Infix) => self.postfix_to_infix(expression),
            (Notation::Postfix, _) => self.postfix_to_prefix(expression),
            (Notation::Prefix, Notation::Infix) => self.prefix_to_infix(expression),
            (Notation::Prefix, _) => self.prefix_to_postfix(expression),
        }
    }

    /// Convert to every notation, the source included.
    pub fn convert_to_all(
        &mut self,
        expression: &str,
        source: Notation,
    ) -> BTreeMap<Notation, ConversionResult> {
        Notation::ALL
            .iter()
            .map(|&target| (target, self.convert(expression, source, target)))
            .collect()
    }
}

/// Infix to postfix; `None` if the input is invalid.
pub fn infix_to_postfix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .infix_to_postfix(expression)
        .result_expression
}

/// Infix to prefix; `None` if the input is invalid.
pub fn infix_to_prefix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .infix_to_prefix(expression)
        .result_expression
}

/// Postfix to infix; `None` if the input is invalid.
pub fn postfix_to_infix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .postfix_to_infix(expression)
        .result_expression
}

/// Postfix to prefix; `None` if the input is invalid.
pub fn postfix_to_prefix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .postfix_to_prefix(expression)
        .result_expression
}

/// Prefix to infix; `None` if the input is invalid.
pub fn prefix_to_infix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .prefix_to_infix(expression)
        .result_expression
}

/// Prefix to postfix; `None` if the input is invalid.
pub fn prefix_to_postfix(expression: &str) -> Option<String> {
    ExpressionConverter::new()
        .prefix_to_postfix(expression)
        .result_expression
}

/// Convert with a fresh converter.
pub fn convert(expression: &str, source: Notation, target: Notation) -> ConversionResult {
    ExpressionConverter::new().convert(expression, source, target)
}

/// Convert to every notation with a fresh converter.
pub fn convert_to_all(expression: &str, source: Notation) -> BTreeMap<Notation, ConversionResult> {
    ExpressionConverter::new().convert_to_all(expression, source)
}
