//! Arithmetic expression notations: validation and conversion.
//!
//! Three fixed [`PushdownAutomaton`](crate::pda::PushdownAutomaton)
//! configurations validate infix, postfix and prefix expressions, and a
//! Shunting-yard based converter rewrites valid expressions between them.
//!
//! ```
//! use libautomata::notation::{infix_to_postfix, validate_postfix};
//!
//! assert_eq!(infix_to_postfix("(3+4)*2").as_deref(), Some("3 4 + 2 *"));
//! assert!(!validate_postfix("3 4").is_valid);
//! ```

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod converter;
mod operator;
mod token;
mod validator;

pub use converter::{
    convert, convert_to_all, infix_to_postfix, infix_to_prefix, postfix_to_infix,
    postfix_to_prefix, prefix_to_infix, prefix_to_postfix, ConversionResult, ExpressionConverter,
};
pub use operator::{Associativity, OperatorInfo, OperatorTable};
pub use token::{classify, render_tokens, tokenize, tokenize_infix, tokenize_spaced, ExprToken, TokenKind};
pub use validator::{
    validate, validate_infix, validate_postfix, validate_prefix, ExpressionValidator,
    InfixValidator, PostfixValidator, PrefixValidator, TraceStep, ValidationResult, ACCEPT_STATE,
    ERROR_STATE,
};

/// Expression notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Notation {
    /// `(3+4)*2`
    Infix,
    /// `3 4 + 2 *`
    Postfix,
    /// `* + 3 4 2`
    Prefix,
}

impl Notation {
    /// Every notation, in display order.
    pub const ALL: [Notation; 3] = [Notation::Infix, Notation::Postfix, Notation::Prefix];

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Infix => "infix",
            Self::Postfix => "postfix",
            Self::Prefix => "prefix",
        }
    }

    /// Capitalised name.
    pub fn title(self) -> &'static str {
        match self {
            Self::Infix => "Infix",
            Self::Postfix => "Postfix",
            Self::Prefix => "Prefix",
        }
    }

    /// Sample expression in this notation.
    pub fn example(self) -> &'static str {
        match self {
            Self::Infix => "(3+4)*2",
            Self::Postfix => "3 4 + 2 *",
            Self::Prefix => "* + 3 4 2",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unrecognised notation names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown notation '{0}' (expected infix, postfix or prefix)")]
pub struct ParseNotationError(pub String);

impl FromStr for Notation {
    type Err = ParseNotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "infix" | "in" => Ok(Self::Infix),
            "postfix" | "post" | "rpn" => Ok(Self::Postfix),
            "prefix" | "pre" | "polish" => Ok(Self::Prefix),
            _ => Err(ParseNotationError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notation_parse() {
        assert_eq!("Infix".parse::<Notation>(), Ok(Notation::Infix));
        assert_eq!("rpn".parse::<Notation>(), Ok(Notation::Postfix));
        assert_eq!(" pre ".parse::<Notation>(), Ok(Notation::Prefix));
        assert!("sideways".parse::<Notation>().is_err());
    }

    #[test]
    fn test_notation_display() {
        assert_eq!(Notation::Postfix.to_string(), "postfix");
        assert_eq!(Notation::Prefix.title(), "Prefix");
    }

    #[test]
    fn test_examples_are_valid() {
        for notation in Notation::ALL {
            assert!(validate(notation.example(), notation).is_valid);
        }
    }
}
