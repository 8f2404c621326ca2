//! Expression tokenization.
//!
//! Infix input is lexed as a character stream, so `(3+4)*2` needs no
//! spaces. Postfix and prefix input is split on whitespace first and every
//! word must lex to exactly one token, so `34` is one operand while `3+` is
//! rejected as a single invalid word.

use std::fmt;

use logos::Logos;

use super::Notation;

/// Raw lexemes recognised in any notation
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Lexeme {
    #[regex("[0-9]+")]
    Number,

    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    Operator,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl From<Lexeme> for TokenKind {
    fn from(lexeme: Lexeme) -> Self {
        match lexeme {
            Lexeme::Number => TokenKind::Operand,
            Lexeme::Operator => TokenKind::Operator,
            Lexeme::LParen => TokenKind::LParen,
            Lexeme::RParen => TokenKind::RParen,
        }
    }
}

/// Symbol class fed to the validator automata.
///
/// The automata never see raw characters, only these classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum TokenKind {
    /// Run of decimal digits
    Operand,
    /// One of `+ - * /`
    Operator,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Anything else
    Invalid,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Operand => "OPERAND",
            Self::Operator => "OPERATOR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// A classified token with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ExprToken {
    /// Source text
    pub text: String,
    /// Classification
    pub kind: TokenKind,
}

impl ExprToken {
    /// Create a token.
    pub fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// True for `(` and `)`.
    pub fn is_paren(&self) -> bool {
        matches!(self.kind, TokenKind::LParen | TokenKind::RParen)
    }
}

impl fmt::Display for ExprToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Lex an infix expression character by character.
///
/// Whitespace is skipped. Unrecognised characters become `Invalid` tokens.
pub fn tokenize_infix(expression: &str) -> Vec<ExprToken> {
    let mut lexer = Lexeme::lexer(expression);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let kind = result.map_or(TokenKind::Invalid, TokenKind::from);
        tokens.push(ExprToken::new(lexer.slice(), kind));
    }
    tokens
}

/// Split on whitespace and classify each word as a whole.
pub fn tokenize_spaced(expression: &str) -> Vec<ExprToken> {
    expression
        .split_whitespace()
        .map(|word| ExprToken::new(word, classify(word)))
        .collect()
}

/// Tokenize according to the notation's input convention.
pub fn tokenize(expression: &str, notation: Notation) -> Vec<ExprToken> {
    match notation {
        Notation::Infix => tokenize_infix(expression),
        Notation::Postfix | Notation::Prefix => tokenize_spaced(expression),
    }
}

/// Classify a word that must be exactly one token.
pub fn classify(word: &str) -> TokenKind {
    let mut lexer = Lexeme::lexer(word);
    match (lexer.next(), lexer.next()) {
        (Some(Ok(lexeme)), None) => lexeme.into(),
        _ => TokenKind::Invalid,
    }
}

/// Render token texts as `[a, b, c]`.
pub fn render_tokens<T: fmt::Display>(tokens: &[T]) -> String {
    let parts: Vec<String> = tokens.iter().map(ToString::to_string).collect();
    format!("[{}]", parts.join(", "))
}
