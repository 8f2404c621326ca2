//! Syntax highlighting for REPL input

use colored::Colorize;
use rustyline::highlight::Highlighter;

use crate::combo::ComboInput;
use crate::notation::{classify, Notation, TokenKind};

/// Command names and aliases recognised by the parser
pub const COMMANDS: &[&str] = &[
    "validate",
    "check",
    "v",
    "convert",
    "c",
    "all",
    "convert-all",
    "notation",
    "mode",
    "trace",
    "press",
    "p",
    "reset",
    "combos",
    "list",
    "diagram",
    "show",
    "settings",
    "set",
    "help",
    "?",
    "exit",
    "quit",
];

/// Command highlighter
#[derive(Debug, Default)]
pub struct CommandHighlighter;

impl CommandHighlighter {
    /// Create a highlighter
    pub fn new() -> Self {
        Self
    }

    /// Colour a full input line
    pub fn highlight_command(&self, line: &str) -> String {
        let Some(first) = line.split_whitespace().next() else {
            return line.to_string();
        };

        let cmd = first.to_lowercase();
        if !COMMANDS.contains(&cmd.as_str()) {
            return line.to_string();
        }

        let start = line.find(first).unwrap_or(0);
        let (lead, rest) = (&line[..start], &line[start + first.len()..]);
        let args = if rest.trim().is_empty() {
            rest.to_string()
        } else {
            self.highlight_args(rest, &cmd)
        };
        format!("{}{}{}", lead, first.blue().bold(), args)
    }

    fn highlight_args(&self, args: &str, cmd: &str) -> String {
        let pressing = matches!(cmd, "press" | "p");
        let mut result = String::new();
        let mut in_option = false;

        for part in args.split_whitespace() {
            result.push(' ');

            if is_flag(part) {
                result.push_str(&part.yellow().to_string());
                in_option = true;
            } else if in_option {
                result.push_str(&part.cyan().to_string());
                in_option = false;
            } else if part.parse::<Notation>().is_ok() {
                result.push_str(&part.cyan().to_string());
            } else if pressing && part.parse::<ComboInput>().is_ok() {
                result.push_str(&part.green().to_string());
            } else {
                result.push_str(&self.highlight_expression_word(part));
            }
        }

        result
    }

    fn highlight_expression_word(&self, word: &str) -> String {
        match classify(word) {
            TokenKind::Operand => word.magenta().to_string(),
            TokenKind::Operator => word.yellow().bold().to_string(),
            TokenKind::LParen | TokenKind::RParen => word.dimmed().to_string(),
            TokenKind::Invalid => word.to_string(),
        }
    }
}

/// `-n` and `--hold` are flags; a lone `-` is the minus operator.
fn is_flag(part: &str) -> bool {
    part.strip_prefix('-')
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c == '-' || c.is_ascii_alphabetic())
}

impl Highlighter for CommandHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> std::borrow::Cow<'l, str> {
        std::borrow::Cow::Owned(self.highlight_command(line))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_survives_without_colour() {
        colored::control::set_override(false);
        let h = CommandHighlighter::new();
        assert_eq!(h.highlight_command("validate -n postfix 3 4 +"), "validate -n postfix 3 4 +");
        assert_eq!(h.highlight_command("unknown words"), "unknown words");
        assert_eq!(h.highlight_command("help"), "help");
    }

    #[test]
    fn test_flag_detection() {
        assert!(is_flag("-n"));
        assert!(is_flag("--hold"));
        assert!(!is_flag("-"));
        assert!(!is_flag("-5"));
    }
}
