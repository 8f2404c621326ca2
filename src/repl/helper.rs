//! Rustyline helper integration
//!
//! Provides completion, hinting, highlighting, and validation for the REPL.

use super::highlighter::{CommandHighlighter, COMMANDS};
use crate::combo::ComboInput;
use crate::notation::Notation;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};
use std::borrow::Cow;

/// REPL helper
pub struct AutomataHelper {
    highlighter: CommandHighlighter,
    hinter: HistoryHinter,
    commands: Vec<String>,
    notations: Vec<String>,
    inputs: Vec<String>,
}

impl AutomataHelper {
    /// Create a new helper instance
    pub fn new() -> Self {
        Self {
            highlighter: CommandHighlighter::new(),
            hinter: HistoryHinter::new(),
            commands: COMMANDS
                .iter()
                .filter(|c| c.len() > 2)
                .map(|c| c.to_string())
                .collect(),
            notations: Notation::ALL.iter().map(|n| n.to_string()).collect(),
            inputs: ComboInput::ALL.iter().map(|i| i.name().to_string()).collect(),
        }
    }

    fn candidates(options: &[String], prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_lowercase();
        options
            .iter()
            .filter(|o| o.to_lowercase().starts_with(&prefix))
            .map(|o| Pair {
                display: o.clone(),
                replacement: format!("{} ", o),
            })
            .collect()
    }
}

impl Default for AutomataHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for AutomataHelper {}

impl Completer for AutomataHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let line = &line[..pos];
        let parts: Vec<&str> = line.split_whitespace().collect();
        let typing_word = !line.is_empty() && !line.ends_with(char::is_whitespace);
        let start = line.rfind(char::is_whitespace).map(|i| i + 1).unwrap_or(0);
        let current = if typing_word {
            parts.last().copied().unwrap_or("")
        } else {
            ""
        };

        if parts.is_empty() || (parts.len() == 1 && typing_word) {
            return Ok((start, Self::candidates(&self.commands, current)));
        }

        // Index of the word being completed
        let arg_index = if typing_word { parts.len() - 1 } else { parts.len() };
        let previous = parts[arg_index - 1];
        let cmd = parts[0].to_lowercase();

        let options: Vec<String> = match cmd.as_str() {
            _ if matches!(previous, "-n" | "--notation" | "-f" | "--from") => self.notations.clone(),
            "notation" | "mode" if arg_index == 1 => self.notations.clone(),
            "convert" | "c" if !parts[1..arg_index].iter().any(|p| p.parse::<Notation>().is_ok()) => {
                self.notations.clone()
            }
            "diagram" | "show" if arg_index == 1 => {
                let mut targets = self.notations.clone();
                targets.push("combos".to_string());
                targets
            }
            "trace" if arg_index == 1 => vec!["on".to_string(), "off".to_string()],
            "press" | "p" => self.inputs.clone(),
            "help" | "?" if arg_index == 1 => self.commands.clone(),
            _ => return Ok((0, vec![])),
        };

        Ok((start, Self::candidates(&options, current)))
    }
}

impl Hinter for AutomataHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hinter.hint(line, pos, ctx)
    }
}

impl Highlighter for AutomataHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_char(&self, line: &str, pos: usize, forced: bool) -> bool {
        self.highlighter.highlight_char(line, pos, forced)
    }
}

impl Validator for AutomataHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        // Validation happens during execution
        Ok(ValidationResult::Valid(None))
    }
}
