//! Command parsing and execution
//!
//! Defines all REPL commands and their execution logic.

use super::state::ReplState;
use crate::cli::commands::{
    format_conversion, format_convert_all, format_pda_diagram, format_settings,
    format_trie_diagram, format_validation,
};
use crate::cli::session::{render_press, DEFAULT_HOLD};
use crate::combo::{parse_sequence, ComboInput};
use crate::notation::Notation;
use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Duration;

/// REPL command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate an expression: validate [-n notation] <expr>
    Validate {
        /// Expression text
        expression: String,
        /// Notation override
        notation: Option<Notation>,
    },
    /// Convert an expression: convert [--from notation] <target> <expr>
    Convert {
        /// Expression text
        expression: String,
        /// Source notation override
        from: Option<Notation>,
        /// Target notation
        to: Notation,
    },
    /// Convert into every notation: all [--from notation] <expr>
    All {
        /// Expression text
        expression: String,
        /// Source notation override
        from: Option<Notation>,
    },
    /// Show or set the default notation: notation [name]
    Notation {
        /// New default notation
        notation: Option<Notation>,
    },
    /// Toggle trace output: trace [on|off]
    Trace {
        /// Enable or disable traces
        enable: Option<bool>,
    },
    /// Feed combo inputs: press <inputs...> [--hold ms]
    Press {
        /// Inputs in order
        inputs: Vec<ComboInput>,
        /// How long the finisher is held
        hold: Duration,
    },
    /// Drop the current combo attempt: reset
    Reset,
    /// List the combo catalogue: combos
    Combos,
    /// Show an automaton: diagram [notation|combos]
    Diagram {
        /// Validator to show; `None` means the default notation
        notation: Option<Notation>,
        /// Show the combo trie instead
        combos: bool,
    },
    /// Show settings: settings
    Settings,
    /// Show help: help [command]
    Help {
        /// Help topic
        topic: Option<String>,
    },
    /// Exit REPL: exit | quit
    Exit,
}

/// Command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Continue REPL
    Continue(String),
    /// Exit REPL
    Exit,
    /// No output
    Silent,
}

impl Command {
    /// Parse command from input string
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if input.is_empty() {
            return Err(anyhow::anyhow!("Empty command"));
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "validate" | "check" | "v" => Self::parse_validate(&parts[1..]),
            "convert" | "c" => Self::parse_convert(&parts[1..]),
            "all" | "convert-all" => Self::parse_all(&parts[1..]),
            "notation" | "mode" => Self::parse_notation(&parts[1..]),
            "trace" => Self::parse_trace(&parts[1..]),
            "press" | "p" => Self::parse_press(&parts[1..]),
            "reset" => Ok(Self::Reset),
            "combos" | "list" => Ok(Self::Combos),
            "diagram" | "show" => Self::parse_diagram(&parts[1..]),
            "settings" | "set" => Ok(Self::Settings),
            "help" | "?" => Ok(Self::Help {
                topic: parts.get(1).map(|s| s.to_lowercase()),
            }),
            "exit" | "quit" => Ok(Self::Exit),
            _ => Err(anyhow::anyhow!(
                "Unknown command: '{}'. Type 'help' for available commands.",
                cmd
            )),
        }
    }

    /// Split a `flag value` pair out of the arguments.
    fn take_flag<'a>(args: &[&'a str], names: &[&str]) -> Result<(Option<&'a str>, Vec<&'a str>)> {
        let mut value = None;
        let mut rest = Vec::with_capacity(args.len());
        let mut iter = args.iter();

        while let Some(&arg) = iter.next() {
            if names.contains(&arg) {
                let v = iter
                    .next()
                    .with_context(|| format!("Missing value for {}", arg))?;
                value = Some(*v);
            } else {
                rest.push(arg);
            }
        }
        Ok((value, rest))
    }

    fn parse_notation_flag<'a>(
        args: &[&'a str],
        names: &[&str],
    ) -> Result<(Option<Notation>, Vec<&'a str>)> {
        let (value, rest) = Self::take_flag(args, names)?;
        let notation = value.map(str::parse::<Notation>).transpose()?;
        Ok((notation, rest))
    }

    fn parse_validate(args: &[&str]) -> Result<Self> {
        let (notation, rest) = Self::parse_notation_flag(args, &["-n", "--notation"])?;
        if rest.is_empty() {
            return Err(anyhow::anyhow!("Usage: validate [-n notation] <expression>"));
        }
        Ok(Self::Validate {
            expression: rest.join(" "),
            notation,
        })
    }

    fn parse_convert(args: &[&str]) -> Result<Self> {
        let (from, rest) = Self::parse_notation_flag(args, &["-f", "--from"])?;
        if rest.len() < 2 {
            return Err(anyhow::anyhow!(
                "Usage: convert [--from notation] <target> <expression>"
            ));
        }
        let to = rest[0].parse::<Notation>()?;
        Ok(Self::Convert {
            expression: rest[1..].join(" "),
            from,
            to,
        })
    }

    fn parse_all(args: &[&str]) -> Result<Self> {
        let (from, rest) = Self::parse_notation_flag(args, &["-f", "--from"])?;
        if rest.is_empty() {
            return Err(anyhow::anyhow!("Usage: all [--from notation] <expression>"));
        }
        Ok(Self::All {
            expression: rest.join(" "),
            from,
        })
    }

    fn parse_notation(args: &[&str]) -> Result<Self> {
        let notation = args.first().map(|s| s.parse::<Notation>()).transpose()?;
        Ok(Self::Notation { notation })
    }

    fn parse_trace(args: &[&str]) -> Result<Self> {
        let enable = if args.is_empty() {
            None
        } else {
            Some(match args[0].to_lowercase().as_str() {
                "on" | "true" | "yes" | "1" => true,
                "off" | "false" | "no" | "0" => false,
                _ => return Err(anyhow::anyhow!("Usage: trace [on|off]")),
            })
        };
        Ok(Self::Trace { enable })
    }

    fn parse_press(args: &[&str]) -> Result<Self> {
        let (hold, rest) = Self::take_flag(args, &["--hold", "-h"])?;
        if rest.is_empty() {
            return Err(anyhow::anyhow!("Usage: press <inputs...> [--hold ms]"));
        }
        let hold = match hold {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .with_context(|| format!("Invalid hold duration: {}", ms))?,
            ),
            None => DEFAULT_HOLD,
        };
        let inputs = parse_sequence(&rest.join(" "))?;
        Ok(Self::Press { inputs, hold })
    }

    fn parse_diagram(args: &[&str]) -> Result<Self> {
        match args.first().map(|s| s.to_lowercase()) {
            None => Ok(Self::Diagram {
                notation: None,
                combos: false,
            }),
            Some(target) if target == "combos" || target == "trie" => Ok(Self::Diagram {
                notation: None,
                combos: true,
            }),
            Some(target) => Ok(Self::Diagram {
                notation: Some(target.parse()?),
                combos: false,
            }),
        }
    }

    /// Execute the command
    pub fn execute(&self, state: &mut ReplState) -> Result<CommandResult> {
        match self {
            Self::Validate {
                expression,
                notation,
            } => {
                let notation = notation.unwrap_or(state.notation);
                let result = state.validator.validate(expression, notation);
                Ok(CommandResult::Continue(format_validation(
                    &result,
                    state.show_trace,
                )))
            }

            Self::Convert {
                expression,
                from,
                to,
            } => {
                let from = from.unwrap_or(state.notation);
                let result = state.converter.convert(expression, from, *to);
                Ok(CommandResult::Continue(format_conversion(
                    &result,
                    state.show_trace,
                )))
            }

            Self::All { expression, from } => {
                let from = from.unwrap_or(state.notation);
                let results = state.converter.convert_to_all(expression, from);
                Ok(CommandResult::Continue(format_convert_all(
                    expression,
                    from,
                    results.values(),
                )))
            }

            Self::Notation { notation: None } => Ok(CommandResult::Continue(format!(
                "Notation: {} (e.g. {})",
                state.notation.to_string().green(),
                state.notation.example().cyan()
            ))),

            Self::Notation {
                notation: Some(notation),
            } => {
                state.notation = *notation;
                Ok(CommandResult::Continue(format!(
                    "Notation set to {}",
                    notation.to_string().green().bold()
                )))
            }

            Self::Trace { enable } => {
                state.show_trace = enable.unwrap_or(!state.show_trace);
                let status = if state.show_trace {
                    "on".green()
                } else {
                    "off".yellow()
                };
                Ok(CommandResult::Continue(format!("Trace {}", status)))
            }

            Self::Press { inputs, hold } => {
                let mut lines = Vec::new();
                for &input in inputs {
                    let events = state.session.press(input, *hold);
                    lines.extend(render_press(input, &events));
                }
                lines.push(format!(
                    "History: {}  Progress: {}%",
                    state.session.history().cyan(),
                    state.session.progress_percent()
                ));
                Ok(CommandResult::Continue(lines.join("\n")))
            }

            Self::Reset => {
                state.session.reset();
                Ok(CommandResult::Continue("Combo attempt reset".to_string()))
            }

            Self::Combos => Ok(CommandResult::Continue(state.catalogue.render_table())),

            Self::Diagram { combos: true, .. } => {
                let diagram = state.session.controller().matcher().diagram_data();
                Ok(CommandResult::Continue(format_trie_diagram(&diagram)))
            }

            Self::Diagram {
                notation,
                combos: false,
            } => {
                let notation = notation.unwrap_or(state.notation);
                let diagram = state.validator.pda(notation).diagram_data();
                Ok(CommandResult::Continue(format_pda_diagram(&diagram)))
            }

            Self::Settings => {
                let path = state.config_path()?;
                Ok(CommandResult::Continue(format_settings(
                    &state.config(),
                    &path,
                )))
            }

            Self::Help { topic } => Ok(CommandResult::Continue(Self::help_text(topic.as_deref()))),

            Self::Exit => Ok(CommandResult::Exit),
        }
    }

    fn help_text(topic: Option<&str>) -> String {
        let usage = match topic {
            None => None,
            Some("validate" | "check" | "v") => Some((
                "validate [-n notation] <expression>",
                "Run the expression through the notation's pushdown automaton.",
            )),
            Some("convert" | "c") => Some((
                "convert [--from notation] <target> <expression>",
                "Convert between infix, postfix and prefix.",
            )),
            Some("all" | "convert-all") => Some((
                "all [--from notation] <expression>",
                "Convert into every notation at once.",
            )),
            Some("notation" | "mode") => Some((
                "notation [infix|postfix|prefix]",
                "Show or set the notation assumed by validate, convert and all.",
            )),
            Some("trace") => Some((
                "trace [on|off]",
                "Toggle printing of automaton traces and conversion steps.",
            )),
            Some("press" | "p") => Some((
                "press <inputs...> [--hold ms]",
                "Feed combo inputs (U D L R S, names or glyphs). The finisher is held for --hold ms.",
            )),
            Some("reset") => Some(("reset", "Drop the current combo attempt.")),
            Some("combos" | "list") => Some(("combos", "List the combo catalogue.")),
            Some("diagram" | "show") => Some((
                "diagram [infix|postfix|prefix|combos]",
                "Show the states and transitions of an automaton.",
            )),
            Some("settings" | "set") => Some(("settings", "Show the current settings.")),
            Some("exit" | "quit") => Some(("exit", "Save settings and leave the REPL.")),
            Some(other) => {
                return format!(
                    "{}: no help for '{}'. Type 'help' for available commands.",
                    "Unknown topic".yellow(),
                    other
                )
            }
        };

        if let Some((syntax, description)) = usage {
            return format!("  {}\n\n  {}", syntax.cyan().bold(), description);
        }

        let commands = [
            ("validate <expr>", "Validate in the current notation"),
            ("convert <target> <expr>", "Convert to another notation"),
            ("all <expr>", "Convert to every notation"),
            ("notation [name]", "Show or set the default notation"),
            ("trace [on|off]", "Toggle trace output"),
            ("press <inputs...>", "Feed combo inputs"),
            ("reset", "Drop the current combo attempt"),
            ("combos", "List the combo catalogue"),
            ("diagram [target]", "Show an automaton"),
            ("settings", "Show settings"),
            ("help [command]", "Show help"),
            ("exit", "Exit the REPL"),
        ];

        let mut out = format!("{}\n", "Available Commands".bold().underline());
        for (syntax, description) in commands {
            out.push_str(&format!("\n  {:<26} {}", syntax.cyan(), description));
        }
        out
    }
}
