//! REPL state machine
//!
//! Drives the read-parse-execute cycle as explicit phases and events, so the
//! binary's loop only reads lines and prints transition output.

use super::command::{Command, CommandResult};
use anyhow::Result;
use colored::Colorize;
use log::warn;

/// REPL execution phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplPhase {
    /// Ready to accept new input
    #[default]
    Ready,

    /// Accepting multi-line input (continuation)
    Continuation {
        /// Buffer containing accumulated input
        buffer: String,
    },

    /// Executing a command
    Executing {
        /// The command being executed
        command: Command,
    },

    /// Error state
    Error {
        /// Error message
        message: String,
        /// Whether the error is recoverable
        recoverable: bool,
    },

    /// Exiting the REPL
    Exiting,
}

impl ReplPhase {
    /// Check if the phase is terminal (requires exit)
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Exiting
                | Self::Error {
                    recoverable: false,
                    ..
                }
        )
    }

    /// Get a status indicator string for display
    pub fn status_indicator(&self) -> String {
        match self {
            Self::Ready => "●".blue().to_string(),
            Self::Continuation { .. } => "●".yellow().to_string(),
            Self::Executing { .. } => "●".green().to_string(),
            Self::Error {
                recoverable: true, ..
            } => "⚠".yellow().to_string(),
            Self::Error {
                recoverable: false, ..
            } => "✗".red().to_string(),
            Self::Exiting => "○".to_string(),
        }
    }
}

/// REPL event
#[derive(Debug, Clone)]
pub enum ReplEvent {
    /// User submitted a line of input
    LineSubmitted {
        /// The input line
        line: String,
    },

    /// Command was successfully parsed
    CommandParsed {
        /// The parsed command
        command: Command,
    },

    /// Command execution completed
    CommandExecuted {
        /// The execution result
        result: CommandResult,
    },

    /// User interrupted (Ctrl+C)
    Interrupted,

    /// End of file (Ctrl+D)
    Eof,

    /// Execution error occurred
    ExecutionError {
        /// Error message
        message: String,
        /// Whether the error is recoverable
        recoverable: bool,
    },
}

/// State transition result
#[derive(Debug)]
pub struct Transition {
    /// New phase after transition
    pub new_phase: ReplPhase,
    /// Optional output message
    pub output: Option<String>,
    /// Optional follow-up event to process
    pub follow_up: Option<ReplEvent>,
}

impl Transition {
    /// Create a simple transition with no output or follow-up
    pub fn to(phase: ReplPhase) -> Self {
        Self {
            new_phase: phase,
            output: None,
            follow_up: None,
        }
    }

    /// Create a transition with output
    pub fn to_with_output(phase: ReplPhase, output: String) -> Self {
        Self {
            new_phase: phase,
            output: Some(output),
            follow_up: None,
        }
    }

    /// Create a transition with a follow-up event
    pub fn to_with_follow_up(phase: ReplPhase, follow_up: ReplEvent) -> Self {
        Self {
            new_phase: phase,
            output: None,
            follow_up: Some(follow_up),
        }
    }
}

/// State machine for REPL execution
#[derive(Debug, Default)]
pub struct ReplStateMachine {
    phase: ReplPhase,
}

impl ReplStateMachine {
    /// Create a new state machine in Ready phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current phase
    pub fn phase(&self) -> &ReplPhase {
        &self.phase
    }

    /// Check if the state machine is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// The command awaiting execution, if any
    pub fn pending_command(&self) -> Option<&Command> {
        match &self.phase {
            ReplPhase::Executing { command } => Some(command),
            _ => None,
        }
    }

    fn parse_line(line: &str) -> Transition {
        match Command::parse(line) {
            Ok(command) => Transition::to_with_follow_up(
                ReplPhase::Executing {
                    command: command.clone(),
                },
                ReplEvent::CommandParsed { command },
            ),
            Err(e) => Transition::to_with_output(
                ReplPhase::Ready,
                format!("{}: {}", "Parse error".red().bold(), e),
            ),
        }
    }

    /// Process an event and transition to a new state
    pub fn process_event(&mut self, event: ReplEvent) -> Result<Transition> {
        let transition = match (&self.phase, &event) {
            (ReplPhase::Ready, ReplEvent::LineSubmitted { line }) => {
                if line.is_empty() {
                    Transition::to(ReplPhase::Ready)
                } else if let Some(buffer) = line.strip_suffix('\\') {
                    Transition::to(ReplPhase::Continuation {
                        buffer: buffer.to_string(),
                    })
                } else {
                    Self::parse_line(line)
                }
            }

            (ReplPhase::Ready, ReplEvent::Interrupted) => Transition::to_with_output(
                ReplPhase::Ready,
                "^C (Use 'exit' or Ctrl+D to quit)".yellow().to_string(),
            ),

            (ReplPhase::Ready | ReplPhase::Continuation { .. }, ReplEvent::Eof) => {
                Transition::to_with_output(ReplPhase::Exiting, "Goodbye!".green().to_string())
            }

            (ReplPhase::Continuation { buffer }, ReplEvent::LineSubmitted { line }) => {
                let mut joined = buffer.clone();
                joined.push(' ');
                joined.push_str(line);

                match joined.strip_suffix('\\') {
                    Some(rest) => Transition::to(ReplPhase::Continuation {
                        buffer: rest.to_string(),
                    }),
                    None => Self::parse_line(&joined),
                }
            }

            (ReplPhase::Continuation { .. }, ReplEvent::Interrupted) => Transition::to_with_output(
                ReplPhase::Ready,
                "Continuation cancelled".yellow().to_string(),
            ),

            (ReplPhase::Executing { .. }, ReplEvent::CommandParsed { .. }) => {
                Transition::to(self.phase.clone())
            }

            (ReplPhase::Executing { .. }, ReplEvent::CommandExecuted { result }) => match result {
                CommandResult::Continue(output) if !output.is_empty() => {
                    Transition::to_with_output(ReplPhase::Ready, output.clone())
                }
                CommandResult::Continue(_) | CommandResult::Silent => {
                    Transition::to(ReplPhase::Ready)
                }
                CommandResult::Exit => {
                    Transition::to_with_output(ReplPhase::Exiting, "Goodbye!".green().to_string())
                }
            },

            (
                ReplPhase::Executing { .. },
                ReplEvent::ExecutionError {
                    message,
                    recoverable,
                },
            ) => {
                if *recoverable {
                    Transition::to_with_output(
                        ReplPhase::Ready,
                        format!("{}: {}", "Error".red().bold(), message),
                    )
                } else {
                    Transition::to(ReplPhase::Error {
                        message: message.clone(),
                        recoverable: false,
                    })
                }
            }

            (
                ReplPhase::Error {
                    recoverable: true, ..
                },
                ReplEvent::LineSubmitted { .. },
            ) => Transition::to(ReplPhase::Ready),

            (ReplPhase::Exiting, _) => Transition::to(ReplPhase::Exiting),

            (current, event) => {
                warn!("Unexpected event {:?} in phase {:?}", event, current);
                Transition::to(ReplPhase::Ready)
            }
        };

        self.phase = transition.new_phase.clone();

        Ok(transition)
    }

    /// Reset to Ready phase
    pub fn reset(&mut self) {
        self.phase = ReplPhase::Ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(sm: &mut ReplStateMachine, line: &str) -> Transition {
        sm.process_event(ReplEvent::LineSubmitted {
            line: line.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_ready_to_executing() {
        let mut sm = ReplStateMachine::new();
        assert!(matches!(sm.phase(), ReplPhase::Ready));

        let transition = submit(&mut sm, "validate 3+4");
        assert!(matches!(
            transition.follow_up,
            Some(ReplEvent::CommandParsed { .. })
        ));
        assert_eq!(
            sm.pending_command(),
            Some(&Command::Validate {
                expression: "3+4".to_string(),
                notation: None,
            })
        );
    }

    #[test]
    fn test_continuation_joins_lines() {
        let mut sm = ReplStateMachine::new();

        submit(&mut sm, "convert postfix \\");
        assert!(matches!(sm.phase(), ReplPhase::Continuation { .. }));

        submit(&mut sm, "(3+4)*2");
        assert!(matches!(
            sm.pending_command(),
            Some(Command::Convert { expression, .. }) if expression == "(3+4)*2"
        ));
    }

    #[test]
    fn test_parse_error_returns_to_ready() {
        let mut sm = ReplStateMachine::new();
        let transition = submit(&mut sm, "frobnicate");
        assert!(transition.output.is_some());
        assert_eq!(sm.phase(), &ReplPhase::Ready);
    }

    #[test]
    fn test_interrupt_recovery() {
        let mut sm = ReplStateMachine::new();
        sm.process_event(ReplEvent::Interrupted).unwrap();
        assert!(matches!(sm.phase(), ReplPhase::Ready));

        submit(&mut sm, "validate \\");
        sm.process_event(ReplEvent::Interrupted).unwrap();
        assert!(matches!(sm.phase(), ReplPhase::Ready));
    }

    #[test]
    fn test_eof_exits() {
        let mut sm = ReplStateMachine::new();
        sm.process_event(ReplEvent::Eof).unwrap();
        assert!(sm.is_terminal());
    }

    #[test]
    fn test_exit_command_result() {
        let mut sm = ReplStateMachine::new();
        submit(&mut sm, "exit");
        sm.process_event(ReplEvent::CommandExecuted {
            result: CommandResult::Exit,
        })
        .unwrap();
        assert!(sm.is_terminal());
    }

    #[test]
    fn test_execution_error_is_recoverable() {
        let mut sm = ReplStateMachine::new();
        submit(&mut sm, "settings");
        let transition = sm
            .process_event(ReplEvent::ExecutionError {
                message: "boom".to_string(),
                recoverable: true,
            })
            .unwrap();
        assert!(transition.output.is_some());
        assert_eq!(sm.phase(), &ReplPhase::Ready);
    }
}
