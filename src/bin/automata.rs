//! automata - expression notation validation and combo matching
//!
//! Provides CLI utilities and an interactive REPL over the libautomata
//! engines.

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use std::path::PathBuf;
use std::process;

use libautomata::cli::commands;
use libautomata::cli::paths::PersistentConfig;
use libautomata::cli::{Cli, Commands};
use libautomata::notation::Notation;
use libautomata::repl::{
    AutomataHelper, ReplConfig, ReplEvent, ReplPhase, ReplState, ReplStateMachine,
};
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Repl {
            notation,
            trace,
            catalogue,
            timeout_ms,
        } => run_repl(cli.config, notation, trace, catalogue, timeout_ms),
        command => commands::execute(command, cli.config),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

/// `RUST_LOG` applies unless `-v` flags raise the level.
fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn run_repl(
    config_path: Option<PathBuf>,
    notation: Option<Notation>,
    trace: bool,
    catalogue: Option<PathBuf>,
    timeout_ms: Option<u64>,
) -> anyhow::Result<()> {
    let config = PersistentConfig::load_from(config_path.clone()).unwrap_or_else(|e| {
        eprintln!("  {}: {}", "Warning".yellow(), e);
        PersistentConfig::default()
    });

    let cli_overrides = PersistentConfig {
        default_notation: notation,
        show_trace: trace.then_some(true),
        catalogue_path: catalogue,
        timeout_ms,
    };
    let merged_config = config.merge_with_cli(&cli_overrides);

    print_banner();

    let mut state = ReplState::from_config(merged_config, config_path)?;
    println!(
        "  Loaded {} combo(s), notation {}",
        state.catalogue.len().to_string().green().bold(),
        state.notation.to_string().green().bold()
    );
    println!();

    let repl_config = ReplConfig::default();

    let rustyline_config = Config::builder()
        .auto_add_history(true)
        .history_ignore_dups(true)?
        .history_ignore_space(true)
        .max_history_size(repl_config.max_history)?
        .build();

    let mut editor: Editor<AutomataHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rustyline_config)?;
    editor.set_helper(Some(AutomataHelper::new()));

    if let Some(history_path) = &repl_config.history_file {
        if history_path.exists() {
            let _ = editor.load_history(history_path);
        }
    }

    let mut state_machine = ReplStateMachine::new();
    let mut line_num = 0;

    loop {
        if state_machine.is_terminal() {
            break;
        }

        line_num += 1;

        let state_indicator = state_machine.phase().status_indicator();
        let context = format!(
            "{}{}",
            state.notation.to_string().bright_green(),
            (if state.show_trace { "+trace" } else { "" }).bright_magenta()
        );
        let suffix = match state_machine.phase() {
            ReplPhase::Continuation { .. } => "...> ",
            _ => "> ",
        };
        let prompt = format!(
            "{} {}[{}] {}{}",
            state_indicator,
            repl_config.prompt.bright_cyan().bold(),
            line_num,
            context,
            suffix
        );

        let event = match editor.readline(&prompt) {
            Ok(line) => ReplEvent::LineSubmitted {
                line: line.trim().to_string(),
            },
            Err(ReadlineError::Interrupted) => ReplEvent::Interrupted,
            Err(ReadlineError::Eof) => ReplEvent::Eof,
            Err(err) => {
                eprintln!("{}: {:?}", "Readline error".red().bold(), err);
                break;
            }
        };

        let transition = match state_machine.process_event(event) {
            Ok(transition) => transition,
            Err(e) => {
                eprintln!("{}: State machine error: {}", "Error".red().bold(), e);
                state_machine.reset();
                continue;
            }
        };

        if let Some(output) = transition.output {
            println!("{}", output);
        }

        let Some(command) = state_machine.pending_command().cloned() else {
            continue;
        };

        let follow_up = match command.execute(&mut state) {
            Ok(result) => ReplEvent::CommandExecuted { result },
            Err(e) => ReplEvent::ExecutionError {
                message: e.to_string(),
                recoverable: true,
            },
        };
        if let Ok(exec_transition) = state_machine.process_event(follow_up) {
            if let Some(output) = exec_transition.output {
                println!("{}", output);
            }
        }
    }

    if let Some(history_path) = &repl_config.history_file {
        if let Err(e) = editor.save_history(history_path) {
            eprintln!("{}: Failed to save history: {}", "Warning".yellow(), e);
        }
    }

    if let Err(e) = state.save_config() {
        eprintln!("{}: Failed to save config: {}", "Warning".yellow(), e);
    }

    Ok(())
}

fn print_banner() {
    let rule = "═══════════════════════════════════════════════════════".bright_cyan();
    println!();
    println!("{}", rule);
    println!(
        "{}",
        "   automata - Notations, Pushdown Automata and Combos"
            .bright_cyan()
            .bold()
    );
    println!("{}", rule);
    println!();
    println!("  Version: {}", env!("CARGO_PKG_VERSION").green());
    println!("  Type {} for available commands", "'help'".yellow().bold());
    println!(
        "  Type {} or press {} to exit",
        "'exit'".yellow().bold(),
        "Ctrl+D".yellow().bold()
    );
    println!();
    println!("{}", "  Quick Start:".bold());
    println!("    • Validate:       {}", "validate (3+4)*2".cyan());
    println!("    • Convert:        {}", "convert postfix (3+4)*2".cyan());
    println!("    • Feed a combo:   {}", "press R R R S".cyan());
    println!("    • Show automaton: {}", "diagram postfix".cyan());
    println!();
}
