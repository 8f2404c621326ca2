//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::combo::{parse_sequence, ComboController};
use crate::notation::{
    ConversionResult, ExpressionConverter, ExpressionValidator, Notation, ValidationResult,
};
use crate::pda::PdaDiagram;
use crate::trie::TrieDiagram;

use super::args::Commands;
use super::paths::{config_file_path_with_override, PersistentConfig};
use super::session::{render_press, ComboSession, DEFAULT_HOLD};

/// Execute a CLI command
pub fn execute(command: Commands, config_path: Option<PathBuf>) -> Result<()> {
    let config = PersistentConfig::load_from(config_path.clone())?;

    match command {
        Commands::Repl { .. } => {
            // Handled in main.rs
            bail!("The REPL is started by the automata binary")
        }
        Commands::Validate {
            expression,
            notation,
            trace,
            json,
        } => cmd_validate(
            &expression,
            notation.unwrap_or(config.notation()),
            trace || config.show_trace(),
            json,
        ),
        Commands::Convert {
            expression,
            from,
            to,
            trace,
        } => cmd_convert(
            &expression,
            from.unwrap_or(config.notation()),
            to,
            trace || config.show_trace(),
        ),
        Commands::ConvertAll { expression, from } => {
            cmd_convert_all(&expression, from.unwrap_or(config.notation()))
        }
        Commands::Diagram {
            notation,
            combos,
            catalogue,
            json,
        } => {
            let config = config.merge_with_cli(&overrides(catalogue));
            cmd_diagram(notation.unwrap_or(config.notation()), combos, &config, json)
        }
        Commands::Combos { catalogue } => cmd_combos(&config.merge_with_cli(&overrides(catalogue))),
        Commands::Match { inputs, catalogue } => {
            cmd_match(&inputs, &config.merge_with_cli(&overrides(catalogue)))
        }
        Commands::Settings {
            set_notation,
            set_show_trace,
            set_catalogue,
            set_timeout_ms,
            reset,
        } => cmd_settings(
            config,
            config_path,
            set_notation,
            set_show_trace,
            set_catalogue,
            set_timeout_ms,
            reset,
        ),
    }
}

fn overrides(catalogue: Option<PathBuf>) -> PersistentConfig {
    PersistentConfig {
        default_notation: None,
        show_trace: None,
        catalogue_path: catalogue,
        timeout_ms: None,
    }
}

/// Validate an expression and print the verdict
fn cmd_validate(expression: &str, notation: Notation, trace: bool, json: bool) -> Result<()> {
    let result = ExpressionValidator::new().validate(expression, notation);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_validation(&result, trace));
    }

    if !result.is_valid {
        bail!("{}", result.message);
    }
    Ok(())
}

/// Convert an expression and print the result
fn cmd_convert(expression: &str, from: Notation, to: Notation, trace: bool) -> Result<()> {
    let result = ExpressionConverter::new().convert(expression, from, to);
    println!("{}", format_conversion(&result, trace));

    match result.error_message {
        Some(message) => bail!("{}", message),
        None => Ok(()),
    }
}

/// Convert an expression into every notation
fn cmd_convert_all(expression: &str, from: Notation) -> Result<()> {
    let results = ExpressionConverter::new().convert_to_all(expression, from);
    println!("{}", format_convert_all(expression, from, results.values()));

    if results.values().all(|r| r.target == from || !r.success) {
        bail!("'{}' is not a valid {} expression", expression, from);
    }
    Ok(())
}

/// Print a validator automaton or the combo trie
fn cmd_diagram(notation: Notation, combos: bool, config: &PersistentConfig, json: bool) -> Result<()> {
    if combos {
        let matcher = config.catalogue()?.matcher()?;
        let diagram = matcher.diagram_data();
        if json {
            println!("{}", serde_json::to_string_pretty(&diagram)?);
        } else {
            println!("{}", format_trie_diagram(&diagram));
        }
        return Ok(());
    }

    let validator = ExpressionValidator::new();
    let diagram = validator.pda(notation).diagram_data();
    if json {
        println!("{}", serde_json::to_string_pretty(&diagram)?);
    } else {
        println!("{}", format_pda_diagram(&diagram));
    }
    Ok(())
}

/// List the combo catalogue
fn cmd_combos(config: &PersistentConfig) -> Result<()> {
    let catalogue = config.catalogue()?;
    println!("{}", "Combo Catalogue".bold().underline());
    println!();
    println!("{}", catalogue.render_table());
    Ok(())
}

/// Feed inputs through a combo session
fn cmd_match(inputs: &[String], config: &PersistentConfig) -> Result<()> {
    let sequence = parse_sequence(&inputs.join(" ")).context("Invalid combo input")?;
    let catalogue = config.catalogue()?;
    let controller = ComboController::new(&catalogue, config.timing())?;
    let mut session = ComboSession::new(controller);

    for input in sequence {
        let events = session.press(input, DEFAULT_HOLD);
        for line in render_press(input, &events) {
            println!("{}", line);
        }
    }

    println!();
    println!("  History:  {}", session.history().cyan());
    println!("  Progress: {}%", session.progress_percent());
    Ok(())
}

/// Show or update the persistent configuration
fn cmd_settings(
    mut config: PersistentConfig,
    config_path: Option<PathBuf>,
    set_notation: Option<Notation>,
    set_show_trace: Option<bool>,
    set_catalogue: Option<PathBuf>,
    set_timeout_ms: Option<u64>,
    reset: bool,
) -> Result<()> {
    let path = config_file_path_with_override(config_path.clone())?;

    if reset {
        config = PersistentConfig::default();
    }
    let updates = PersistentConfig {
        default_notation: set_notation,
        show_trace: set_show_trace,
        catalogue_path: set_catalogue,
        timeout_ms: set_timeout_ms,
    };
    let changed = reset
        || updates.default_notation.is_some()
        || updates.show_trace.is_some()
        || updates.catalogue_path.is_some()
        || updates.timeout_ms.is_some();

    if changed {
        config = config.merge_with_cli(&updates);
        config.save_to(config_path)?;
        println!("{}", "Settings saved".green().bold());
        println!();
    }

    println!("{}", format_settings(&config, &path));
    Ok(())
}

/// Render a validation verdict, optionally with its trace
pub fn format_validation(result: &ValidationResult, trace: bool) -> String {
    let mut out = String::new();
    if result.is_valid {
        out.push_str(&format!("{} {}", "✓".green().bold(), result.message.green()));
    } else {
        out.push_str(&format!("{} {}", "✗".red().bold(), result.message.red()));
    }
    out.push_str(&format!(
        "\n  Notation:    {}\n  Final state: {}",
        result.notation.to_string().cyan(),
        result.final_state
    ));

    if trace {
        out.push_str(&format!("\n\n{}", "Trace".bold().underline()));
        for (i, line) in result.trace_lines().iter().enumerate() {
            out.push_str(&format!("\n  {:>3}. {}", i + 1, line));
        }
    }
    out
}

/// Render a conversion, optionally with its steps
pub fn format_conversion(result: &ConversionResult, trace: bool) -> String {
    let mut out = format!(
        "  {} {} {}",
        result.source.title().cyan(),
        "→".cyan(),
        result.target.title().cyan()
    );
    match (&result.result_expression, &result.error_message) {
        (Some(expr), _) => out.push_str(&format!("\n  {}", expr.green().bold())),
        (None, Some(message)) => out.push_str(&format!("\n  {}", message.red())),
        (None, None) => {}
    }

    if trace {
        out.push_str(&format!("\n\n{}", "Steps".bold().underline()));
        for step in &result.steps {
            out.push_str(&format!("\n  {}", step));
        }
    }
    out
}

/// Render the results of converting into every notation
pub fn format_convert_all<'a>(
    expression: &str,
    source: Notation,
    results: impl IntoIterator<Item = &'a ConversionResult>,
) -> String {
    let mut out = format!("{} ({})", expression.bold(), source);
    for result in results {
        let rendered = match &result.result_expression {
            Some(expr) => expr.green().to_string(),
            None => result
                .error_message
                .as_deref()
                .unwrap_or("conversion failed")
                .red()
                .to_string(),
        };
        out.push_str(&format!("\n  {:<8} {}", result.target.title(), rendered));
    }
    out
}

/// Render a PDA as state and transition tables
pub fn format_pda_diagram(diagram: &PdaDiagram) -> String {
    let mut out = diagram.name.bold().underline().to_string();

    out.push_str(&format!("\n\n{}", "States".bold()));
    for state in &diagram.states {
        let marker = match (state.is_initial, state.is_accepting) {
            (true, _) => "→",
            (_, true) => "*",
            _ => " ",
        };
        out.push_str(&format!(
            "\n  {} {:<20} {:<10} {}",
            marker,
            state.name.cyan(),
            state.kind.to_string(),
            state.description.dimmed()
        ));
    }

    out.push_str(&format!("\n\n{}", "Transitions".bold()));
    for t in &diagram.transitions {
        out.push_str(&format!(
            "\n  {:<20} {:<20} {}",
            t.from,
            t.to,
            t.label.green()
        ));
    }

    out.push_str(&format!(
        "\n\n  Input alphabet: {{{}}}\n  Stack alphabet: {{{}}}",
        diagram.input_alphabet.join(", "),
        diagram.stack_alphabet.join(", ")
    ));
    out
}

/// Render a trie as a node listing
pub fn format_trie_diagram(diagram: &TrieDiagram) -> String {
    let mut out = format!(
        "{} ({} states, initial {})",
        "Combo Trie".bold().underline(),
        diagram.total_states,
        diagram.initial_state
    );
    for state in &diagram.states {
        let path = if state.path.is_empty() { "ε" } else { state.path.as_str() };
        match &state.label {
            Some(label) if state.is_accept => out.push_str(&format!(
                "\n  {:>3}  {:<16} {}",
                state.id,
                path,
                label.green().bold()
            )),
            _ => out.push_str(&format!("\n  {:>3}  {}", state.id, path)),
        }
    }
    out.push_str(&format!("\n\n  {} transitions", diagram.transitions.len()));
    out
}

/// Render the effective settings
pub fn format_settings(config: &PersistentConfig, path: &std::path::Path) -> String {
    let catalogue = config
        .catalogue_path
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |p| p.display().to_string());

    format!(
        "{}\n\n  Config:    {}\n  Notation:  {}\n  Trace:     {}\n  Catalogue: {}\n  Timeout:   {} ms",
        "Settings".bold().underline(),
        path.display().to_string().cyan(),
        config.notation().to_string().green(),
        if config.show_trace() { "on".green() } else { "off".yellow() },
        catalogue.green(),
        config.timing().timeout.as_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::ComboCatalogue;
    use crate::notation::validate;

    #[test]
    fn test_format_validation_includes_trace() {
        colored::control::set_override(false);
        let result = validate("3 4 +", Notation::Postfix);
        let text = format_validation(&result, true);
        assert!(text.contains("Valid postfix expression"));
        assert!(text.contains("Token: '3' (OPERAND)"));
    }

    #[test]
    fn test_format_conversion_error() {
        colored::control::set_override(false);
        let result = ExpressionConverter::new().convert("3 +", Notation::Postfix, Notation::Infix);
        let text = format_conversion(&result, false);
        assert!(!result.success);
        assert!(text.contains("Postfix → Infix"));
    }

    #[test]
    fn test_format_pda_diagram_lists_states() {
        colored::control::set_override(false);
        let validator = ExpressionValidator::new();
        let text = format_pda_diagram(&validator.pda(Notation::Infix).diagram_data());
        assert!(text.contains("q_expect_operator"));
        assert!(text.contains("Transitions"));
    }

    #[test]
    fn test_format_trie_diagram_lists_combos() {
        colored::control::set_override(false);
        let matcher = ComboCatalogue::builtin().matcher().unwrap();
        let text = format_trie_diagram(&matcher.diagram_data());
        assert!(text.contains("Hadoken"));
    }
}
