//! Integration tests for CLI functionality

#[cfg(feature = "cli")]
mod cli_integration_tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;
    use tempfile::TempDir;

    use libautomata::cli::commands::{self, format_conversion, format_settings, format_validation};
    use libautomata::cli::paths::{validate_config_path, PersistentConfig};
    use libautomata::cli::session::{render_press, ComboSession, DEFAULT_HOLD};
    use libautomata::cli::{Cli, Commands};
    use libautomata::combo::{ComboCatalogue, ComboController, ComboDefinition, ComboInput};
    use libautomata::notation::{convert, validate, Notation};

    fn config_in(dir: &TempDir) -> PathBuf {
        dir.path().join("config.json")
    }

    fn run(args: &[&str]) -> anyhow::Result<()> {
        let cli = Cli::try_parse_from(args.iter().copied())?;
        commands::execute(cli.command, cli.config)
    }

    #[test]
    fn test_persistent_config_default() {
        let config = PersistentConfig::default();
        assert_eq!(config.default_notation, Some(Notation::Infix));
        assert_eq!(config.show_trace, Some(false));
        assert_eq!(config.catalogue_path, None);
        assert_eq!(config.timeout_ms, Some(1000));
    }

    #[test]
    fn test_persistent_config_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = PersistentConfig {
            default_notation: Some(Notation::Prefix),
            show_trace: Some(true),
            catalogue_path: Some(PathBuf::from("/tmp/combos.json")),
            timeout_ms: Some(500),
        };
        config.save_to(Some(path.clone())).unwrap();

        let loaded = PersistentConfig::load_from(Some(path)).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.timing().timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = PersistentConfig::load_from(Some(config_in(&dir))).unwrap();
        assert_eq!(loaded, PersistentConfig::default());
    }

    #[test]
    fn test_partial_config_file_loads() {
        let dir = TempDir::new().unwrap();
        let path = config_in(&dir);
        fs::write(&path, r#"{"default_notation": "postfix"}"#).unwrap();

        let loaded = PersistentConfig::load_from(Some(path)).unwrap();
        assert_eq!(loaded.notation(), Notation::Postfix);
        assert!(!loaded.show_trace());
        assert_eq!(loaded.timing().timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_corrupt_config_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = config_in(&dir);
        fs::write(&path, "not json").unwrap();

        let err = PersistentConfig::load_from(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_config_path_must_be_json() {
        assert!(validate_config_path(&PathBuf::from("settings.json")).is_ok());
        assert!(validate_config_path(&PathBuf::from("settings.toml")).is_err());
        assert!(validate_config_path(&PathBuf::from("settings")).is_err());
    }

    #[test]
    fn test_merge_prefers_cli_values() {
        let stored = PersistentConfig {
            default_notation: Some(Notation::Postfix),
            show_trace: Some(true),
            catalogue_path: None,
            timeout_ms: Some(800),
        };
        let cli = PersistentConfig {
            default_notation: Some(Notation::Prefix),
            show_trace: None,
            catalogue_path: None,
            timeout_ms: None,
        };
        let merged = stored.merge_with_cli(&cli);
        assert_eq!(merged.notation(), Notation::Prefix);
        assert!(merged.show_trace());
        assert_eq!(merged.timeout_ms, Some(800));
    }

    #[test]
    fn test_parse_global_config_flag() {
        let cli = Cli::parse_from(["automata", "validate", "3 4 +", "-n", "postfix", "-c", "x.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.json")));
        match cli.command {
            Commands::Validate { expression, notation, .. } => {
                assert_eq!(expression, "3 4 +");
                assert_eq!(notation, Some(Notation::Postfix));
            }
            _ => panic!("Wrong command type"),
        }
    }

    #[test]
    fn test_unknown_notation_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["automata", "validate", "3", "-n", "sideways"]).is_err());
    }

    #[test]
    fn test_diagram_notation_conflicts_with_combos() {
        assert!(Cli::try_parse_from(["automata", "diagram", "-n", "infix", "--combos"]).is_err());
    }

    #[test]
    fn test_validate_command_exit_status() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let config = config.to_str().unwrap();

        assert!(run(&["automata", "-c", config, "validate", "(3+4)*2"]).is_ok());
        let err = run(&["automata", "-c", config, "validate", "(3+4"]).unwrap_err();
        assert_eq!(err.to_string(), "Unmatched opening parenthesis");
    }

    #[test]
    fn test_convert_commands() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let config = config.to_str().unwrap();

        assert!(run(&["automata", "-c", config, "convert", "3 4 + 2 *", "-f", "postfix", "-t", "infix"]).is_ok());
        assert!(run(&["automata", "-c", config, "convert", "3 +", "-f", "postfix", "-t", "prefix"]).is_err());
        assert!(run(&["automata", "-c", config, "convert-all", "(3+4)*2"]).is_ok());
        assert!(run(&["automata", "-c", config, "convert-all", "+"]).is_err());
    }

    #[test]
    fn test_settings_command_persists() {
        let dir = TempDir::new().unwrap();
        let path = config_in(&dir);
        let config = path.to_str().unwrap();

        run(&["automata", "-c", config, "settings", "--set-notation", "postfix", "--set-timeout-ms", "600"]).unwrap();
        let saved = PersistentConfig::load_from(Some(path.clone())).unwrap();
        assert_eq!(saved.notation(), Notation::Postfix);
        assert_eq!(saved.timeout_ms, Some(600));

        // The stored notation becomes the default for validate
        assert!(run(&["automata", "-c", config, "validate", "3 4 +"]).is_ok());

        run(&["automata", "-c", config, "settings", "--reset"]).unwrap();
        let reset = PersistentConfig::load_from(Some(path)).unwrap();
        assert_eq!(reset, PersistentConfig::default());
    }

    #[test]
    fn test_match_and_diagram_with_catalogue_file() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let config = config.to_str().unwrap();
        let catalogue_path = dir.path().join("combos.json");
        ComboCatalogue::new(vec![ComboDefinition::new(
            "Uppercut",
            vec![ComboInput::Down, ComboInput::Up, ComboInput::Space],
        )])
        .save(&catalogue_path)
        .unwrap();
        let catalogue = catalogue_path.to_str().unwrap();

        assert!(run(&["automata", "-c", config, "match", "D", "U", "S", "--catalogue", catalogue]).is_ok());
        assert!(run(&["automata", "-c", config, "match", "D", "jump"]).is_err());
        assert!(run(&["automata", "-c", config, "diagram", "--combos", "--catalogue", catalogue]).is_ok());
        assert!(run(&["automata", "-c", config, "diagram", "-n", "prefix", "--json"]).is_ok());
        assert!(run(&["automata", "-c", config, "combos", "--catalogue", "/nonexistent/combos.json"]).is_err());
    }

    #[test]
    fn test_format_helpers() {
        colored::control::set_override(false);

        let invalid = validate("3 +", Notation::Postfix);
        let text = format_validation(&invalid, false);
        assert!(text.starts_with("✗ Not enough operands for operator '+'"));
        assert!(text.contains("Final state: q_error"));

        let result = convert("(3+4)*2", Notation::Infix, Notation::Prefix);
        let text = format_conversion(&result, true);
        assert!(text.contains("Infix → Prefix"));
        assert!(text.contains("* + 3 4 2"));
        assert!(text.contains("Final result (reversed): * + 3 4 2"));

        let text = format_settings(&PersistentConfig::default(), &PathBuf::from("c.json"));
        assert!(text.contains("Catalogue: built-in"));
        assert!(text.contains("Timeout:   1000 ms"));
    }

    #[test]
    fn test_session_detects_and_recovers_from_freeze() {
        colored::control::set_override(false);
        let controller =
            ComboController::new(&ComboCatalogue::builtin(), Default::default()).unwrap();
        let mut session = ComboSession::new(controller);

        for _ in 0..3 {
            session.press(ComboInput::Right, DEFAULT_HOLD);
        }
        let events = session.press(ComboInput::Space, DEFAULT_HOLD);
        let lines = render_press(ComboInput::Space, &events);
        assert!(lines.iter().any(|l| l.contains("COMBO Hadoken")));

        // The freeze has been waited out, so the next input counts
        assert!(!session.controller().is_frozen());
        let events = session.press(ComboInput::Up, DEFAULT_HOLD);
        assert!(!events.is_empty());
        assert_eq!(session.history(), "↑");
    }

    #[test]
    fn test_session_timeout_and_ignored_finisher() {
        colored::control::set_override(false);
        let controller =
            ComboController::new(&ComboCatalogue::builtin(), Default::default()).unwrap();
        let mut session = ComboSession::new(controller);

        let events = session.press(ComboInput::Space, DEFAULT_HOLD);
        assert_eq!(render_press(ComboInput::Space, &events), vec!["␣ ignored"]);

        session.press(ComboInput::Right, DEFAULT_HOLD);
        session.press(ComboInput::Right, DEFAULT_HOLD);
        assert_eq!(session.progress_percent(), 22);
        session.wait(Duration::from_millis(1500));
        assert_eq!(session.history(), "-");
        assert_eq!(session.progress_percent(), 0);
    }
}
