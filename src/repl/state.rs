//! REPL state management
//!
//! Holds the validator and converter, the combo session and the user's
//! notation and trace preferences.

use crate::cli::paths::{config_file_path_with_override, PersistentConfig};
use crate::cli::session::ComboSession;
use crate::combo::{ComboCatalogue, ComboController};
use crate::notation::{ExpressionConverter, ExpressionValidator, Notation};
use anyhow::Result;
use std::path::PathBuf;

/// REPL state
pub struct ReplState {
    /// Notation assumed when a command does not name one
    pub notation: Notation,
    /// Print traces and conversion steps
    pub show_trace: bool,
    /// Validators for all three notations
    pub validator: ExpressionValidator,
    /// Notation converter
    pub converter: ExpressionConverter,
    /// Loaded combo catalogue
    pub catalogue: ComboCatalogue,
    /// Combo session driven by `press`
    pub session: ComboSession,
    config: PersistentConfig,
    config_path: Option<PathBuf>,
}

impl ReplState {
    /// Create a state with the built-in catalogue and default settings
    pub fn new() -> Result<Self> {
        Self::from_config(PersistentConfig::default(), None)
    }

    /// Create a state from a (merged) persistent configuration
    pub fn from_config(config: PersistentConfig, config_path: Option<PathBuf>) -> Result<Self> {
        let catalogue = config.catalogue()?;
        let controller = ComboController::new(&catalogue, config.timing())?;

        Ok(Self {
            notation: config.notation(),
            show_trace: config.show_trace(),
            validator: ExpressionValidator::new(),
            converter: ExpressionConverter::new(),
            catalogue,
            session: ComboSession::new(controller),
            config,
            config_path,
        })
    }

    /// Current settings as a persistent configuration
    pub fn config(&self) -> PersistentConfig {
        PersistentConfig {
            default_notation: Some(self.notation),
            show_trace: Some(self.show_trace),
            ..self.config.clone()
        }
    }

    /// Path the configuration is saved to
    pub fn config_path(&self) -> Result<PathBuf> {
        config_file_path_with_override(self.config_path.clone())
    }

    /// Persist notation and trace preferences
    pub fn save_config(&self) -> Result<()> {
        self.config().save_to(self.config_path.clone())
    }
}
