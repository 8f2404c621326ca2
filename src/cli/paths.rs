//! Default paths and persistent user configuration

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::combo::{ComboCatalogue, TimingConfig};
use crate::notation::Notation;

/// Get the configuration directory for libautomata
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine configuration directory")?;
    Ok(base.join("libautomata"))
}

/// Get the default user config path
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.json"))
}

/// Get the config file path with optional override
pub fn config_file_path_with_override(custom_path: Option<PathBuf>) -> Result<PathBuf> {
    match custom_path {
        Some(path) => {
            validate_config_path(&path)?;
            Ok(path)
        }
        None => default_config_path(),
    }
}

/// Validate that a config file path has .json extension
pub fn validate_config_path(path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(()),
        Some(ext) => Err(anyhow::anyhow!(
            "Config file must have .json extension, got .{}. Please use a .json file.",
            ext
        )),
        None => Err(anyhow::anyhow!(
            "Config file must have .json extension. Please add .json to the filename."
        )),
    }
}

/// User preferences stored in the config file.
///
/// Every field is optional so that a partially written file still loads and
/// command-line flags can be layered on top with [`merge_with_cli`].
/// Automaton state is never stored here.
///
/// [`merge_with_cli`]: PersistentConfig::merge_with_cli
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PersistentConfig {
    /// Notation assumed when a command does not name one
    pub default_notation: Option<Notation>,
    /// Print validation traces and conversion steps
    pub show_trace: Option<bool>,
    /// Combo catalogue file used instead of the built-in combos
    pub catalogue_path: Option<PathBuf>,
    /// Inter-input combo timeout in milliseconds
    pub timeout_ms: Option<u64>,
}

impl PersistentConfig {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from custom path
    pub fn load_from(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = config_file_path_with_override(custom_path)?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(None)
    }

    /// Save configuration to custom path
    pub fn save_to(&self, custom_path: Option<PathBuf>) -> Result<()> {
        let path = config_file_path_with_override(custom_path)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Merge with command-line options (CLI options take precedence)
    pub fn merge_with_cli(&self, cli: &PersistentConfig) -> Self {
        Self {
            default_notation: cli.default_notation.or(self.default_notation),
            show_trace: cli.show_trace.or(self.show_trace),
            catalogue_path: cli
                .catalogue_path
                .clone()
                .or_else(|| self.catalogue_path.clone()),
            timeout_ms: cli.timeout_ms.or(self.timeout_ms),
        }
    }

    /// Effective default notation
    pub fn notation(&self) -> Notation {
        self.default_notation.unwrap_or(Notation::Infix)
    }

    /// Effective trace flag
    pub fn show_trace(&self) -> bool {
        self.show_trace.unwrap_or(false)
    }

    /// Combo timing with the configured timeout applied
    pub fn timing(&self) -> TimingConfig {
        let timing = TimingConfig::default();
        match self.timeout_ms {
            Some(ms) => timing.with_timeout(Duration::from_millis(ms)),
            None => timing,
        }
    }

    /// Load the configured catalogue, or the built-in one
    pub fn catalogue(&self) -> Result<ComboCatalogue> {
        match &self.catalogue_path {
            Some(path) => ComboCatalogue::load(path)
                .with_context(|| format!("Failed to load catalogue: {}", path.display())),
            None => Ok(ComboCatalogue::builtin()),
        }
    }
}

impl Default for PersistentConfig {
    fn default() -> Self {
        Self {
            default_notation: Some(Notation::Infix),
            show_trace: Some(false),
            catalogue_path: None,
            timeout_ms: Some(TimingConfig::default().timeout.as_millis() as u64),
        }
    }
}
