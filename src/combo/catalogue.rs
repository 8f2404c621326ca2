//! Combo definitions and the built-in catalogue.

use std::fmt::Write as _;
#[cfg(feature = "serialization")]
use std::path::Path;

use super::error::Result;
#[cfg(feature = "serialization")]
use super::error::CatalogueError;
use super::input::{sequence_display, ComboInput};
use crate::trie::{DuplicatePolicy, MatcherConfig, Pattern, TrieMatcher};

/// A named input sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ComboDefinition {
    /// Combo name
    pub name: String,
    /// Inputs in order, normally ending with `Space`
    pub sequence: Vec<ComboInput>,
}

impl ComboDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, sequence: Vec<ComboInput>) -> Self {
        Self {
            name: name.into(),
            sequence,
        }
    }
}

/// An ordered set of combos.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ComboCatalogue {
    combos: Vec<ComboDefinition>,
}

impl ComboCatalogue {
    /// Catalogue from explicit definitions.
    pub fn new(combos: Vec<ComboDefinition>) -> Self {
        Self { combos }
    }

    /// The ten built-in combos.
    pub fn builtin() -> Self {
        use ComboInput::{Down as D, Left as L, Right as R, Space as S, Up as U};

        let combos = vec![
            ComboDefinition::new("Hadoken", vec![R, R, R, S]),
            ComboDefinition::new("Shoryuken", vec![U, D, U, R, S]),
            ComboDefinition::new("Tatsumaki", vec![L, R, L, R, S]),
            ComboDefinition::new("Dragon Punch", vec![U, U, D, R, S]),
            ComboDefinition::new("Hurricane Kick", vec![R, D, R, R, S]),
            ComboDefinition::new("Giga Hadoken", vec![R, R, R, D, U, R, S]),
            ComboDefinition::new("Ultra Shoryuken", vec![R, R, D, R, U, D, R, S]),
            ComboDefinition::new("Mega Tatsumaki", vec![U, U, D, R, R, R, R, S]),
            ComboDefinition::new("Final Dragon Punch", vec![L, U, R, R, D, U, R, S]),
            ComboDefinition::new(
                "Ultimate Hurricane Kick",
                vec![R, R, U, D, R, U, R, R, S],
            ),
        ];
        Self::new(combos)
    }

    /// All combos in declaration order.
    pub fn combos(&self) -> &[ComboDefinition] {
        &self.combos
    }

    /// Number of combos.
    pub fn len(&self) -> usize {
        self.combos.len()
    }

    /// True if there are no combos.
    pub fn is_empty(&self) -> bool {
        self.combos.is_empty()
    }

    /// Look up a combo by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&ComboDefinition> {
        self.combos
            .iter()
            .find(|combo| combo.name.eq_ignore_ascii_case(name))
    }

    /// Matcher configuration for these combos.
    pub fn matcher_config(&self, policy: DuplicatePolicy) -> MatcherConfig<ComboInput> {
        let patterns = self
            .combos
            .iter()
            .map(|combo| Pattern::new(combo.sequence.clone(), combo.name.clone()))
            .collect();
        MatcherConfig::new(patterns).with_duplicate_policy(policy)
    }

    /// Compile into a matcher with the default duplicate policy.
    pub fn matcher(&self) -> Result<TrieMatcher<ComboInput>> {
        Ok(TrieMatcher::build(self.matcher_config(DuplicatePolicy::default()))?)
    }

    /// Plain-text table of combos.
    pub fn render_table(&self) -> String {
        let rule = "=".repeat(64);
        let mut out = String::new();
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{:<4} {:<34} {}", "No", "Sequence", "Combo");
        let _ = writeln!(out, "{}", "-".repeat(64));
        for (i, combo) in self.combos.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4} {:<34} {}",
                i + 1,
                sequence_display(&combo.sequence),
                combo.name
            );
        }
        let _ = writeln!(out, "{}", rule);
        let _ = write!(out, "Total: {} combos", self.combos.len());
        out
    }
}

#[cfg(feature = "serialization")]
impl ComboCatalogue {
    /// Parse a catalogue from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a catalogue file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write a catalogue file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|source| CatalogueError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ComboCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}
