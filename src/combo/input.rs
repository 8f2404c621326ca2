//! Combo input alphabet.

use std::fmt;
use std::str::FromStr;

use super::CatalogueError;

/// One discrete controller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "UPPERCASE")
)]
pub enum ComboInput {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Finisher; its hold time decides a charged combo
    Space,
}

impl ComboInput {
    /// Every input.
    pub const ALL: [ComboInput; 5] = [
        ComboInput::Up,
        ComboInput::Down,
        ComboInput::Left,
        ComboInput::Right,
        ComboInput::Space,
    ];

    /// Upper-case name, as used in catalogue files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Space => "SPACE",
        }
    }

    /// Display glyph.
    pub fn glyph(self) -> char {
        match self {
            Self::Up => '↑',
            Self::Down => '↓',
            Self::Left => '←',
            Self::Right => '→',
            Self::Space => '␣',
        }
    }

    /// True for the finisher key.
    pub fn is_finisher(self) -> bool {
        self == Self::Space
    }
}

impl fmt::Display for ComboInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

impl FromStr for ComboInput {
    type Err = CatalogueError;

    /// Accepts names (any case), single-letter shorthands and glyphs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let input = match trimmed.to_ascii_uppercase().as_str() {
            "UP" | "U" | "↑" => Self::Up,
            "DOWN" | "D" | "↓" => Self::Down,
            "LEFT" | "L" | "←" => Self::Left,
            "RIGHT" | "R" | "→" => Self::Right,
            "SPACE" | "S" | "␣" | "_" => Self::Space,
            _ => return Err(CatalogueError::UnknownInput(trimmed.to_string())),
        };
        Ok(input)
    }
}

/// Render a sequence as space-separated glyphs.
pub fn sequence_display(sequence: &[ComboInput]) -> String {
    sequence
        .iter()
        .map(|input| input.glyph().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse whitespace or comma separated inputs.
pub fn parse_sequence(text: &str) -> Result<Vec<ComboInput>, CatalogueError> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}
