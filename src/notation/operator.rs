//! Operator precedence and associativity.

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Associativity {
    /// `a - b - c` groups as `(a - b) - c`
    Left,
    /// `a ^ b ^ c` groups as `a ^ (b ^ c)`
    Right,
}

/// Precedence and associativity of one operator symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct OperatorInfo {
    /// Operator text
    pub symbol: String,
    /// Higher binds tighter
    pub precedence: u8,
    /// Grouping of equal-precedence chains
    pub associativity: Associativity,
}

/// Operator table consulted by the Shunting-yard conversions.
///
/// The default table is `+ -` at precedence 1 and `* /` at precedence 2,
/// all left-associative.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct OperatorTable {
    operators: Vec<OperatorInfo>,
}

impl OperatorTable {
    /// Build a table from entries. Later entries shadow earlier ones.
    pub fn new(operators: Vec<OperatorInfo>) -> Self {
        Self { operators }
    }

    /// Entry for `symbol`.
    pub fn get(&self, symbol: &str) -> Option<&OperatorInfo> {
        self.operators.iter().rev().find(|op| op.symbol == symbol)
    }

    /// Precedence of `symbol`, 0 if unknown.
    pub fn precedence(&self, symbol: &str) -> u8 {
        self.get(symbol).map_or(0, |op| op.precedence)
    }

    /// Unknown symbols count as left-associative.
    pub fn is_left_associative(&self, symbol: &str) -> bool {
        self.get(symbol)
            .map_or(true, |op| op.associativity == Associativity::Left)
    }

    /// True if `symbol` has an entry.
    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// All entries.
    pub fn operators(&self) -> &[OperatorInfo] {
        &self.operators
    }
}

impl Default for OperatorTable {
    fn default() -> Self {
        let entry = |symbol: &str, precedence| OperatorInfo {
            symbol: symbol.to_string(),
            precedence,
            associativity: Associativity::Left,
        };
        Self::new(vec![
            entry("+", 1),
            entry("-", 1),
            entry("*", 2),
            entry("/", 2),
        ])
    }
}
