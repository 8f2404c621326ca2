//! Fighting-game style combo detection on top of the trie matcher.
//!
//! [`ComboCatalogue`] holds named input sequences, [`TrieMatcher`] tracks
//! them symbol by symbol, and [`ComboController`] adds the wall-clock rules
//! (timeout, charged finisher, post-combo freeze) around it.
//!
//! [`TrieMatcher`]: crate::trie::TrieMatcher

mod catalogue;
mod controller;
pub mod error;
mod input;

pub use catalogue::{ComboCatalogue, ComboDefinition};
pub use controller::{ChargeZone, ComboController, ControllerEvent, TimingConfig};
pub use error::{CatalogueError, Result};
pub use input::{parse_sequence, sequence_display, ComboInput};
