//! Player store and its persistence codec
//!
//! The in-memory map of canonical key to player record, plus the
//! line-oriented text format that is the engine's only durable state.

pub mod codec;
pub mod players;

// Re-export commonly used types
pub use codec::{encode_line, parse_line};
pub use players::{LoadedRecord, MergeStats, PlayerStore};
