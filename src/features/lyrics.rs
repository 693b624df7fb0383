//! Lyrics module - parsing and synchronization
//!
//! - `parser`: escaped bracket-timestamp lyrics parsing
//! - `engine`: maps playback time to the active line and scroll offset

pub mod engine;
pub mod parser;

// Re-export commonly used items
pub use parser::*;
