//! UI module
//!
//! The renderer draws what the sync engine decided; it never decides which
//! line is active itself.
//!
//! - `LyricsRenderer`: what the player session needs from a display
//! - `terminal`: full-screen ratatui implementation

pub mod terminal;

pub use terminal::{TerminalRenderer, TerminalRendererConfig};

use std::io;

use crate::features::lyrics::LyricLine;
use crate::features::lyrics::engine::SyncEffect;

/// Display collaborator of the player session
pub trait LyricsRenderer {
    /// Build the display for a freshly bound sequence
    ///
    /// Returns the laid-out pixel height of every line, by sequence index.
    fn bind(&mut self, title: &str, lines: &[LyricLine]) -> io::Result<Vec<f32>>;

    /// Apply the effects of one time update
    fn apply(&mut self, effects: &[SyncEffect]) -> io::Result<()>;

    /// Show elapsed time, total time and progress
    fn show_progress(&mut self, current: f64, duration: Option<f64>) -> io::Result<()>;

    /// Show a short transport status message (playing, paused, ...)
    fn show_status(&mut self, status: &str) -> io::Result<()>;
}
