//! Core data types for the lyrics sync engine
//!
//! - `SyncState`: the mutable part of one playback session (active line, scroll offset)
//! - `SyncEffect`: what a single time update changed, consumed by the renderer
//! - `MatchPolicy`: how a playback time is mapped to a lyric line

use serde::{Deserialize, Serialize};

/// Per-session synchronization state
///
/// Created when a lyric sequence is bound and cleared on restart.
/// Never carried over to another track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SyncState {
    /// Index of the highlighted line, `None` before the first match
    active_index: Option<usize>,
    /// Accumulated viewport displacement in pixels (zero or negative)
    scroll_offset: f32,
}

impl SyncState {
    /// Fresh state: nothing active, no scroll
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active line index
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    /// Current viewport displacement in pixels
    #[cfg(test)]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    /// Clear the active line and scroll offset
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Mark a line active, returning the previously active one
    pub(super) fn activate(&mut self, index: usize) -> Option<usize> {
        self.active_index.replace(index)
    }

    /// Move the viewport up by `height` pixels
    pub(super) fn scroll_up(&mut self, height: f32) -> f32 {
        self.scroll_offset -= height;
        self.scroll_offset
    }
}

/// Changes produced by one `SyncEngine::on_time_update` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncEffect {
    /// A new line became active; all others lose their highlight
    ActiveLineChanged {
        index: usize,
        previous: Option<usize>,
    },
    /// The viewport must be translated to the new offset
    ScrollChanged { offset: f32 },
    /// Playback reached the end of the track
    ///
    /// Elapsed time display should be pinned to `duration` and the
    /// progress indicator to 100%.
    Completed { duration: f64 },
}

/// How the current playback time selects a lyric line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// The last line whose timestamp is at or before the current second
    #[default]
    LatestStarted,
    /// Only a line whose minute:second equals the current second
    ///
    /// A tick that skips over a line's second never activates it.
    ExactSecond,
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPolicy::LatestStarted => write!(f, "latest-started"),
            MatchPolicy::ExactSecond => write!(f, "exact-second"),
        }
    }
}
