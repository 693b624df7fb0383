//! Lyrics sync engine
//!
//! Maps a stream of playback-time samples onto a bound lyric sequence and
//! decides when the highlighted line changes and how far the viewport has to
//! scroll to keep it visible.
//!
//! ## Key Components
//!
//! - `SyncEngine`: owns the bound lines and the session's `SyncState`
//! - `SyncEngineConfig`: scroll threshold, fallback line height, match policy
//! - `layout`: viewport height and visible line range helpers
//!
//! The engine is driven by a single control loop; it never blocks and never
//! fails. A tick without a matching line is simply a no-op.

pub mod layout;
pub mod types;

pub use types::{MatchPolicy, SyncEffect, SyncState};

use super::parser::LyricLine;

/// Configuration for the sync engine
///
/// Distances are in logical pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncEngineConfig {
    /// Sequence index from which each transition scrolls the viewport
    /// Default: 5 (the sixth line)
    pub scroll_threshold: usize,
    /// Line height used when the renderer has not reported one
    pub line_height: f32,
    /// How playback time selects the active line
    pub match_policy: MatchPolicy,
}

impl Default for SyncEngineConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: 5,
            line_height: 32.0,
            match_policy: MatchPolicy::default(),
        }
    }
}

/// Main sync engine - tracks the active line and scroll offset for one track
#[derive(Debug, Clone)]
pub struct SyncEngine {
    /// Configuration
    config: SyncEngineConfig,
    /// Bound lyric sequence, ordered by timestamp
    lines: Vec<LyricLine>,
    /// Pixel heights reported by the renderer, by sequence index
    line_heights: Vec<f32>,
    /// Session state
    state: SyncState,
    /// Track duration in seconds, once known
    duration: Option<f64>,
    /// Set once the end of the track has been signalled
    completed: bool,
}

impl SyncEngine {
    /// Create an engine with nothing bound
    pub fn new(config: SyncEngineConfig) -> Self {
        Self {
            config,
            lines: Vec::new(),
            line_heights: Vec::new(),
            state: SyncState::new(),
            duration: None,
            completed: false,
        }
    }

    /// Attach a freshly parsed sequence
    ///
    /// Starts a new session: state, reported line heights, duration and
    /// completion are all cleared. An empty sequence is valid and never
    /// matches.
    pub fn bind(&mut self, lines: Vec<LyricLine>) {
        tracing::debug!(lines = lines.len(), "Binding lyrics to sync engine");
        self.lines = lines;
        self.line_heights.clear();
        self.duration = None;
        self.state = SyncState::new();
        self.completed = false;
    }

    /// Clear the session state, keeping the bound lines
    ///
    /// Called when playback restarts from the beginning.
    pub fn reset(&mut self) {
        self.state.reset();
        self.completed = false;
    }

    /// Set the track duration in seconds
    ///
    /// Non-finite or non-positive values are treated as unknown.
    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration.filter(|d| d.is_finite() && *d > 0.0);
    }

    /// Track duration in seconds, if known
    #[cfg(test)]
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Store the rendered pixel height of every line
    pub fn set_line_heights(&mut self, heights: Vec<f32>) {
        self.line_heights = heights;
    }

    /// Height of a line, falling back to the configured line height
    pub fn line_height(&self, index: usize) -> f32 {
        self.line_heights
            .get(index)
            .copied()
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.config.line_height)
    }

    /// Bound lyric sequence
    pub fn lines(&self) -> &[LyricLine] {
        &self.lines
    }

    /// Current session state
    #[cfg(test)]
    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Whether the end of the track has been signalled
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Feed one playback-time sample (seconds since track start)
    ///
    /// Returns the effects this sample produced, in the order the renderer
    /// should apply them. An empty result means nothing changed.
    pub fn on_time_update(&mut self, current_time: f64) -> Vec<SyncEffect> {
        let mut effects = Vec::new();

        if self.completed || !current_time.is_finite() || current_time < 0.0 {
            return effects;
        }

        if let Some(duration) = self.duration.filter(|d| current_time >= *d) {
            self.completed = true;
            tracing::debug!(current_time, duration, "Track completed");
            effects.push(SyncEffect::Completed { duration });
            return effects;
        }

        let Some(index) = self.match_line(current_time) else {
            return effects;
        };

        // Still inside the window of the active line
        if self.state.active_index() == Some(index) {
            return effects;
        }

        let previous = self.state.activate(index);
        tracing::debug!(index, ?previous, current_time, "Active lyric line changed");
        effects.push(SyncEffect::ActiveLineChanged { index, previous });

        if index >= self.config.scroll_threshold {
            // The line being left determines the step; the first activation
            // has no predecessor and uses its own height.
            let step = self.line_height(previous.unwrap_or(index));
            let offset = self.state.scroll_up(step);
            effects.push(SyncEffect::ScrollChanged { offset });
        }

        effects
    }

    /// Find the line selected by `current_time` under the configured policy
    fn match_line(&self, current_time: f64) -> Option<usize> {
        let second = current_time.floor() as u64;

        match self.config.match_policy {
            // Same minute:second as the formatted clock
            MatchPolicy::ExactSecond => self
                .lines
                .iter()
                .position(|line| line.minutes() == second / 60 && line.seconds() == second % 60),
            MatchPolicy::LatestStarted => self
                .lines
                .partition_point(|line| line.timestamp <= second)
                .checked_sub(1),
        }
    }
}
