//! Lyrics data types

use serde::{Deserialize, Serialize};

/// A single parsed lyric line
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LyricLine {
    /// Offset from track start in whole seconds (`minutes * 60 + seconds`)
    pub timestamp: u64,
    /// Sub-second digits normalized to milliseconds
    ///
    /// Kept for display and export only; matching works on whole seconds.
    #[serde(default)]
    pub sub_second_ms: u32,
    /// Display text with escape tokens resolved
    pub text: String,
    /// Position in the time-ordered sequence (0-based)
    #[serde(default)]
    pub sequence_index: usize,
}

impl LyricLine {
    /// Minute component of the timestamp
    pub fn minutes(&self) -> u64 {
        self.timestamp / 60
    }

    /// Second component of the timestamp (0..60)
    pub fn seconds(&self) -> u64 {
        self.timestamp % 60
    }
}

/// Order lines by timestamp and assign sequence indices
///
/// The sort is stable, so lines sharing a timestamp keep their textual order.
pub fn process_lyrics(lines: &mut [LyricLine]) {
    lines.sort_by_key(|line| line.timestamp);

    for (idx, line) in lines.iter_mut().enumerate() {
        line.sequence_index = idx;
    }
}
