//! Media resource discovery
//!
//! Locates and loads the lyric resource for a track:
//! 1. An explicit path or URL
//! 2. A same-name lyrics file next to the audio file (song.mp3 -> song.json/lrc/txt)

use std::path::{Path, PathBuf};

pub mod lyrics;

pub use lyrics::{is_lyrics_file, is_remote, load_lyrics};

/// Find a lyrics file for an audio file
///
/// Priority: `.json`, `.lrc`, `.txt` (lowercase before uppercase)
pub fn find_lyrics(audio_path: &Path) -> Option<PathBuf> {
    lyrics::find_lyrics_file(audio_path)
}
