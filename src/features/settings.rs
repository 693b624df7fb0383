//! Application settings persistence
//!
//! Handles saving and loading user preferences.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::lyrics::engine::{MatchPolicy, SyncEngineConfig};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Lyrics synchronization settings
    #[serde(default)]
    pub sync: SyncSettings,
    /// Playback settings
    #[serde(default)]
    pub playback: PlaybackSettings,
    /// Display settings
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Lyrics synchronization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    /// Sequence index from which the viewport starts scrolling
    pub scroll_threshold: usize,
    /// Fallback line height in pixels
    pub line_height: f32,
    /// How playback time selects the active line
    pub match_policy: MatchPolicy,
}

/// Playback-related settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Interval between playback ticks in milliseconds
    pub tick_interval_ms: u64,
    /// Start playing as soon as the track is loaded
    pub autoplay: bool,
    /// Seconds added after the last lyric line when no duration is known
    pub tail_seconds: f64,
}

/// Display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Draw the elapsed/total time gauge below the lyrics
    pub show_progress: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        let engine = SyncEngineConfig::default();
        Self {
            scroll_threshold: engine.scroll_threshold,
            line_height: engine.line_height,
            match_policy: engine.match_policy,
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            autoplay: true,
            tail_seconds: 5.0,
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

impl SyncSettings {
    /// Build the sync engine configuration
    pub fn engine_config(&self) -> SyncEngineConfig {
        SyncEngineConfig {
            scroll_threshold: self.scroll_threshold,
            line_height: self.line_height,
            match_policy: self.match_policy,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "lyric-scroll", "LyricScroll")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return defaults if not found
    pub fn load() -> Self {
        Self::file_path()
            .and_then(|path| match Self::load_from_file(&path) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    tracing::debug!("Using default settings ({:?}): {}", path, e);
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SettingsError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))
    }

    /// Save settings to the default file
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(path) = Self::file_path() {
            self.save_to_file(&path)
        } else {
            Err(SettingsError::Io(
                "Could not determine config directory".to_string(),
            ))
        }
    }

    /// Save settings to a specific file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SettingsError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io(e.to_string()))?;
        }

        let content =
            serde_json::to_string_pretty(self).map_err(|e| SettingsError::Parse(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| SettingsError::Io(e.to_string()))?;
        Ok(())
    }
}

/// Errors that can occur with settings
#[derive(Debug, Clone)]
pub enum SettingsError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}
