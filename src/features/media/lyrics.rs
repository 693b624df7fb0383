//! Lyrics resource loading
//!
//! Loads the raw lyric text for a track from a local file or an HTTP(S) URL.
//! The resource is either a JSON document carrying the text in a `lyric`
//! field, or the escaped lyric text itself. Parsing is left to
//! `features::lyrics`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Supported lyrics file extensions, in lookup order
const LYRICS_EXTENSIONS: &[&str] = &[
    "json", // {"lyric": "..."} document
    "lrc",  // Escaped or plain bracket-timestamp text
    "txt",
];

/// JSON lyric document; fields other than `lyric` are ignored
#[derive(Debug, Deserialize)]
struct LyricDocument {
    #[serde(default)]
    lyric: String,
}

/// Load raw lyric text from a path or URL
///
/// Failures are returned to the caller as-is; there is no retry.
pub async fn load_lyrics(location: &str) -> Result<String> {
    let content = if is_remote(location) {
        fetch_remote(location).await?
    } else {
        tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("Failed to read lyrics file {}", location))?
    };

    let text = extract_lyric_text(&content)
        .with_context(|| format!("Invalid lyrics document {}", location))?;
    tracing::debug!("Loaded {} bytes of lyric text from {}", text.len(), location);
    Ok(text)
}

/// Check whether a location should be fetched over HTTP
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

async fn fetch_remote(url: &str) -> Result<String> {
    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to fetch lyrics from {}", url))?
        .error_for_status()
        .with_context(|| format!("Lyrics request to {} failed", url))?;

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read lyrics response from {}", url))?;
    Ok(body)
}

/// Unwrap a JSON lyric document, or pass raw text through
///
/// A document without a `lyric` field yields empty text.
fn extract_lyric_text(content: &str) -> Result<String> {
    if content.trim_start().starts_with('{') {
        let document: LyricDocument = serde_json::from_str(content)?;
        Ok(document.lyric)
    } else {
        Ok(content.to_string())
    }
}

/// Check whether a path names a lyrics resource rather than an audio file
pub fn is_lyrics_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| LYRICS_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Find a lyrics file with the same name as an audio file
/// Searches for all supported extensions
pub fn find_lyrics_file(audio_path: &Path) -> Option<PathBuf> {
    let parent = audio_path.parent()?;
    let stem = audio_path.file_stem()?.to_str()?;

    for ext in LYRICS_EXTENSIONS {
        // Try lowercase extension
        let path = parent.join(format!("{}.{}", stem, ext));
        if path.exists() {
            return Some(path);
        }

        // Try uppercase extension
        let path = parent.join(format!("{}.{}", stem, ext.to_uppercase()));
        if path.exists() {
            return Some(path);
        }
    }

    None
}
