//! lyric-scroll - Terminal lyrics player
//! Follows a playback clock and keeps time-coded lyrics scrolling in sync

mod app;
mod audio;
mod features;
mod ui;
mod utils;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use app::{App, Message};
use audio::{SimulatedClock, read_metadata};
use audio::metadata::title_from_path;
use features::Settings;
use features::lyrics::engine::MatchPolicy;
use features::lyrics::{parse_lyrics, stringify_lyrics};
use features::media::{find_lyrics, is_lyrics_file, is_remote, load_lyrics};
use ui::{TerminalRenderer, TerminalRendererConfig};

#[derive(Parser, Debug)]
#[command(name = "lyric-scroll", version, about)]
struct Args {
    /// Audio file, lyrics file (.json/.lrc/.txt) or lyrics URL
    #[arg(required_unless_present = "save_settings")]
    input: Option<String>,

    /// Lyrics path or URL (default: same-name file next to the audio file)
    #[arg(long, short = 'l')]
    lyrics: Option<String>,

    /// Track length in seconds
    #[arg(long, short = 'd')]
    duration: Option<f64>,

    /// Only activate a line during the exact second of its timestamp
    #[arg(long)]
    exact_second: bool,

    /// Tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Line index from which the view starts scrolling
    #[arg(long)]
    threshold: Option<usize>,

    /// Print the parsed lyrics in escaped form and exit
    #[arg(long)]
    dump: bool,

    /// Write the effective settings (file plus flags) to the settings file and exit
    #[arg(long)]
    save_settings: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// What to play, resolved from the command line
struct Track {
    title: String,
    lyrics: Option<String>,
    duration: Option<Duration>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = apply_overrides(Settings::load(), &args);
    if args.save_settings {
        settings.save()?;
        if let Some(path) = Settings::file_path() {
            tracing::info!("Settings saved to {}", path.display());
        }
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("No input given");
    };
    let track = resolve_track(input, &args);

    if args.dump {
        let location = track
            .lyrics
            .ok_or_else(|| anyhow::anyhow!("No lyrics found for {}", input))?;
        let raw = load_lyrics(&location).await?;
        print!("{}", stringify_lyrics(&parse_lyrics(&raw)));
        return Ok(());
    }

    let (tx, rx) = mpsc::unbounded_channel();

    // Lyrics arrive as a message, like any other input
    let loader_tx = tx.clone();
    let location = track.lyrics;
    tokio::spawn(async move {
        let message = match location {
            Some(location) => match load_lyrics(&location).await {
                Ok(raw) => Message::LyricsLoaded(raw),
                Err(e) => Message::LyricsFailed(format!("{:#}", e)),
            },
            None => Message::LyricsFailed("no lyrics file found".to_string()),
        };
        if loader_tx.send(message).is_err() {
            tracing::debug!("Session loop closed before lyrics arrived");
        }
    });

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let renderer = TerminalRenderer::new(
        terminal,
        TerminalRendererConfig {
            row_height: settings.sync.line_height,
            show_progress: settings.display.show_progress,
        },
    );
    let clock = SimulatedClock::new(track.duration);
    let session = App::new(track.title, &settings, clock, renderer, tx.clone());

    app::spawn_key_reader(tx);
    let result = session.run(rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;

    result
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command line flags win over the settings file
fn apply_overrides(mut settings: Settings, args: &Args) -> Settings {
    if args.exact_second {
        settings.sync.match_policy = MatchPolicy::ExactSecond;
    }
    if let Some(tick_ms) = args.tick_ms {
        settings.playback.tick_interval_ms = tick_ms;
    }
    if let Some(threshold) = args.threshold {
        settings.sync.scroll_threshold = threshold;
    }
    settings
}

/// Work out title, lyrics location and duration for the input
fn resolve_track(input: &str, args: &Args) -> Track {
    let explicit_duration = args
        .duration
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(Duration::from_secs_f64);

    if is_remote(input) {
        let title = input
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(input)
            .to_string();
        return Track {
            title,
            lyrics: Some(args.lyrics.clone().unwrap_or_else(|| input.to_string())),
            duration: explicit_duration,
        };
    }

    let path = PathBuf::from(input);
    if is_lyrics_file(&path) {
        return Track {
            title: title_from_path(&path),
            lyrics: Some(args.lyrics.clone().unwrap_or_else(|| input.to_string())),
            duration: explicit_duration,
        };
    }

    // Audio file: tags for title and length, lyrics from a same-name file
    let (title, tagged_duration) = read_track_info(&path);
    let lyrics = args.lyrics.clone().or_else(|| {
        find_lyrics(&path).map(|found| {
            tracing::info!("Found lyrics file {}", found.display());
            found.to_string_lossy().into_owned()
        })
    });

    Track {
        title,
        lyrics,
        duration: explicit_duration.or(tagged_duration),
    }
}

fn read_track_info(path: &Path) -> (String, Option<Duration>) {
    match read_metadata(path) {
        Ok(meta) => {
            tracing::info!(
                "Track: {} ({:.1}s)",
                meta.display_name(),
                meta.duration.as_secs_f64()
            );
            let duration = Some(meta.duration).filter(|d| !d.is_zero());
            (meta.display_name(), duration)
        }
        Err(e) => {
            tracing::warn!("Failed to read metadata for {}: {:#}", path.display(), e);
            (title_from_path(path), None)
        }
    }
}
