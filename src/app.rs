//! Player session module
//!
//! One control loop owns the playback clock, the sync engine, the ticker and
//! the renderer. Every state change happens inside `App::update`, driven by
//! messages from the ticker, the key reader and the lyrics loader.

mod message;
pub mod ticker;
mod update;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::audio::{PlaybackClock, SimulatedClock};
use crate::features::Settings;
use crate::features::lyrics::engine::SyncEngine;
use crate::ui::LyricsRenderer;
pub use message::Message;
pub use ticker::PlaybackTicker;

/// What the loop should do after handling a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Player session state
pub struct App<R: LyricsRenderer, C: PlaybackClock = SimulatedClock> {
    /// Track name shown above the lyrics
    title: String,
    clock: C,
    engine: SyncEngine,
    ticker: PlaybackTicker,
    renderer: R,
    /// Start playing as soon as lyrics are bound
    autoplay: bool,
    /// Extra seconds after the last line when the track length is unknown
    tail_seconds: f64,
    /// Duration derived from the lyrics when the clock has none
    fallback_duration: Option<f64>,
    /// No more commands will arrive
    input_closed: bool,
}

impl<R: LyricsRenderer, C: PlaybackClock> App<R, C> {
    /// Create a session; nothing is drawn until lyrics arrive
    pub fn new(
        title: impl Into<String>,
        settings: &Settings,
        clock: C,
        renderer: R,
        tx: UnboundedSender<Message>,
    ) -> Self {
        let period = Duration::from_millis(settings.playback.tick_interval_ms);

        Self {
            title: title.into(),
            clock,
            engine: SyncEngine::new(settings.sync.engine_config()),
            ticker: PlaybackTicker::new(tx, period),
            renderer,
            autoplay: settings.playback.autoplay,
            tail_seconds: settings.playback.tail_seconds.max(0.0),
            fallback_duration: None,
            input_closed: false,
        }
    }

    /// Sync engine of the current track
    #[cfg(test)]
    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    /// Playback clock
    #[cfg(test)]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Renderer
    #[cfg(test)]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Check if the ticker is producing ticks
    #[cfg(test)]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Track length in seconds: from the clock, else derived from the lyrics
    pub fn duration(&self) -> Option<f64> {
        self.clock.duration().or(self.fallback_duration)
    }

    /// Process messages until `Quit` or the channel closes
    pub async fn run(mut self, mut rx: UnboundedReceiver<Message>) -> anyhow::Result<()> {
        tracing::info!(title = %self.title, "Player session started");

        while let Some(message) = rx.recv().await {
            if self.update(message)? == Control::Exit {
                break;
            }
        }

        self.ticker.stop();
        tracing::info!("Player session ended");
        Ok(())
    }
}

/// Forward key presses to the session loop
///
/// Sends `InputClosed` once the terminal event stream ends.
pub fn spawn_key_reader(tx: UnboundedSender<Message>) {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        while let Some(event) = events.next().await {
            match event {
                Ok(Event::Key(key)) => {
                    let Some(message) = Message::from_key(key) else {
                        continue;
                    };
                    if tx.send(message).is_err() {
                        tracing::debug!("Session loop closed, stopping key reader");
                        return;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to read terminal input: {}", e);
                    break;
                }
            }
        }

        if tx.send(Message::InputClosed).is_err() {
            tracing::debug!("Session loop closed before input ended");
        }
    });
}
