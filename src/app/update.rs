//! Message handling for the player session

use std::io;

use crate::audio::{PlaybackClock, PlaybackStatus};
use crate::features::lyrics::engine::SyncEffect;
use crate::features::lyrics::parse_lyrics;
use crate::ui::LyricsRenderer;

use super::{App, Control, Message};

impl<R: LyricsRenderer, C: PlaybackClock> App<R, C> {
    /// Handle one message
    pub fn update(&mut self, message: Message) -> io::Result<Control> {
        match message {
            Message::Tick => return self.handle_tick(),
            Message::Play => self.handle_play()?,
            Message::Pause => self.handle_pause()?,
            Message::TogglePlayback => {
                if self.clock.is_playing() {
                    self.handle_pause()?;
                } else {
                    self.handle_play()?;
                }
            }
            Message::Restart => self.handle_restart()?,
            Message::LyricsLoaded(raw) => self.bind_lyrics(&raw)?,
            Message::LyricsFailed(error) => {
                tracing::warn!("Failed to load lyrics: {}", error);
                self.bind_lyrics("")?;
            }
            Message::InputClosed => {
                tracing::debug!("Command input closed");
                self.input_closed = true;
                if self.engine.is_completed() {
                    return Ok(Control::Exit);
                }
            }
            Message::Quit => return Ok(Control::Exit),
        }

        Ok(Control::Continue)
    }

    fn handle_tick(&mut self) -> io::Result<Control> {
        // Ticks queued before a pause are stale
        if !self.clock.is_playing() {
            return Ok(Control::Continue);
        }

        let current_time = self.clock.current_time();
        let effects = self.engine.on_time_update(current_time);
        let completed = effects
            .iter()
            .any(|effect| matches!(effect, SyncEffect::Completed { .. }));

        if !completed {
            self.renderer.show_progress(current_time, self.duration())?;
        }
        self.renderer.apply(&effects)?;

        if completed {
            self.ticker.stop();
            self.clock.pause();
            tracing::info!(title = %self.title, "Playback finished");
            if self.input_closed {
                return Ok(Control::Exit);
            }
        }

        Ok(Control::Continue)
    }

    fn handle_play(&mut self) -> io::Result<()> {
        if self.clock.is_playing() {
            return Ok(());
        }

        // Playing a finished track starts it over
        if self.engine.is_completed() || self.clock.is_finished() {
            tracing::debug!("Replaying finished track");
            self.rewind()?;
        }

        self.clock.play();
        self.ticker.start();
        tracing::debug!(position = self.clock.current_time(), "Playback resumed");
        self.renderer.show_status("playing")
    }

    fn handle_pause(&mut self) -> io::Result<()> {
        if !self.clock.is_playing() {
            return Ok(());
        }

        self.clock.pause();
        self.ticker.stop();
        tracing::debug!(position = self.clock.current_time(), "Playback paused");
        self.renderer.show_status("paused")
    }

    fn handle_restart(&mut self) -> io::Result<()> {
        self.rewind()?;
        self.renderer.show_status("restarted")
    }

    /// Seek to 0 and start a fresh sync session on the same lines
    fn rewind(&mut self) -> io::Result<()> {
        self.clock.seek(0.0);
        self.engine.reset();
        self.redraw()
    }

    /// Parse and bind a new lyric text; nothing carries over from before
    fn bind_lyrics(&mut self, raw: &str) -> io::Result<()> {
        let lines = parse_lyrics(raw);
        tracing::info!(title = %self.title, lines = lines.len(), "Lyrics bound");

        self.fallback_duration = lines
            .last()
            .map(|line| line.timestamp as f64 + self.tail_seconds);
        self.engine.bind(lines);
        self.engine.set_duration(self.duration());
        self.redraw()?;

        if self.autoplay && self.clock.status() == PlaybackStatus::Stopped {
            self.handle_play()?;
        }
        Ok(())
    }

    /// Rebuild the display from the bound lines
    fn redraw(&mut self) -> io::Result<()> {
        let heights = self.renderer.bind(&self.title, self.engine.lines())?;
        self.engine.set_line_heights(heights);
        Ok(())
    }
}
