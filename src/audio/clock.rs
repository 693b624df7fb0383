//! Playback clock
//!
//! The sync engine only needs to know where playback is. `PlaybackClock`
//! is that view of a player; `SimulatedClock` implements it with a
//! monotonic timer so lyrics can be followed without an audio backend.

use std::time::Duration;
use tokio::time::Instant;

/// Playback status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Source of playback position and transport control
pub trait PlaybackClock {
    /// Current position in seconds, never past the duration
    fn current_time(&self) -> f64;

    /// Track length in seconds, once known
    fn duration(&self) -> Option<f64>;

    /// Current transport status
    fn status(&self) -> PlaybackStatus;

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback, keeping the position
    fn pause(&mut self);

    /// Move to a position in seconds
    fn seek(&mut self, position: f64);

    /// Check if playing
    fn is_playing(&self) -> bool {
        self.status() == PlaybackStatus::Playing
    }

    /// Check if the position has reached the end of the track
    fn is_finished(&self) -> bool {
        self.duration()
            .is_some_and(|duration| self.current_time() >= duration)
    }
}

/// Clock that advances in real time while "playing"
#[derive(Debug, Clone)]
pub struct SimulatedClock {
    /// Track length
    duration: Option<Duration>,
    /// Position accumulated up to the last pause/seek
    position: Duration,
    /// When the current playing stretch began
    playing_since: Option<Instant>,
    /// Whether play has ever been requested
    started: bool,
}

impl SimulatedClock {
    /// Create a stopped clock at position 0
    pub fn new(duration: Option<Duration>) -> Self {
        Self {
            duration,
            position: Duration::ZERO,
            playing_since: None,
            started: false,
        }
    }

    fn elapsed(&self) -> Duration {
        let running = self
            .playing_since
            .map(|since| since.elapsed())
            .unwrap_or_default();
        let position = self.position + running;
        match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        }
    }
}

impl PlaybackClock for SimulatedClock {
    fn current_time(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    fn duration(&self) -> Option<f64> {
        self.duration.map(|d| d.as_secs_f64())
    }

    fn status(&self) -> PlaybackStatus {
        if self.playing_since.is_some() {
            PlaybackStatus::Playing
        } else if self.started {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Stopped
        }
    }

    fn play(&mut self) {
        if self.playing_since.is_none() {
            self.playing_since = Some(Instant::now());
            self.started = true;
        }
    }

    fn pause(&mut self) {
        if self.playing_since.is_some() {
            self.position = self.elapsed();
            self.playing_since = None;
        }
    }

    fn seek(&mut self, position: f64) {
        let position = if position.is_finite() {
            Duration::from_secs_f64(position.max(0.0))
        } else {
            Duration::ZERO
        };
        self.position = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };
        if self.playing_since.is_some() {
            self.playing_since = Some(Instant::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_advances_only_while_playing() {
        let mut clock = SimulatedClock::new(Some(Duration::from_secs(60)));
        assert_eq!(clock.status(), PlaybackStatus::Stopped);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.current_time(), 0.0);

        clock.play();
        tokio::time::advance(Duration::from_secs(3)).await;
        assert_eq!(clock.current_time(), 3.0);

        clock.pause();
        assert_eq!(clock.status(), PlaybackStatus::Paused);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(clock.current_time(), 3.0);

        clock.play();
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(clock.current_time(), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clamped_to_duration() {
        let mut clock = SimulatedClock::new(Some(Duration::from_secs(4)));
        clock.play();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(clock.current_time(), 4.0);
        assert!(clock.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek() {
        let mut clock = SimulatedClock::new(None);
        clock.play();
        tokio::time::advance(Duration::from_secs(7)).await;
        clock.seek(0.0);
        assert_eq!(clock.current_time(), 0.0);
        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(clock.current_time(), 1.0);
        assert!(!clock.is_finished());

        clock.seek(-3.0);
        assert_eq!(clock.current_time(), 0.0);
    }
}
