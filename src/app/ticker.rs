//! Playback ticker
//!
//! Owned periodic task that feeds `Message::Tick` into the session loop
//! while playback runs.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval_at};

use super::Message;

/// Lower bound for the tick period
const MIN_PERIOD: Duration = Duration::from_millis(10);

/// Cancellable source of tick messages
pub struct PlaybackTicker {
    tx: UnboundedSender<Message>,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl PlaybackTicker {
    /// Create a stopped ticker
    pub fn new(tx: UnboundedSender<Message>, period: Duration) -> Self {
        Self {
            tx,
            period: period.max(MIN_PERIOD),
            task: None,
        }
    }

    /// Check if the ticker task is alive
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start ticking; the first tick arrives one period from now
    ///
    /// Does nothing if the ticker is already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let tx = self.tx.clone();
        let period = self.period;
        tracing::debug!(?period, "Starting playback ticker");

        self.task = Some(tokio::spawn(async move {
            let mut ticks = interval_at(tokio::time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticks.tick().await;
                if tx.send(Message::Tick).is_err() {
                    // Session loop is gone
                    break;
                }
            }
        }));
    }

    /// Stop ticking; calling it on a stopped ticker is fine
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            tracing::debug!("Stopping playback ticker");
            task.abort();
        }
    }
}

impl Drop for PlaybackTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
