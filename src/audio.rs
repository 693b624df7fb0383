//! Audio playback module
//!
//! - `clock`: playback position and transport control (`PlaybackClock`)
//! - `metadata`: track title, artist and duration from audio file tags

pub mod clock;
pub mod metadata;

pub use clock::{PlaybackClock, PlaybackStatus, SimulatedClock};
pub use metadata::read_metadata;
