pub mod clock;
pub mod engine;
pub mod events;
pub mod session;
pub mod speed;
pub mod trip;

pub use clock::PlaybackClock;
pub use engine::{format_elapsed, PlaybackEngine, PlaybackSnapshot};
pub use events::{FollowReason, RenderEvent};
pub use session::{LoadStatus, Session};
pub use speed::{elapsed_since, estimate_speed_kmh};
pub use trip::TripState;

use serde::Serialize;
use std::time::Duration;

/// Shortest tick period the clock will run at
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// No route loaded (still loading, or the load failed)
    Uninitialized,
    Paused,
    Playing,
}

/// Playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Time between automatic advances
    pub tick_interval: Duration,
    /// Zoom level carried by recenter events
    pub follow_zoom: u8,
    /// Start playing as soon as the route loads
    pub autoplay: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(2),
            follow_zoom: 13,
            autoplay: true,
        }
    }
}

impl PlaybackConfig {
    /// Tick period, never below [`MIN_TICK_INTERVAL`]
    pub fn effective_tick_interval(&self) -> Duration {
        self.tick_interval.max(MIN_TICK_INTERVAL)
    }
}
