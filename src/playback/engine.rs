use crate::core::{Route, Sample};
use crate::playback::{PlaybackState, TripState};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Playback engine for a recorded route.
///
/// Owns the read-only [`Route`] and the [`TripState`] derived from it. All
/// transitions are synchronous; timing lives in [`PlaybackClock`](crate::playback::PlaybackClock).
pub struct PlaybackEngine {
    route: Route,
    trip: TripState,
}

impl PlaybackEngine {
    /// Engine positioned at the trip start, paused
    pub fn new(route: Route) -> Self {
        let trip = TripState::new(&route);
        Self { route, trip }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn trip(&self) -> &TripState {
        &self.trip
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        if self.trip.is_playing() {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn is_playing(&self) -> bool {
        self.trip.is_playing()
    }

    /// Start/resume playback. Returns true if playback was paused before.
    pub fn play(&mut self) -> bool {
        let changed = self.trip.set_playing(true);
        if changed {
            info!("Playback started at index {}", self.trip.current_index());
        }
        changed
    }

    /// Pause playback, keeping position and traveled path. Returns true if it was playing.
    pub fn pause(&mut self) -> bool {
        let changed = self.trip.set_playing(false);
        if changed {
            info!("Playback paused at index {}", self.trip.current_index());
        }
        changed
    }

    /// Return to the trip start and pause. Returns the sample to recenter on.
    pub fn reset(&mut self) -> &Sample {
        self.trip.reset(&self.route);
        info!("Playback reset");
        self.route.first()
    }

    /// Advance one sample if playing.
    ///
    /// Returns the sample the vehicle moved to, or `None` when paused.
    pub fn tick(&mut self) -> Option<&Sample> {
        if !self.trip.is_playing() {
            return None;
        }

        let next = self.trip.advance(&self.route);
        debug!(
            "Tick -> index {} ({}), speed {:.2} km/h",
            self.trip.current_index(),
            next,
            self.trip.speed_kmh()
        );
        Some(next)
    }

    /// Sample under the vehicle
    pub fn current_position(&self) -> &Sample {
        self.route.sample(self.trip.current_index())
    }

    pub fn current_index(&self) -> usize {
        self.trip.current_index()
    }

    /// Speed in km/h as of the latest tick
    pub fn current_speed(&self) -> f64 {
        self.trip.speed_kmh()
    }

    pub fn elapsed_time(&self) -> Duration {
        self.trip.elapsed()
    }

    pub fn traveled_path(&self) -> &[Sample] {
        self.trip.traveled_path()
    }

    /// Owned copy of everything a rendering surface shows besides the full route
    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            state: self.state(),
            current_index: self.trip.current_index(),
            position: self.current_position().clone(),
            traveled_path: self.trip.traveled_path().to_vec(),
            speed_kmh: self.trip.speed_kmh(),
            elapsed_secs: self.trip.elapsed().as_secs_f64(),
            route_timed: self.route.is_timed(),
        }
    }
}

/// Read-only view of the trip at one moment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current_index: usize,
    pub position: Sample,
    pub traveled_path: Vec<Sample>,
    pub speed_kmh: f64,
    pub elapsed_secs: f64,
    /// Elapsed time is only meaningful when the trip start is timestamped
    pub route_timed: bool,
}

impl PlaybackSnapshot {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs.max(0.0))
    }
}

impl fmt::Display for PlaybackSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position: {} | Speed: {:.2} km/h", self.position, self.speed_kmh)?;
        if let Some(ts) = self.position.timestamp {
            write!(f, " | Time: {}", ts.format("%H:%M:%S"))?;
        }
        if self.route_timed {
            write!(f, " | Elapsed: {}", format_elapsed(self.elapsed()))?;
        }
        Ok(())
    }
}

/// Format a duration as `{minutes}m {seconds}s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}m {}s", secs / 60, secs % 60)
}
