use crate::core::{Route, Sample};
use crate::playback::speed::{elapsed_since, estimate_speed_kmh};
use std::time::Duration;
use tracing::warn;

/// Mutable playback state for one route.
///
/// Only [`PlaybackEngine`](crate::playback::PlaybackEngine) mutates it; everything
/// outside the crate sees it through read-only accessors.
///
/// `traveled_path` grows by one sample per tick and is only shortened by
/// [`reset`](Self::reset), so a session left playing keeps accumulating laps.
/// The session's render event channel grows the same way when nobody drains it.
#[derive(Debug, Clone)]
pub struct TripState {
    current_index: usize,
    is_playing: bool,
    traveled_path: Vec<Sample>,
    elapsed: Duration,
    speed_kmh: f64,
}

impl TripState {
    pub(crate) fn new(route: &Route) -> Self {
        Self {
            current_index: 0,
            is_playing: false,
            traveled_path: vec![route.first().clone()],
            elapsed: Duration::ZERO,
            speed_kmh: 0.0,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn traveled_path(&self) -> &[Sample] {
        &self.traveled_path
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Speed in km/h between the two most recent samples
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Returns true if the flag changed
    pub(crate) fn set_playing(&mut self, playing: bool) -> bool {
        let changed = self.is_playing != playing;
        self.is_playing = playing;
        changed
    }

    /// Move one sample forward (wrapping), returning the sample now under the vehicle
    pub(crate) fn advance<'r>(&mut self, route: &'r Route) -> &'r Sample {
        let next_index = route.next_index(self.current_index);
        let prev = route.sample(self.current_index);
        let next = route.sample(next_index);

        if prev.is_timed() && next.is_timed() {
            self.update_timing(route, prev, next);
        }

        self.traveled_path.push(next.clone());
        self.current_index = next_index;
        next
    }

    fn update_timing(&mut self, route: &Route, prev: &Sample, next: &Sample) {
        let speed = estimate_speed_kmh(prev, next);
        if !speed.is_finite() {
            warn!("Skipping timing update, non-finite speed between ({}) and ({})", prev, next);
            return;
        }
        self.speed_kmh = speed;

        if let Some(elapsed) = elapsed_since(route.first(), next) {
            self.elapsed = elapsed;
        }
    }

    /// Back to the trip start. Speed keeps its last value.
    pub(crate) fn reset(&mut self, route: &Route) {
        self.current_index = 0;
        self.traveled_path.clear();
        self.traveled_path.push(route.first().clone());
        self.elapsed = Duration::ZERO;
        self.is_playing = false;
    }
}
