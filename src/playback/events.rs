use crate::core::Sample;
use serde::Serialize;

/// What caused the rendering surface to recenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FollowReason {
    /// Route finished loading
    Initialized,
    /// Playback returned to the trip start
    Reset,
    /// Automatic one-sample advance
    Tick,
}

/// One-way "center/follow" notification for the rendering surface
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderEvent {
    pub latitude: f64,
    pub longitude: f64,
    /// Map zoom level to fly to
    pub zoom: u8,
    pub reason: FollowReason,
}

impl RenderEvent {
    pub fn follow(sample: &Sample, zoom: u8, reason: FollowReason) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            zoom,
            reason,
        }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}
