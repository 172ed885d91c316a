//! Simulated vehicle-tracking playback.
//!
//! A recorded route is replayed one sample per tick, deriving speed and elapsed
//! trip time from timestamps and keeping the path traveled so far. A rendering
//! surface drives it through [`Session`] and listens for [`RenderEvent`]s.

pub mod core;
pub mod error;
pub mod input;
pub mod playback;
pub mod settings;

pub use crate::core::{distance_km, Route, Sample};
pub use error::{LoadError, LoadFailureKind, SessionError};
pub use playback::{
    LoadStatus, PlaybackConfig, PlaybackEngine, PlaybackSnapshot, PlaybackState, RenderEvent,
    Session,
};
pub use settings::Settings;
