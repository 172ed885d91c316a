use crate::core::geo;
use crate::error::LoadError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded vehicle position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Latitude in degrees (-90..90)
    pub latitude: f64,

    /// Longitude in degrees (-180..180)
    pub longitude: f64,

    /// When the position was recorded, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Sample {
    /// Create an untimed sample
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: None,
        }
    }

    /// Create a sample recorded at `timestamp`
    pub fn at(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp: Some(timestamp),
        }
    }

    /// (latitude, longitude) pair
    pub fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    pub fn is_timed(&self) -> bool {
        self.timestamp.is_some()
    }

    /// Great-circle distance to `other` in kilometres
    pub fn distance_km(&self, other: &Sample) -> f64 {
        geo::distance_km(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// The planned path: an ordered, non-empty, read-only sequence of samples.
///
/// Order is the path order and duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    samples: Vec<Sample>,
}

impl Route {
    /// Build a route, rejecting empty input
    pub fn new(samples: Vec<Sample>) -> Result<Self, LoadError> {
        if samples.is_empty() {
            return Err(LoadError::EmptyRoute);
        }
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed route; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Trip start
    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    /// Sample at `index`, wrapping modulo the route length
    pub fn sample(&self, index: usize) -> &Sample {
        &self.samples[index % self.samples.len()]
    }

    /// Index that follows `index` in cyclic playback order
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.samples.len()
    }

    /// Whether the trip start carries a timestamp (elapsed time is only meaningful then)
    pub fn is_timed(&self) -> bool {
        self.first().is_timed()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.first().timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_empty_route_rejected() {
        let err = Route::new(Vec::new()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyRoute));
    }

    #[test]
    fn test_next_index_wraps() {
        let route = Route::new(vec![
            Sample::new(0.0, 0.0),
            Sample::new(0.0, 1.0),
            Sample::new(1.0, 1.0),
        ])
        .unwrap();

        assert_eq!(route.next_index(0), 1);
        assert_eq!(route.next_index(1), 2);
        assert_eq!(route.next_index(2), 0);
        assert_eq!(route.sample(4), &Sample::new(0.0, 1.0));
    }

    #[test]
    fn test_single_sample_route_wraps_to_itself() {
        let route = Route::new(vec![Sample::new(5.0, 5.0)]).unwrap();
        assert_eq!(route.next_index(0), 0);
        assert!(!route.is_empty());
    }

    #[test]
    fn test_timed_route() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let route = Route::new(vec![Sample::at(0.0, 0.0, t0), Sample::new(0.0, 1.0)]).unwrap();

        assert!(route.is_timed());
        assert_eq!(route.start_time(), Some(t0));
        assert!(!route.samples()[1].is_timed());
    }

    #[test]
    fn test_display_uses_six_decimals() {
        let sample = Sample::new(12.9716, 77.5946);
        assert_eq!(sample.to_string(), "12.971600, 77.594600");
    }
}
