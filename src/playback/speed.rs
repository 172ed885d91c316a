use crate::core::Sample;
use std::time::Duration;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Instantaneous speed in km/h between two samples, `to` following `from` in playback order.
///
/// Returns 0 when either sample is untimed or when `to` is not strictly later than `from`.
pub fn estimate_speed_kmh(from: &Sample, to: &Sample) -> f64 {
    let (Some(start), Some(end)) = (from.timestamp, to.timestamp) else {
        return 0.0;
    };

    let hours = (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    if hours <= 0.0 {
        return 0.0;
    }

    from.distance_km(to) / hours
}

/// Time from the trip start to `current`, or `None` when either lacks a timestamp.
///
/// A negative delta (timestamps out of order) clamps to zero.
pub fn elapsed_since(start: &Sample, current: &Sample) -> Option<Duration> {
    let delta = current.timestamp? - start.timestamp?;
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance_km;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    fn t0() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_speed_over_one_hour() {
        let a = Sample::at(0.0, 0.0, t0());
        let b = Sample::at(0.0, 1.0, t0() + ChronoDuration::hours(1));

        let speed = estimate_speed_kmh(&a, &b);
        assert!((speed - distance_km(0.0, 0.0, 0.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_speed_scales_with_time() {
        let a = Sample::at(0.0, 0.0, t0());
        let b = Sample::at(0.0, 1.0, t0() + ChronoDuration::minutes(30));

        let speed = estimate_speed_kmh(&a, &b);
        assert!((speed - 2.0 * distance_km(0.0, 0.0, 0.0, 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_missing_timestamp_gives_zero() {
        let timed = Sample::at(0.0, 0.0, t0());
        let untimed = Sample::new(0.0, 1.0);

        assert_eq!(estimate_speed_kmh(&timed, &untimed), 0.0);
        assert_eq!(estimate_speed_kmh(&untimed, &timed), 0.0);
        assert_eq!(estimate_speed_kmh(&untimed, &untimed), 0.0);
    }

    #[test]
    fn test_non_increasing_timestamps_give_zero() {
        let a = Sample::at(0.0, 0.0, t0());
        let same = Sample::at(0.0, 1.0, t0());
        let earlier = Sample::at(0.0, 1.0, t0() - ChronoDuration::seconds(10));

        assert_eq!(estimate_speed_kmh(&a, &same), 0.0);
        assert_eq!(estimate_speed_kmh(&a, &earlier), 0.0);
    }

    #[test]
    fn test_elapsed_since_start() {
        let start = Sample::at(0.0, 0.0, t0());
        let later = Sample::at(1.0, 1.0, t0() + ChronoDuration::seconds(7200));

        assert_eq!(elapsed_since(&start, &later), Some(Duration::from_secs(7200)));
        assert_eq!(elapsed_since(&start, &Sample::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_elapsed_clamps_negative() {
        let start = Sample::at(0.0, 0.0, t0());
        let before = Sample::at(0.0, 0.0, t0() - ChronoDuration::minutes(5));

        assert_eq!(elapsed_since(&start, &before), Some(Duration::ZERO));
    }
}
