use crate::core::{Route, Sample};
use crate::error::LoadError;
use crate::input::{check_coordinate, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

/// One route record as stored on disk
#[derive(Debug, Deserialize)]
struct RouteRecord {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    timestamp: Option<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    /// Milliseconds since the Unix epoch
    Millis(i64),
}

impl RawTimestamp {
    fn resolve(&self, index: usize) -> Option<DateTime<Utc>> {
        let parsed = match self {
            RawTimestamp::Text(text) if text.trim().is_empty() => return None,
            RawTimestamp::Text(text) => parse_timestamp(text),
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
        };
        if parsed.is_none() {
            warn!("Record {}: unreadable timestamp {:?}, treating as untimed", index, self);
        }
        parsed
    }
}

/// Load a route from a JSON array of `{latitude, longitude, timestamp?}` records.
///
/// A `null` document counts as an empty route.
pub fn parse_json(data: &[u8]) -> Result<Route, LoadError> {
    let records: Option<Vec<RouteRecord>> = serde_json::from_slice(data)?;

    let samples = records
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> Result<Sample, LoadError> {
            let latitude = check_coordinate(index, "latitude", record.latitude)?;
            let longitude = check_coordinate(index, "longitude", record.longitude)?;
            let timestamp = record.timestamp.as_ref().and_then(|ts| ts.resolve(index));
            Ok(Sample {
                latitude,
                longitude,
                timestamp,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Route::new(samples)
}
