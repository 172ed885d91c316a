use crate::core::{Route, Sample};
use crate::error::LoadError;
use crate::input::{check_coordinate, parse_timestamp};
use tracing::warn;

/// Load a route from CSV
///
/// Supports flexible column names:
/// - latitude | lat
/// - longitude | lon | lng
/// - timestamp | time | ts (optional)
///
/// Extra columns are ignored.
pub fn parse_csv(data: &[u8]) -> Result<Route, LoadError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data);

    let headers = rdr.headers()?.clone();
    let lat_idx = find_column(&headers, &["latitude", "lat"])?;
    let lon_idx = find_column(&headers, &["longitude", "lon", "lng"])?;
    let time_idx = find_column(&headers, &["timestamp", "time", "ts"]).ok();

    let mut samples = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;

        let latitude = parse_coordinate(&record, index, lat_idx, "latitude")?;
        let longitude = parse_coordinate(&record, index, lon_idx, "longitude")?;

        let timestamp = match time_idx.and_then(|i| record.get(i)) {
            Some(raw) if !raw.is_empty() => {
                let parsed = parse_timestamp(raw);
                if parsed.is_none() {
                    warn!("Row {}: unreadable timestamp {:?}, treating as untimed", index, raw);
                }
                parsed
            }
            _ => None,
        };

        samples.push(Sample {
            latitude,
            longitude,
            timestamp,
        });
    }

    Route::new(samples)
}

fn parse_coordinate(
    record: &csv::StringRecord,
    index: usize,
    column: usize,
    name: &str,
) -> Result<f64, LoadError> {
    let raw = record.get(column).ok_or_else(|| LoadError::InvalidRecord {
        index,
        reason: format!("missing {}", name),
    })?;

    let value = raw.parse::<f64>().map_err(|_| LoadError::InvalidRecord {
        index,
        reason: format!("{} {:?} is not a number", name, raw),
    })?;

    check_coordinate(index, name, value)
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize, LoadError> {
    for (idx, header) in headers.iter().enumerate() {
        let header_lower = header.to_lowercase();
        if names.iter().any(|&name| header_lower == name) {
            return Ok(idx);
        }
    }

    Err(LoadError::MissingColumn {
        names: names.iter().map(|name| name.to_string()).collect(),
    })
}
