pub mod csv;
pub mod json;
pub mod source;

pub use self::csv::parse_csv;
pub use json::parse_json;
pub use source::{FileRouteSource, RouteSource, StaticRouteSource};

use crate::core::Route;
use crate::error::LoadError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of route data by looking at its first bytes
pub fn detect_format(data: &[u8]) -> InputFormat {
    let first = data.iter().copied().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[') | Some(b'{') => InputFormat::Json,
        _ if std::str::from_utf8(data).is_ok_and(|text| text.trim() == "null") => InputFormat::Json,
        Some(_) if is_csv(data) => InputFormat::Csv,
        _ => InputFormat::Unknown,
    }
}

fn is_csv(data: &[u8]) -> bool {
    // Comma-separated header line; column names are checked by the CSV parser
    let sample = String::from_utf8_lossy(&data[..data.len().min(500)]);
    sample.lines().next().is_some_and(|line| line.contains(','))
}

/// Decode route data, auto-detecting the format
pub fn parse_route(data: &[u8]) -> Result<Route, LoadError> {
    match detect_format(data) {
        InputFormat::Json => parse_json(data),
        InputFormat::Csv => parse_csv(data),
        InputFormat::Unknown if data.iter().all(u8::is_ascii_whitespace) => {
            Err(LoadError::EmptyRoute)
        }
        InputFormat::Unknown => Err(LoadError::UnknownFormat),
    }
}

/// Parse an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

pub(crate) fn check_coordinate(index: usize, name: &str, value: f64) -> Result<f64, LoadError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LoadError::InvalidRecord {
            index,
            reason: format!("{} is not a finite number", name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"  [{\"latitude\": 1}]"), InputFormat::Json);
        assert_eq!(detect_format(b"null"), InputFormat::Json);
        assert_eq!(detect_format(b"lat,lon\n1,2\n"), InputFormat::Csv);
        assert_eq!(detect_format(b"\x00\x01\x02binary"), InputFormat::Unknown);
        assert_eq!(detect_format(b""), InputFormat::Unknown);
    }

    #[test]
    fn test_parse_route_blank_is_empty() {
        assert!(matches!(parse_route(b""), Err(LoadError::EmptyRoute)));
        assert!(matches!(parse_route(b" \n"), Err(LoadError::EmptyRoute)));
        assert!(matches!(parse_route(b"hello"), Err(LoadError::UnknownFormat)));
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        assert_eq!(parse_timestamp("2024-05-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2024-05-01T10:00:00.000Z "), Some(expected));
        assert_eq!(
            parse_timestamp("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("not a time"), None);
    }

    #[test]
    fn test_csv_header_starting_with_n() {
        let data = b"name,latitude,longitude\ncar,12.97,77.59\n";

        assert_eq!(detect_format(data), InputFormat::Csv);
        let route = parse_route(data).unwrap();
        assert_eq!(route.first().coords(), (12.97, 77.59));
    }

    #[test]
    fn test_null_document_is_json() {
        assert_eq!(detect_format(b"  null\n"), InputFormat::Json);
        assert!(matches!(parse_route(b"null"), Err(LoadError::EmptyRoute)));
        assert_eq!(detect_format(b"nothing here"), InputFormat::Unknown);
    }
}
