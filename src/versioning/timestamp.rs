use crate::error::VersionError;
use chrono::{DateTime, Utc};

/// Native `lastUpdatedOn` layout, e.g. `2021-01-01T00:00:00.000+0000`.
const STORE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";
const STORE_TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a last-modified timestamp into milliseconds since the Unix epoch.
///
/// Accepts RFC 3339 and the store's native `±hhmm` offset layout.
pub fn parse_millis(value: &str) -> Result<i64, VersionError> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, STORE_TIMESTAMP_PARSE_FORMAT))
        .map(|parsed| parsed.timestamp_millis())
        .map_err(|_| VersionError::MalformedTimestamp {
            value: value.to_string(),
        })
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(STORE_TIMESTAMP_FORMAT).to_string()
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
