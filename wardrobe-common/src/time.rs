//! Timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current time as stored in `outfits.createdAt`
///
/// Millisecond precision with a `Z` suffix (`2024-05-01T12:30:00.123Z`), so
/// lexical order of stored values equals chronological order.
pub fn now_iso8601() -> String {
    to_iso8601(&now())
}

/// Format a timestamp the way `createdAt` values are stored
pub fn to_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored `createdAt` value
pub fn parse_iso8601(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
