//! Wire format for timestamps: ISO-8601 with exactly millisecond precision
//! and a literal trailing `Z`, e.g. `2022-05-28T21:12:01.000Z`.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{self, Deserialize, Deserializer, Serializer};

const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Parse an ISO-8601 timestamp, with or without an offset suffix.
/// Offset-less values are taken as UTC.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(truncate_millis(dt.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| truncate_millis(naive.and_utc()))
        .map_err(|_| format!("{raw} must be in ISO 8601 format"))
}

/// Drop sub-millisecond precision so stored and rendered dates round-trip.
pub fn truncate_millis(date: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = date.nanosecond() / 1_000_000 * 1_000_000;
    date.with_nanosecond(nanos).unwrap_or(date)
}
