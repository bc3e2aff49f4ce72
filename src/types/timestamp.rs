//! Timestamp (de)serialization for persisted catalog and order data
//!
//! Timestamps are written as RFC 3339 strings with millisecond precision.
//! Reading is lenient: older caches and the built-in catalog carry bare
//! `YYYY-MM-DD` dates, which are interpreted as UTC midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};

/// Parse a persisted timestamp
///
/// Accepts, in order: RFC 3339 (`2024-01-10T12:00:00Z`), a naive date-time
/// without offset (`2024-01-10T12:00:00`, taken as UTC) and a bare date
/// (`2024-01-10`, UTC midnight).
pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| format!("Invalid timestamp '{}'", raw))
}

/// Render a timestamp the way it is persisted
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use rstest::rstest;

    #[rstest]
    #[case::rfc3339("2024-02-01T10:30:00Z", 2024, 2, 1)]
    #[case::rfc3339_offset("2024-02-01T01:30:00+03:00", 2024, 1, 31)]
    #[case::naive_datetime("2024-02-01T10:30:00.250", 2024, 2, 1)]
    #[case::date_only("2024-02-01", 2024, 2, 1)]
    fn test_parse_accepted_formats(
        #[case] raw: &str,
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
    ) {
        let ts = parse(raw).unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (year, month, day));
    }

    #[rstest]
    #[case::empty("")]
    #[case::garbage("yesterday")]
    #[case::bad_month("2024-13-01")]
    fn test_parse_rejects_invalid(#[case] raw: &str) {
        assert!(parse(raw).is_err());
    }

    #[test]
    fn test_format_round_trips() {
        let ts = parse("2024-01-10").unwrap();
        assert_eq!(format(&ts), "2024-01-10T00:00:00.000Z");
        assert_eq!(parse(&format(&ts)).unwrap(), ts);
    }
}
