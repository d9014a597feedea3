//! ISO-8601 timestamp encoding for the persisted fetch time.
//!
//! Stored timestamps use UTC with millisecond precision and a `Z` suffix,
//! e.g. `2024-05-01T12:30:00.250Z`.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Date-time layouts without an offset, read as local time.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Formats `at` as the string persisted under the time key.
pub fn format(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a persisted timestamp into milliseconds since the Unix epoch.
///
/// Accepted forms, tried in order:
///
/// - RFC 3339 with any offset (`2024-05-01T12:30:00.250Z`, `...+02:00`)
/// - date and time without an offset (`2024-05-01T12:30:00.250`,
///   `2024-05-01T12:30`), interpreted in the local time zone
/// - a bare date (`2024-05-01`), interpreted as midnight UTC
///
/// Returns `None` for anything else, and for local times that do not exist
/// (skipped by a DST transition). Ambiguous local times take the earlier instant.
pub fn parse_millis(value: &str) -> Option<i64> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.timestamp_millis());
    }

    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(value, layout).ok())
    {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.timestamp_millis());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_millis(value: &str, layout: &str) -> i64 {
        let naive = NaiveDateTime::parse_from_str(value, layout).unwrap();
        Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_format_millis_precision() {
        let at = Utc.timestamp_millis_opt(123).unwrap();
        assert_eq!(format(at), "1970-01-01T00:00:00.123Z");
    }

    #[test]
    fn test_parse_formatted() {
        let at = Utc.timestamp_millis_opt(1_714_566_600_250).unwrap();
        assert_eq!(parse_millis(&format(at)), Some(1_714_566_600_250));
    }

    #[test]
    fn test_parse_with_offset() {
        assert_eq!(parse_millis("1970-01-01T01:00:00.000+01:00"), Some(0));
    }

    #[test]
    fn test_parse_without_offset_is_local() {
        assert_eq!(
            parse_millis("2024-05-01T12:30:00.250"),
            Some(local_millis("2024-05-01T12:30:00.250", "%Y-%m-%dT%H:%M:%S%.f"))
        );
        assert_eq!(
            parse_millis("2024-05-01T12:30:00"),
            Some(local_millis("2024-05-01T12:30:00", "%Y-%m-%dT%H:%M:%S"))
        );
        assert_eq!(
            parse_millis("2024-05-01T12:30"),
            Some(local_millis("2024-05-01T12:30", "%Y-%m-%dT%H:%M"))
        );
    }

    #[test]
    fn test_parse_date_only_is_utc_midnight() {
        assert_eq!(parse_millis("1970-01-02"), Some(86_400_000));
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_millis("yesterday"), None);
        assert_eq!(parse_millis(""), None);
        assert_eq!(parse_millis("100"), None);
        assert_eq!(parse_millis("2024-13-01T00:00:00"), None);
        assert_eq!(parse_millis("2024-05-01 trailing"), None);
    }
}
