///! Time and timezone helpers
///!
///! Flights are stored as UTC instants. Conversion to an airport's wall clock
///! only happens here, at the display edge.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;

use crate::airports;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// IANA zone for an airport. Unknown airports fall back to UTC.
pub fn airport_timezone(code: &str) -> Tz {
    airports::find_airport(code)
        .and_then(|airport| airport.timezone.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Parse a feed timestamp as a UTC instant.
///
/// Accepts "2024-01-04 19:30", the same with seconds or a `T` separator, and
/// RFC 3339 strings with `Z` or an explicit offset. Timestamps without a
/// zone marker are UTC.
pub fn parse_utc_time(raw: &str) -> Option<DateTime<Utc>> {
    let normalized = raw.trim().replacen(' ', "T", 1);
    if normalized.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z") {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = normalized
        .strip_suffix('Z')
        .or_else(|| normalized.strip_suffix('z'))
        .unwrap_or(&normalized);

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(naive, format).ok())
        .map(|dt| dt.and_utc())
}

/// "HH:MM" (24-hour) at the airport
pub fn to_local_clock(instant: DateTime<Utc>, airport_code: &str) -> String {
    let tz = airport_timezone(airport_code);
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

/// "MM/DD HH:MM" at the airport
pub fn to_local_date_time(instant: DateTime<Utc>, airport_code: &str) -> String {
    let tz = airport_timezone(airport_code);
    instant.with_timezone(&tz).format("%m/%d %H:%M").to_string()
}

/// "HH:MM:SS" at the airport for the given instant, used by the board clock
pub fn current_local_time(now: DateTime<Utc>, airport_code: &str) -> String {
    let tz = airport_timezone(airport_code);
    now.with_timezone(&tz).format("%H:%M:%S").to_string()
}

/// Whole minutes from `earlier` to `later` (negative if reversed)
pub fn minutes_between(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    (later - earlier).num_minutes()
}

/// Whether `instant` falls in `[now, now + hours]`
pub fn is_within_hours(instant: DateTime<Utc>, now: DateTime<Utc>, hours: i64) -> bool {
    instant >= now && instant <= now + TimeDelta::hours(hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_naive_timestamp_is_utc_and_converted_for_sfo() {
        let instant = parse_utc_time("2024-01-04 19:30").unwrap();
        assert_eq!(instant, utc(2024, 1, 4, 19, 30));
        assert_eq!(to_local_clock(instant, "SFO"), "11:30");
    }

    #[test]
    fn test_sfo_daylight_saving() {
        let instant = parse_utc_time("2024-07-04 19:30").unwrap();
        assert_eq!(to_local_clock(instant, "SFO"), "12:30");
    }

    #[test]
    fn test_unknown_airport_uses_utc() {
        let instant = parse_utc_time("2024-01-04 19:30").unwrap();
        assert_eq!(airport_timezone("QQQ"), Tz::UTC);
        assert_eq!(to_local_clock(instant, "QQQ"), "19:30");
    }

    #[test]
    fn test_parse_formats() {
        let expected = utc(2024, 1, 4, 19, 30);
        assert_eq!(parse_utc_time("2024-01-04T19:30"), Some(expected));
        assert_eq!(parse_utc_time("2024-01-04 19:30:00"), Some(expected));
        assert_eq!(parse_utc_time("2024-01-04T19:30:00Z"), Some(expected));
        assert_eq!(parse_utc_time("2024-01-04T19:30Z"), Some(expected));
        assert_eq!(parse_utc_time("2024-01-04T21:30:00+02:00"), Some(expected));
        assert_eq!(parse_utc_time("2024-01-04 14:30-05:00"), Some(expected));
        assert_eq!(parse_utc_time("  2024-01-04 19:30  "), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_utc_time(""), None);
        assert_eq!(parse_utc_time("   "), None);
        assert_eq!(parse_utc_time("tomorrow"), None);
        assert_eq!(parse_utc_time("2024-13-45 99:99"), None);
    }

    #[test]
    fn test_local_date_time_and_clock() {
        let instant = utc(2024, 1, 5, 3, 15);
        // 19:15 on the 4th in San Francisco
        assert_eq!(to_local_date_time(instant, "SFO"), "01/04 19:15");
        assert_eq!(current_local_time(instant, "LHR"), "03:15:00");
        assert_eq!(current_local_time(instant, "NRT"), "12:15:00");
    }

    #[test]
    fn test_minutes_and_window() {
        let now = utc(2024, 1, 4, 12, 0);
        let later = utc(2024, 1, 4, 13, 45);
        assert_eq!(minutes_between(later, now), 105);
        assert_eq!(minutes_between(now, later), -105);

        assert!(is_within_hours(later, now, 2));
        assert!(!is_within_hours(later, now, 1));
        assert!(!is_within_hours(utc(2024, 1, 4, 11, 0), now, 12));
    }
}
