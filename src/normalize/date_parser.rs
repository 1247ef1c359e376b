use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::utils::clean_str;

/// Naive timestamp layouts, taken as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse an ISO-8601-like timestamp and truncate it to its UTC calendar date.
///
/// Offsets are honoured: `2024-01-01T23:30:00-05:00` is `2024-01-02` in UTC.
/// Timestamps without an offset are read as UTC.
pub fn parse_date_utc(raw: &str) -> Option<NaiveDate> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    // "2024-01-01 10:00:00+02:00" and "...+0200"
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(&s, fmt) {
            return Some(dt.with_timezone(&Utc).date_naive());
        }
    }
    // trailing "Z" without the "T" separator
    let naive_part = s.strip_suffix('Z').unwrap_or(&s);
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive_part, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(naive_part, fmt) {
            return Some(d);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn plain_and_naive_forms() {
        assert_eq!(parse_date_utc("2024-01-01"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024/03/05"), ymd(2024, 3, 5));
        assert_eq!(parse_date_utc("2024-01-01 23:59:59"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024-01-01T08:15:00.123"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024/12/22 00:05:00"), ymd(2024, 12, 22));
        assert_eq!(parse_date_utc(" \"2024-02-29\" "), ymd(2024, 2, 29));
    }

    #[test]
    fn offsets_shift_to_utc() {
        assert_eq!(parse_date_utc("2024-01-01T23:30:00-05:00"), ymd(2024, 1, 2));
        assert_eq!(parse_date_utc("2024-01-02T01:00:00+02:00"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024-01-01T12:00:00Z"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024-01-01 12:00:00Z"), ymd(2024, 1, 1));
        assert_eq!(parse_date_utc("2024-01-01 22:00:00-0300"), ymd(2024, 1, 2));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_date_utc(""), None);
        assert_eq!(parse_date_utc("   "), None);
        assert_eq!(parse_date_utc("yesterday"), None);
        assert_eq!(parse_date_utc("2024-13-01"), None);
        assert_eq!(parse_date_utc("2023-02-29"), None);
    }
}
