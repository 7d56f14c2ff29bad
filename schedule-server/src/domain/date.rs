//! Calendar date parsing.
//!
//! Callers pass dates as ISO strings and the parser emits week anchors in a
//! slash-separated form. Everything is normalised to a `NaiveDate`; any time
//! of day is dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only formats accepted, in the order they are tried.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Date-time formats without an offset.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 date-times and naive
/// `YYYY-MM-DDTHH:MM:SS` date-times. Returns `None` for anything else.
///
/// # Examples
///
/// ```
/// use schedule_server::domain::parse_calendar_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 11, 4);
/// assert_eq!(parse_calendar_date("2024-11-04"), expected);
/// assert_eq!(parse_calendar_date("2024/11/04"), expected);
/// assert_eq!(parse_calendar_date("2024-11-04T18:30:00Z"), expected);
/// assert_eq!(parse_calendar_date("next tuesday"), None);
/// ```
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|dt| dt.date())
}
