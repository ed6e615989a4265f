//! Timestamp parsing and calendar field extraction.
//!
//! Conventions are fixed here rather than inherited from a library default:
//!   - weekday: 0 = Monday … 6 = Sunday
//!   - month:   1 … 12
//!   - hour:    0 … 23
//!   - day differences are taken between calendar dates; the
//!     reimbursement side carries no time of day, so the request's
//!     time of day does not shift the count
//!
//! RFC 3339 input keeps its local wall-clock reading and the offset is
//! dropped: `2023-01-01T23:00:00-05:00` is 23:00 on January 1st.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Date-time layouts tried in order after RFC 3339.
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Date-only layouts; these resolve to midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a timestamp cell. Returns None if no accepted layout matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParts {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    /// 0 = Monday … 6 = Sunday.
    pub weekday: i64,
}

impl CalendarParts {
    pub fn of(ts: &NaiveDateTime) -> Self {
        Self {
            year: i64::from(ts.year()),
            month: i64::from(ts.month()),
            day: i64::from(ts.day()),
            hour: i64::from(ts.hour()),
            weekday: i64::from(ts.weekday().num_days_from_monday()),
        }
    }
}

/// Whole days from `earlier` to `later`, counted on the calendar.
/// Negative when `later` precedes `earlier`; never clamped.
pub fn whole_day_difference(later: &NaiveDateTime, earlier: &NaiveDateTime) -> i64 {
    (later.date() - earlier.date()).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap_or_else(|| panic!("should parse {s:?}"))
    }

    #[test]
    fn accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(ts("2023-01-01 10:00:00"), expected);
        assert_eq!(ts("2023-01-01T10:00:00"), expected);
        assert_eq!(ts("2023-01-01 10:00"), expected);
        assert_eq!(ts("2023-01-01T10:00:00.000"), expected);
        assert_eq!(ts("  2023-01-01 10:00:00  "), expected);
        assert_eq!(ts("2023-01-01T10:00:00+02:00"), expected);
        assert_eq!(ts("2023-01-01T10:00:00Z"), expected);
        assert_eq!(ts("2023-01-01").hour(), 0);
        assert_eq!(ts("2023/01/01").day(), 1);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-date").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2023-13-01").is_none());
        assert!(parse_timestamp("2023-02-30 10:00:00").is_none());
    }

    #[test]
    fn offsets_keep_wall_clock_fields() {
        let parts = CalendarParts::of(&ts("2023-01-01T23:00:00-05:00"));
        assert_eq!((parts.year, parts.month, parts.day), (2023, 1, 1));
        assert_eq!(parts.hour, 23);
        // 2023-01-01 was a Sunday.
        assert_eq!(parts.weekday, 6);
    }

    #[test]
    fn weekday_is_monday_zero() {
        // 2023-01-02 was a Monday, 2023-01-08 a Sunday.
        assert_eq!(CalendarParts::of(&ts("2023-01-02")).weekday, 0);
        assert_eq!(CalendarParts::of(&ts("2023-01-08")).weekday, 6);
    }

    #[test]
    fn day_difference_counts_calendar_days() {
        assert_eq!(whole_day_difference(&ts("2023-01-05"), &ts("2023-01-01T10:00:00")), 4);
        assert_eq!(whole_day_difference(&ts("2023-01-01"), &ts("2023-01-05")), -4);
        assert_eq!(whole_day_difference(&ts("2023-01-01"), &ts("2023-01-01T23:59:59")), 0);
        assert_eq!(whole_day_difference(&ts("2023-03-01"), &ts("2023-02-28 08:30")), 1);
        assert_eq!(whole_day_difference(&ts("2024-03-01"), &ts("2024-02-28 08:30")), 2);
    }

    #[test]
    fn negative_gap_ignores_request_time_of_day() {
        // A sub-day floor would give -5 here; the count is between dates.
        assert_eq!(whole_day_difference(&ts("2023-01-01"), &ts("2023-01-05T10:00")), -4);
        assert_eq!(whole_day_difference(&ts("2023-01-01"), &ts("2023-01-01T10:00")), 0);
    }
}
