//! Helper functions and utilities
//!
//! Date and time formatting shared by the calendar adapter, the iCalendar export
//! and the monthly view.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Length of the calendar entry mirrored for every event
pub const EVENT_DURATION_HOURS: i64 = 1;

/// Combine an event's date and time into its (UTC) start
pub fn event_start(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(time)
}

/// Start and end of the mirrored calendar entry
pub fn event_span(date: NaiveDate, time: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = event_start(date, time);
    (start, start + Duration::hours(EVENT_DURATION_HOURS))
}

/// ISO-8601 with second precision, e.g. `2025-03-20T12:00:00`
pub fn format_iso_seconds(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Compact UTC form used by iCalendar and Google template links
pub fn format_compact_utc(datetime: NaiveDateTime) -> String {
    datetime.format("%Y%m%dT%H%M%SZ").to_string()
}

/// English month name for 1-based `month`
pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];
    NAMES
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_span_is_one_hour() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let time = NaiveTime::from_hms_opt(23, 30, 0).unwrap();

        let (start, end) = event_span(date, time);
        assert_eq!(format_iso_seconds(start), "2025-03-20T23:30:00");
        assert_eq!(format_iso_seconds(end), "2025-03-21T00:30:00");
    }

    #[test]
    fn test_iso_seconds_drops_fraction() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let time = NaiveTime::from_hms_milli_opt(12, 0, 0, 250).unwrap();
        assert_eq!(format_iso_seconds(event_start(date, time)), "2025-03-20T12:00:00");
    }

    #[test]
    fn test_compact_utc() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        assert_eq!(format_compact_utc(event_start(date, time)), "20250501T100000Z");
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(3), "March");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "");
    }
}
