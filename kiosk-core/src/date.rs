//! Display dates for document listings.
//!
//! Dates are rendered the way the kiosk shows them, e.g. `3. März 2025`:
//! day without padding, German month name, four-digit year.

use std::time::SystemTime;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone};

const MONTH_NAMES: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Format a timestamp as `"<day>. <month> <year>"` in its own time zone.
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String {
    let month = MONTH_NAMES[date.month0() as usize];
    format!("{}. {} {}", date.day(), month, date.year())
}

/// Format a filesystem timestamp, interpreted in local time.
pub fn format_system_time(time: SystemTime) -> String {
    format_date(&DateTime::<Local>::from(time))
}

/// Parse a string produced by [`format_date`] back into a calendar day.
pub fn parse_formatted_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split_whitespace();

    let day = parts.next()?.strip_suffix('.')?.parse::<u32>().ok()?;
    let month_name = parts.next()?;
    let year = parts.next()?.parse::<i32>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    let month = MONTH_NAMES.iter().position(|m| *m == month_name)? as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn formats_without_zero_padding() {
        let date = Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "3. März 2025");
    }

    #[test]
    fn formats_every_month_name() {
        let expected = [
            "1. Januar 2024",
            "1. Februar 2024",
            "1. März 2024",
            "1. April 2024",
            "1. Mai 2024",
            "1. Juni 2024",
            "1. Juli 2024",
            "1. August 2024",
            "1. September 2024",
            "1. Oktober 2024",
            "1. November 2024",
            "1. Dezember 2024",
        ];

        for (month, expected) in (1..=12).zip(expected) {
            let date = Utc.with_ymd_and_hms(2024, month, 1, 8, 0, 0).unwrap();
            assert_eq!(format_date(&date), expected);
        }
    }

    #[test]
    fn two_digit_days_are_kept() {
        let date = Utc.with_ymd_and_hms(2023, 12, 24, 18, 30, 0).unwrap();
        assert_eq!(format_date(&date), "24. Dezember 2023");
    }

    #[test]
    fn system_time_uses_local_calendar_day() {
        let local = Local.with_ymd_and_hms(2025, 7, 14, 23, 45, 0).unwrap();
        let system_time: SystemTime = local.into();

        assert_eq!(format_system_time(system_time), "14. Juli 2025");
    }

    #[test]
    fn formatted_dates_parse_back_to_the_same_day() {
        let start = Local.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        for offset in (0..400).step_by(13) {
            let date = start + Duration::days(offset);
            let parsed = parse_formatted_date(&format_date(&date)).expect("should parse");
            assert_eq!(parsed, date.date_naive());
        }
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(parse_formatted_date("3 März 2025"), None);
        assert_eq!(parse_formatted_date("3. Maerz 2025"), None);
        assert_eq!(parse_formatted_date("31. Februar 2025"), None);
        assert_eq!(parse_formatted_date("3. März 2025 extra"), None);
        assert_eq!(parse_formatted_date(""), None);
    }
}
