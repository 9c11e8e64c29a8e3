//! Calendar arithmetic on millisecond UTC timestamps.

use chrono::{DateTime, Datelike, Utc};

/// One hour in milliseconds.
pub const HOUR_MS: i64 = 60 * 60 * 1000;
/// One day in milliseconds.
pub const DAY_MS: i64 = 24 * HOUR_MS;
/// One week in milliseconds.
pub const WEEK_MS: i64 = 7 * DAY_MS;

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    if year % 100 == 0 {
        year % 400 == 0
    } else {
        year % 4 == 0
    }
}

/// Number of days in `month` (1-based) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Convert a millisecond timestamp into a UTC date-time.
pub fn to_utc(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_ms)
}

/// Timestamp one calendar month later: adds the length of the month
/// `timestamp_ms` falls in.
pub fn add_month(timestamp_ms: i64) -> Option<i64> {
    let date = to_utc(timestamp_ms)?;
    let days = days_in_month(date.year(), date.month()) as i64;
    timestamp_ms.checked_add(days * DAY_MS)
}

/// Timestamp one year later: 366 days when the following year is leap,
/// 365 otherwise.
pub fn add_year(timestamp_ms: i64) -> Option<i64> {
    let date = to_utc(timestamp_ms)?;
    let days = if is_leap_year(date.year() + 1) { 366 } else { 365 };
    timestamp_ms.checked_add(days * DAY_MS)
}

/// Short day label, e.g. `Jan 5`.
pub fn day_label(timestamp_ms: i64) -> String {
    format_utc(timestamp_ms, "%b %-d")
}

/// Hour label, e.g. `14:00`.
pub fn hour_label(timestamp_ms: i64) -> String {
    format_utc(timestamp_ms, "%H:%M")
}

/// Info box header, e.g. `Mon, Jan 5`.
pub fn weekday_label(timestamp_ms: i64) -> String {
    format_utc(timestamp_ms, "%a, %b %-d")
}

fn format_utc(timestamp_ms: i64, pattern: &str) -> String {
    match to_utc(timestamp_ms) {
        Some(date) => date.format(pattern).to_string(),
        None => timestamp_ms.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2020-02-01T00:00:00Z
    const FEB_2020: i64 = 1_580_515_200_000;
    // 2021-02-01T00:00:00Z
    const FEB_2021: i64 = 1_612_137_600_000;

    #[test]
    fn leap_rule() {
        assert!(is_leap_year(2020));
        assert!(!is_leap_year(2021));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
    }

    #[test]
    fn february_lengths() {
        assert_eq!(days_in_month(2020, 2), 29);
        assert_eq!(days_in_month(2021, 2), 28);
        assert_eq!(add_month(FEB_2020), Some(FEB_2020 + 29 * DAY_MS));
        assert_eq!(add_month(FEB_2021), Some(FEB_2021 + 28 * DAY_MS));
    }

    #[test]
    fn year_step_looks_at_next_year() {
        // 2019-03-01 -> next year 2020 is leap.
        let march_2019 = 1_551_398_400_000;
        assert_eq!(add_year(march_2019), Some(march_2019 + 366 * DAY_MS));
        assert_eq!(add_year(FEB_2020), Some(FEB_2020 + 365 * DAY_MS));
    }

    #[test]
    fn labels() {
        // 2018-04-02T14:00:00Z, a Monday.
        let ts = 1_522_677_600_000;
        assert_eq!(day_label(ts), "Apr 2");
        assert_eq!(hour_label(ts), "14:00");
        assert_eq!(weekday_label(ts), "Mon, Apr 2");
    }
}
