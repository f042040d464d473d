use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::error::{ProcessingError, Result};

/// Accepted timestamp layouts, day-first before ISO.
/// `%Y` also accepts one or two digits, so the two-digit-year layouts come first.
const DAY_FIRST_FORMATS: &[&str] = &[
    "%d/%m/%y %H:%M:%S%.f",
    "%d/%m/%y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];

/// Parse a local timestamp written day-first (`01/03/2025 14:00` is 1 March).
/// A bare date is taken as midnight.
pub fn parse_day_first(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();

    for format in DAY_FIRST_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }

    for format in ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(day_start(date));
        }
    }

    Err(ProcessingError::UnparseableTimestamp {
        value: trimmed.to_string(),
    })
}

/// Floor a timestamp to the top of its hour.
pub fn hour_start(ts: NaiveDateTime) -> NaiveDateTime {
    day_start(ts.date()) + TimeDelta::hours(ts.hour() as i64)
}

pub fn day_start(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight on the first day of the timestamp's month.
pub fn month_start(ts: NaiveDateTime) -> NaiveDateTime {
    let date = ts.date();
    day_start(date - Days::new(date.day0() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_day_first() {
        assert_eq!(parse_day_first("01/03/2025 00:00").unwrap(), ts(2025, 3, 1, 0, 0, 0));
        assert_eq!(parse_day_first("13/03/2025 14:05:30").unwrap(), ts(2025, 3, 13, 14, 5, 30));
        assert_eq!(parse_day_first(" 02-11-2024 07:59 ").unwrap(), ts(2024, 11, 2, 7, 59, 0));
        assert_eq!(parse_day_first("2024-11-02 07:59:00").unwrap(), ts(2024, 11, 2, 7, 59, 0));
        assert_eq!(parse_day_first("05/04/2025").unwrap(), ts(2025, 4, 5, 0, 0, 0));
    }

    #[test]
    fn test_parse_two_digit_year() {
        assert_eq!(parse_day_first("01/03/25 00:00").unwrap(), ts(2025, 3, 1, 0, 0, 0));
        assert_eq!(parse_day_first("13/03/25 14:05:30").unwrap(), ts(2025, 3, 13, 14, 5, 30));
        assert_eq!(parse_day_first("01/03/2025 00:00").unwrap().year(), 2025);
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let parsed = parse_day_first("01/03/2025 00:00:59.750").unwrap();
        assert_eq!(hour_start(parsed), ts(2025, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_unparseable() {
        for bad in ["", "not a date", "32/01/2025 00:00", "01/03/2025 25:00"] {
            assert!(matches!(
                parse_day_first(bad),
                Err(ProcessingError::UnparseableTimestamp { .. })
            ));
        }
    }

    #[test]
    fn test_floors() {
        let t = ts(2025, 3, 17, 13, 42, 9);
        assert_eq!(hour_start(t), ts(2025, 3, 17, 13, 0, 0));
        assert_eq!(day_start(t.date()), ts(2025, 3, 17, 0, 0, 0));
        assert_eq!(month_start(t), ts(2025, 3, 1, 0, 0, 0));
        assert_eq!(hour_start(hour_start(t)), hour_start(t));
    }
}
