//! Temporal value helpers.
//!
//! Dates are stored as days since 1970-01-01, times as microseconds since
//! midnight, timestamps as microseconds since the epoch. Text conversion
//! goes through chrono; strict parse variants require the entire input to
//! match the grammar, lenient variants tolerate surrounding whitespace.

use crate::common::error::{OpalError, OpalResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

pub const MICROS_PER_SECOND: i64 = 1_000_000;
pub const MICROS_PER_MINUTE: i64 = 60 * MICROS_PER_SECOND;
pub const MICROS_PER_HOUR: i64 = 60 * MICROS_PER_MINUTE;
pub const MICROS_PER_DAY: i64 = 24 * MICROS_PER_HOUR;

/// Days from 0001-01-01 (CE) to 1970-01-01, for chrono conversions.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// An interval value: calendar months and days plus a microsecond part,
/// kept separate because month and day lengths are not fixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub micros: i64,
}

impl Interval {
    pub fn new(months: i32, days: i32, micros: i64) -> Self {
        Self {
            months,
            days,
            micros,
        }
    }
}

fn date_from_days(days: i32) -> OpalResult<NaiveDate> {
    days.checked_add(EPOCH_DAYS_FROM_CE)
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            OpalError::OutOfRange(format!(
                "Casting value \"{}\" to type DATE failed: value is out of range!",
                days
            ))
        })
}

/// Render an epoch-day date as `YYYY-MM-DD`.
pub fn date_to_string(days: i32) -> OpalResult<String> {
    Ok(date_from_days(days)?.format("%Y-%m-%d").to_string())
}

/// Parse a `YYYY-MM-DD` date into epoch days.
pub fn parse_date(text: &str, strict: bool) -> OpalResult<i32> {
    let input = if strict { text } else { text.trim() };
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        OpalError::Parse(format!("Could not convert string '{}' to DATE", text))
    })?;
    Ok(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
}

/// Render midnight-relative microseconds as `HH:MM:SS[.ffffff]`.
pub fn time_to_string(micros: i64) -> String {
    let total_secs = micros.div_euclid(MICROS_PER_SECOND);
    let frac = micros.rem_euclid(MICROS_PER_SECOND);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    if frac == 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}:{:02}.{:06}", hours, minutes, secs, frac)
    }
}

fn time_micros(time: NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * MICROS_PER_SECOND
        + (time.nanosecond() / 1_000) as i64
}

/// Parse a `HH:MM:SS[.ffffff]` time into midnight-relative microseconds.
pub fn parse_time(text: &str, strict: bool) -> OpalResult<i64> {
    let input = if strict { text } else { text.trim() };
    let time = NaiveTime::parse_from_str(input, "%H:%M:%S%.f").map_err(|_| {
        OpalError::Parse(format!("Could not convert string '{}' to TIME", text))
    })?;
    Ok(time_micros(time))
}

/// Render epoch microseconds as `YYYY-MM-DD HH:MM:SS[.ffffff]`.
pub fn timestamp_to_string(micros: i64) -> OpalResult<String> {
    let days = micros.div_euclid(MICROS_PER_DAY);
    let time_of_day = micros.rem_euclid(MICROS_PER_DAY);
    Ok(format!(
        "{} {}",
        date_to_string(days as i32)?,
        time_to_string(time_of_day)
    ))
}

/// Parse `YYYY-MM-DD[ HH:MM:SS[.ffffff]]` into epoch microseconds. A
/// date-only input is taken at midnight. One grammar serves both strict
/// and lenient casts.
pub fn parse_timestamp(text: &str) -> OpalResult<i64> {
    let input = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S%.f") {
        let days = dt.date().num_days_from_ce() - EPOCH_DAYS_FROM_CE;
        return date_to_timestamp(days).map(|base| base + time_micros(dt.time()));
    }
    if let Ok(days) = parse_date(input, true) {
        return date_to_timestamp(days);
    }
    Err(OpalError::Parse(format!(
        "Could not convert string '{}' to TIMESTAMP",
        text
    )))
}

/// Date to timestamp at midnight.
pub fn date_to_timestamp(days: i32) -> OpalResult<i64> {
    (days as i64).checked_mul(MICROS_PER_DAY).ok_or_else(|| {
        OpalError::OutOfRange(format!(
            "Casting value \"{}\" to type TIMESTAMP failed: value is out of range!",
            date_to_string(days).unwrap_or_else(|_| days.to_string())
        ))
    })
}

/// Timestamp to date, truncating the time-of-day toward negative infinity
/// so pre-epoch timestamps land on the correct calendar day.
pub fn timestamp_to_date(micros: i64) -> i32 {
    micros.div_euclid(MICROS_PER_DAY) as i32
}

/// Timestamp to time-of-day, discarding the date component.
pub fn timestamp_to_time(micros: i64) -> i64 {
    micros.rem_euclid(MICROS_PER_DAY)
}

fn plural(value: i64, unit: &str) -> String {
    if value == 1 || value == -1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

/// Render an interval as `N years N months N days HH:MM:SS[.ffffff]`,
/// skipping zero components. A zero interval renders as `00:00:00`.
pub fn interval_to_string(interval: &Interval) -> String {
    let mut parts = Vec::new();
    let years = interval.months / 12;
    let months = interval.months % 12;
    if years != 0 {
        parts.push(plural(years as i64, "year"));
    }
    if months != 0 {
        parts.push(plural(months as i64, "month"));
    }
    if interval.days != 0 {
        parts.push(plural(interval.days as i64, "day"));
    }
    if interval.micros != 0 || parts.is_empty() {
        if interval.micros < 0 {
            parts.push(format!("-{}", time_to_string(-interval.micros)));
        } else {
            parts.push(time_to_string(interval.micros));
        }
    }
    parts.join(" ")
}

/// Parse an interval from `[N year(s)] [N month(s)] [N day(s)]
/// [HH:MM:SS[.ffffff]]` unit tokens, in any combination.
pub fn parse_interval(text: &str) -> OpalResult<Interval> {
    let parse_err = || OpalError::Parse(format!("Could not convert string '{}' to INTERVAL", text));
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(parse_err());
    }

    let mut months: i64 = 0;
    let mut days: i64 = 0;
    let mut micros: i64 = 0;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token.contains(':') {
            let (sign, clock) = match token.strip_prefix('-') {
                Some(rest) => (-1, rest),
                None => (1, token),
            };
            let time = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f")
                .map_err(|_| parse_err())?;
            micros = micros
                .checked_add(sign * time_micros(time))
                .ok_or_else(parse_err)?;
            i += 1;
            continue;
        }
        let amount: i64 = token.parse().map_err(|_| parse_err())?;
        let unit = tokens.get(i + 1).ok_or_else(parse_err)?;
        let unit = unit.to_ascii_lowercase();
        let unit = unit.strip_suffix('s').unwrap_or(&unit);
        let scaled = match unit {
            "year" => amount.checked_mul(12).map(|m| (Some(m), None, None)),
            "month" => Some((Some(amount), None, None)),
            "week" => amount.checked_mul(7).map(|d| (None, Some(d), None)),
            "day" => Some((None, Some(amount), None)),
            "hour" => amount.checked_mul(MICROS_PER_HOUR).map(|u| (None, None, Some(u))),
            "minute" => amount
                .checked_mul(MICROS_PER_MINUTE)
                .map(|u| (None, None, Some(u))),
            "second" => amount
                .checked_mul(MICROS_PER_SECOND)
                .map(|u| (None, None, Some(u))),
            "millisecond" => amount.checked_mul(1_000).map(|u| (None, None, Some(u))),
            "microsecond" => Some((None, None, Some(amount))),
            _ => return Err(parse_err()),
        }
        .ok_or_else(parse_err)?;
        if let (Some(m), _, _) = scaled {
            months = months.checked_add(m).ok_or_else(parse_err)?;
        }
        if let (_, Some(d), _) = scaled {
            days = days.checked_add(d).ok_or_else(parse_err)?;
        }
        if let (_, _, Some(u)) = scaled {
            micros = micros.checked_add(u).ok_or_else(parse_err)?;
        }
        i += 2;
    }

    let out_of_range = || {
        OpalError::OutOfRange(format!(
            "Casting value \"{}\" to type INTERVAL failed: value is out of range!",
            text
        ))
    };
    Ok(Interval {
        months: months.try_into().map_err(|_| out_of_range())?,
        days: days.try_into().map_err(|_| out_of_range())?,
        micros,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip() {
        assert_eq!(date_to_string(0).unwrap(), "1970-01-01");
        assert_eq!(parse_date("1970-01-01", true).unwrap(), 0);
        assert_eq!(parse_date("1969-12-31", true).unwrap(), -1);
        assert_eq!(parse_date(" 2021-03-04 ", false).unwrap(), 18690);
        assert!(parse_date(" 2021-03-04", true).is_err());
        assert!(parse_date("2021-13-01", false).is_err());
    }

    #[test]
    fn test_time_round_trip() {
        assert_eq!(time_to_string(0), "00:00:00");
        let micros = parse_time("13:37:11.250000", true).unwrap();
        assert_eq!(
            micros,
            13 * MICROS_PER_HOUR + 37 * MICROS_PER_MINUTE + 11 * MICROS_PER_SECOND + 250_000
        );
        assert_eq!(time_to_string(micros), "13:37:11.250000");
    }

    #[test]
    fn test_timestamp_split() {
        // 1969-12-31 23:00:00 is one hour before the epoch
        let micros = -MICROS_PER_HOUR;
        assert_eq!(timestamp_to_date(micros), -1);
        assert_eq!(timestamp_to_time(micros), 23 * MICROS_PER_HOUR);
        assert_eq!(
            timestamp_to_string(micros).unwrap(),
            "1969-12-31 23:00:00"
        );
    }

    #[test]
    fn test_timestamp_parse() {
        assert_eq!(parse_timestamp("1970-01-01 00:00:01").unwrap(), MICROS_PER_SECOND);
        assert_eq!(parse_timestamp("1970-01-02").unwrap(), MICROS_PER_DAY);
        assert!(parse_timestamp("not a timestamp").is_err());
    }

    #[test]
    fn test_interval_text() {
        let interval = parse_interval("1 year 2 months 3 days 00:00:01.500000").unwrap();
        assert_eq!(interval, Interval::new(14, 3, 1_500_000));
        assert_eq!(
            interval_to_string(&interval),
            "1 year 2 months 3 days 00:00:01.500000"
        );
        assert_eq!(interval_to_string(&Interval::default()), "00:00:00");
        assert!(parse_interval("3 parsecs").is_err());
        assert!(parse_interval("").is_err());
    }
}
