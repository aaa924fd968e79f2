use anyhow::{bail, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

#[cfg(test)]
use std::sync::Mutex;

const SECOND: u64 = 1;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

#[cfg(test)]
static MOCK_TIME: once_cell::sync::Lazy<Mutex<u64>> =
    once_cell::sync::Lazy::new(|| Mutex::new(Local::now().timestamp() as u64));

#[cfg(test)]
pub fn advance_mock_time(seconds: u64) {
    let mut guard = MOCK_TIME.lock().unwrap();
    *guard += seconds;
}

#[cfg(test)]
pub fn current_timestamp() -> u64 {
    *MOCK_TIME.lock().unwrap()
}

#[cfg(not(test))]
pub fn current_timestamp() -> u64 {
    Local::now().timestamp() as u64
}

/// Format a unix timestamp as a rough age, like "2 hours ago" or "last week".
/// Returns "never" for 0 and "now" for anything under 30 seconds old.
pub fn format_since(time: u64) -> String {
    if time == 0 {
        return String::from("never");
    }
    let now = current_timestamp();
    let duration = now.saturating_sub(time);

    let unit: &str;
    let value: u64;
    if duration < MINUTE {
        unit = "second";
        if duration < 30 {
            return String::from("now");
        }
        value = duration;
    } else if duration < HOUR {
        unit = "minute";
        value = duration / MINUTE;
    } else if duration < DAY {
        unit = "hour";
        value = duration / HOUR;
    } else if duration < WEEK {
        unit = "day";
        value = duration / DAY;
    } else if duration < MONTH {
        unit = "week";
        value = duration / WEEK;
    } else if duration < YEAR {
        unit = "month";
        value = duration / MONTH;
    } else {
        unit = "year";
        value = duration / YEAR;
    }

    if value > 1 {
        format!("{value} {unit}s ago")
    } else {
        format!("last {unit}")
    }
}

/// Parse a user-supplied time filter into a unix timestamp. Accepts a raw
/// timestamp, "HH:MM:SS" (today), "YYYY-MM-DD", or "YYYY-MM-DD HH:MM:SS".
pub fn parse_time(s: &str) -> Result<u64> {
    if let Ok(timestamp) = s.parse::<u64>() {
        return Ok(timestamp);
    }

    let datetime = if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        Local::now().naive_local().date().and_time(time)
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        match date.and_hms_opt(0, 0, 0) {
            Some(datetime) => datetime,
            None => bail!("invalid date '{s}'"),
        }
    } else if let Ok(datetime) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        datetime
    } else {
        bail!("invalid time '{s}', expected formats: unix timestamp, YYYY-MM-DD, HH:MM:SS, or YYYY-MM-DD HH:MM:SS");
    };

    let local = match Local.from_local_datetime(&datetime).single() {
        Some(local) => local,
        None => bail!("invalid local time"),
    };
    Ok(local.timestamp() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_since() {
        assert_eq!(format_since(0), "never");
        assert_eq!(format_since(current_timestamp()), "now");

        let now = current_timestamp();
        assert_eq!(format_since(now - 2 * MINUTE), "2 minutes ago");
        assert_eq!(format_since(now - HOUR), "last hour");
        assert_eq!(format_since(now - 3 * DAY), "3 days ago");
        assert_eq!(format_since(now - 2 * YEAR), "2 years ago");

        // The mock clock moves only when told to.
        advance_mock_time(90);
        assert_eq!(format_since(now), "last minute");
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("1735689600").unwrap(), 1735689600);

        let ts = parse_time("2025-06-01").unwrap();
        let datetime = Local.timestamp_opt(ts as i64, 0).unwrap();
        assert_eq!(datetime.naive_local().date().to_string(), "2025-06-01");

        assert!(parse_time("not a time").is_err());
    }
}
