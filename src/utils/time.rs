//! Time utilities for schedule timezones and human-readable durations

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::time::Duration;

use crate::errors::ScheduleError;

/// Parse a named IANA timezone such as `Europe/London` or `UTC`
pub fn parse_timezone(tz_str: &str) -> Result<Tz, ScheduleError> {
    tz_str
        .trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone {
            timezone: tz_str.to_string(),
        })
}

/// Parse a named interval (`minutely`, `hourly`, `daily`, `weekly`) or a
/// human-readable duration such as `10m` or `1h30m`
pub fn parse_interval(interval: &str) -> Result<Duration, ScheduleError> {
    let trimmed = interval.trim();
    let duration = match trimmed.to_ascii_lowercase().as_str() {
        "minutely" => Duration::from_secs(60),
        "hourly" => Duration::from_secs(60 * 60),
        "daily" => Duration::from_secs(24 * 60 * 60),
        "weekly" => Duration::from_secs(7 * 24 * 60 * 60),
        _ => humantime::parse_duration(trimmed)
            .map_err(|e| ScheduleError::invalid_interval(interval, e.to_string()))?,
    };

    if duration.is_zero() {
        return Err(ScheduleError::invalid_interval(
            interval,
            "interval must be greater than zero",
        ));
    }

    Ok(duration)
}

/// Format a UTC instant in the given timezone for log output
pub fn format_for_display(utc_time: DateTime<Utc>, tz: Tz) -> String {
    let local_time = utc_time.with_timezone(&tz);
    format!("{} {}", local_time.format("%Y-%m-%d %H:%M:%S"), tz.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("UTC").unwrap(), chrono_tz::UTC);
        assert_eq!(
            parse_timezone(" Europe/London ").unwrap(),
            chrono_tz::Europe::London
        );
        assert!(matches!(
            parse_timezone("Invalid/Timezone"),
            Err(ScheduleError::InvalidTimezone { .. })
        ));
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("hourly").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_interval("Daily").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_interval("10m").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_interval("1h 30m").unwrap(), Duration::from_secs(5400));

        assert!(parse_interval("0s").is_err());
        assert!(parse_interval("sometimes").is_err());
    }

    #[test]
    fn test_format_for_display() {
        let utc = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        assert_eq!(
            format_for_display(utc, chrono_tz::Europe::London),
            "2024-07-01 09:00:00 Europe/London"
        );
    }
}
