//! Schedule specifications for the job runner
//!
//! A schedule is either a cron expression evaluated in a named timezone or a
//! fixed interval. Classic 5-field cron patterns (`0 9 * * *`) are accepted and
//! given a leading seconds field before parsing.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::utils::time::{parse_interval, parse_timezone};

#[derive(Clone)]
pub enum ScheduleSpec {
    Cron {
        expression: String,
        schedule: Box<Schedule>,
        timezone: Tz,
    },
    Interval(Duration),
}

impl ScheduleSpec {
    /// Parse a cron expression evaluated in `timezone`
    pub fn cron(expression: &str, timezone: &str) -> ScheduleResult<Self> {
        let expression = normalize_cron_expression(expression);
        let schedule = Schedule::from_str(&expression)
            .map_err(|e| ScheduleError::invalid_cron(&expression, e.to_string()))?;
        let timezone = parse_timezone(timezone)?;

        Ok(Self::Cron {
            expression,
            schedule: Box::new(schedule),
            timezone,
        })
    }

    /// Parse a named interval or human-readable duration
    pub fn interval(interval: &str) -> ScheduleResult<Self> {
        parse_interval(interval).map(Self::Interval)
    }

    /// Next fire time strictly after `after`, or `None` when the schedule has
    /// no further occurrences
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Cron {
                schedule, timezone, ..
            } => schedule
                .after(&after.with_timezone(timezone))
                .next()
                .map(|next| next.with_timezone(&Utc)),
            Self::Interval(every) => chrono::Duration::from_std(*every)
                .ok()
                .and_then(|every| after.checked_add_signed(every)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Cron {
                expression,
                timezone,
                ..
            } => format!("cron '{}' ({})", expression, timezone.name()),
            Self::Interval(every) => {
                format!("every {}", humantime::format_duration(*every))
            }
        }
    }

    /// Timezone used for log output
    pub fn timezone(&self) -> Tz {
        match self {
            Self::Cron { timezone, .. } => *timezone,
            Self::Interval(_) => chrono_tz::UTC,
        }
    }
}

impl fmt::Debug for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Prefix a seconds field onto classic 5-field expressions
fn normalize_cron_expression(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() == 5 {
        format!("0 {}", fields.join(" "))
    } else {
        fields.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_cron_expression() {
        assert_eq!(normalize_cron_expression("0 9 * * *"), "0 0 9 * * *");
        assert_eq!(normalize_cron_expression("*/10 * * * * *"), "*/10 * * * * *");
        assert_eq!(normalize_cron_expression("  0  0 9 * * *  "), "0 0 9 * * *");
    }

    #[test]
    fn test_daily_cron_in_timezone() {
        let spec = ScheduleSpec::cron("0 9 * * *", "Europe/London").unwrap();

        // 07:00 UTC in July is 08:00 BST, so the next 09:00 London is 08:00 UTC
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 7, 0, 0).unwrap();
        assert_eq!(
            spec.next_after(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap()
        );

        let after_run = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        assert_eq!(
            spec.next_after(after_run).unwrap(),
            Utc.with_ymd_and_hms(2024, 7, 2, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_interval_next_after() {
        let spec = ScheduleSpec::interval("10m").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            spec.next_after(now).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 10, 0).unwrap()
        );
        assert_eq!(spec.describe(), "every 10m");
    }

    #[test]
    fn test_invalid_specs() {
        assert!(matches!(
            ScheduleSpec::cron("not a cron", "UTC"),
            Err(ScheduleError::InvalidCron { .. })
        ));
        assert!(matches!(
            ScheduleSpec::cron("0 9 * * *", "Nowhere/City"),
            Err(ScheduleError::InvalidTimezone { .. })
        ));
        assert!(matches!(
            ScheduleSpec::interval("0s"),
            Err(ScheduleError::InvalidInterval { .. })
        ));
    }
}
