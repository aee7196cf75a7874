use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use cron::Schedule;
use std::str::FromStr;

/// Parse a cron expression, accepting standard 5-field crontab syntax as well
/// as the crate-native 6/7-field form with seconds.
pub fn parse_schedule(expression: &str) -> Result<Schedule> {
    let normalized = normalize_expression(expression)?;
    Schedule::from_str(&normalized)
        .with_context(|| format!("Invalid cron expression: {expression}"))
}

/// First fire time strictly after `from`, in `from`'s timezone.
pub fn next_fire<Z: TimeZone>(schedule: &Schedule, from: &DateTime<Z>) -> Option<DateTime<Z>> {
    schedule.after(from).next()
}

fn normalize_expression(expression: &str) -> Result<String> {
    let expression = expression.trim();
    let field_count = expression.split_whitespace().count();

    match field_count {
        // standard crontab syntax: minute hour day month weekday
        5 => Ok(format!("0 {expression}")),
        // crate-native syntax includes seconds (+ optional year)
        6 | 7 => Ok(expression.to_string()),
        _ => anyhow::bail!(
            "Invalid cron expression: {expression} (expected 5, 6, or 7 fields, got {field_count})"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, ManualClock};
    use chrono::{Datelike, NaiveTime, Weekday};
    use chrono_tz::Asia::Singapore;

    fn local(text: &str) -> DateTime<chrono_tz::Tz> {
        ManualClock::at_local(Singapore, text).unwrap().now()
    }

    #[test]
    fn five_field_expression_gets_seconds_prefix() {
        assert_eq!(normalize_expression("1 0 * * *").unwrap(), "0 1 0 * * *");
        assert_eq!(
            normalize_expression(" 0 30 17 * * Mon-Fri ").unwrap(),
            "0 30 17 * * Mon-Fri"
        );
        assert!(normalize_expression("* *").is_err());
    }

    #[test]
    fn invalid_expression_is_rejected() {
        let err = parse_schedule("61 25 * * *").unwrap_err();
        assert!(err.to_string().contains("Invalid cron expression"));
    }

    #[test]
    fn weekday_job_skips_the_weekend() {
        let schedule = parse_schedule("30 17 * * Mon-Fri").unwrap();
        // Friday evening, after the kickoff already passed.
        let next = next_fire(&schedule, &local("2025-06-13 18:00:00")).unwrap();
        assert_eq!(next.weekday(), Weekday::Mon);
        assert_eq!(next.time(), NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(next.day(), 16);
    }

    #[test]
    fn daily_reset_fires_just_after_local_midnight() {
        let schedule = parse_schedule("1 0 * * *").unwrap();
        let next = next_fire(&schedule, &local("2025-06-10 23:59:00")).unwrap();
        assert_eq!(next, local("2025-06-11 00:01:00"));
        assert_eq!(next.timezone(), Singapore);
    }

    #[test]
    fn same_day_fire_when_still_ahead() {
        let schedule = parse_schedule("45 16 * * Mon-Fri").unwrap();
        let next = next_fire(&schedule, &local("2025-06-10 09:00:00")).unwrap();
        assert_eq!(next, local("2025-06-10 16:45:00"));
    }
}
