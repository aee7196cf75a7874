//! Resolution of raw config values into the typed settings the runtime uses.
//!
//! Everything that can be wrong with a config file surfaces here, before any
//! network connection is opened.

use super::{Config, WindowConfig};
use crate::clock::{TimeWindow, parse_clock_time};
use crate::error::ConfigError;
use crate::monitor::MonitorSettings;
use crate::scheduler::ScheduleSettings;
use crate::scheduler::expression::parse_schedule;
use chrono::TimeDelta;
use chrono_tz::Tz;
use cron::Schedule;
use std::time::Duration;

impl Config {
    pub fn require_bot_token(&self) -> Result<&str, ConfigError> {
        let token = self.telegram.bot_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingCredential("telegram.bot_token"));
        }
        Ok(token)
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.schedule.timezone.parse::<Tz>().map_err(|_| {
            ConfigError::Validation(format!(
                "schedule.timezone: unknown timezone {:?}",
                self.schedule.timezone
            ))
        })
    }

    pub fn monitor_settings(&self) -> Result<MonitorSettings, ConfigError> {
        let check_window = window("schedule.check_window", &self.schedule.check_window)?;
        let nag_window = window("schedule.nag_window", &self.schedule.nag_window)?;

        if self.messages.product.trim().is_empty() {
            return Err(ConfigError::Validation(
                "messages.product must not be empty".into(),
            ));
        }

        let countries = if self.holidays.enabled {
            self.holidays.countries.clone()
        } else {
            Vec::new()
        };

        Ok(MonitorSettings {
            check_window,
            nag_window,
            error_cooldown: TimeDelta::minutes(i64::from(self.schedule.error_cooldown_mins)),
            messages: self.messages.clone(),
            holiday_countries: countries,
        })
    }

    pub fn schedule_settings(&self) -> Result<ScheduleSettings, ConfigError> {
        let s = &self.schedule;
        Ok(ScheduleSettings {
            timezone: self.timezone()?,
            check_every: positive_secs("schedule.check_interval_secs", s.check_interval_secs)?,
            check_first: Duration::from_secs(s.check_first_delay_secs),
            nag_every: positive_secs("schedule.nag_interval_secs", s.nag_interval_secs)?,
            nag_first: Duration::from_secs(s.nag_first_delay_secs),
            daily_reset: cron("schedule.daily_reset", &s.daily_reset)?,
            nag_kickoff: cron("schedule.nag_kickoff", &s.nag_kickoff)?,
            holiday_summary: if self.holidays.enabled {
                Some(cron("schedule.holiday_summary", &s.holiday_summary)?)
            } else {
                None
            },
            portal_reminder: cron("schedule.portal_reminder", &s.portal_reminder)?,
        })
    }

    /// Every check `run` would perform before connecting to anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.require_bot_token()?;
        self.monitor_settings()?;
        self.schedule_settings()?;
        Ok(())
    }
}

fn window(field: &str, raw: &WindowConfig) -> Result<TimeWindow, ConfigError> {
    let parse = |which: &str, value: &str| {
        parse_clock_time(value).ok_or_else(|| {
            ConfigError::Validation(format!("{field}.{which}: expected HH:MM, got {value:?}"))
        })
    };
    let start = parse("start", &raw.start)?;
    let end = parse("end", &raw.end)?;
    if start > end {
        return Err(ConfigError::Validation(format!(
            "{field}: start {} is after end {}",
            raw.start, raw.end
        )));
    }
    Ok(TimeWindow::new(start, end))
}

fn positive_secs(field: &str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::Validation(format!("{field} must be greater than 0")));
    }
    Ok(Duration::from_secs(secs))
}

fn cron(field: &str, expr: &str) -> Result<Schedule, ConfigError> {
    parse_schedule(expr).map_err(|e| ConfigError::Validation(format!("{field}: {e:#}")))
}
