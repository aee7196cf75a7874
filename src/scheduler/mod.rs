//! Timer triggers for the monitor's entry points.
//!
//! Two kinds of job: repeating ones (`interval_at` with a first delay) and
//! daily ones driven by a cron expression evaluated in the local timezone.
//! Jobs never overlap themselves; different jobs serialize on the monitor's
//! own state lock.

use crate::clock::Clock;
use crate::monitor::{CheckOutcome, Monitor, NagOutcome};
use chrono_tz::Tz;
use cron::Schedule;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

pub mod expression;

use expression::next_fire;

#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    pub timezone: Tz,
    pub check_every: Duration,
    pub check_first: Duration,
    pub nag_every: Duration,
    pub nag_first: Duration,
    pub daily_reset: Schedule,
    pub nag_kickoff: Schedule,
    /// `None` when the holiday summary is disabled.
    pub holiday_summary: Option<Schedule>,
    pub portal_reminder: Schedule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    Check,
    Nag,
    NagKickoff,
    DailyReset,
    HolidaySummary,
    PortalReminder,
}

impl JobAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Nag => "nag",
            Self::NagKickoff => "nag_kickoff",
            Self::DailyReset => "daily_reset",
            Self::HolidaySummary => "holiday_summary",
            Self::PortalReminder => "portal_reminder",
        }
    }
}

/// Run one job body against the monitor.
pub async fn run_action(monitor: &Monitor, action: JobAction) {
    match action {
        JobAction::Check => match monitor.check().await {
            CheckOutcome::Skipped(reason) => {
                tracing::trace!(job = action.name(), ?reason, "skipped");
            }
            outcome => tracing::debug!(job = action.name(), ?outcome, "ran"),
        },
        JobAction::Nag | JobAction::NagKickoff => match monitor.nag().await {
            NagOutcome::Skipped(reason) => {
                tracing::trace!(job = action.name(), ?reason, "skipped");
            }
            outcome => tracing::debug!(job = action.name(), ?outcome, "ran"),
        },
        JobAction::DailyReset => monitor.daily_reset().await,
        JobAction::HolidaySummary => {
            let sent = monitor.send_holiday_summary().await;
            tracing::debug!(job = action.name(), sent, "ran");
        }
        JobAction::PortalReminder => {
            let sent = monitor.send_portal_reminder().await;
            tracing::debug!(job = action.name(), sent, "ran");
        }
    }
}

/// Spawn every job; the handles run until aborted.
pub fn spawn(
    monitor: &Arc<Monitor>,
    settings: &ScheduleSettings,
    clock: &Arc<dyn Clock>,
) -> Vec<JoinHandle<()>> {
    let mut handles = vec![
        spawn_repeating(
            Arc::clone(monitor),
            JobAction::Check,
            settings.check_first,
            settings.check_every,
        ),
        spawn_repeating(
            Arc::clone(monitor),
            JobAction::Nag,
            settings.nag_first,
            settings.nag_every,
        ),
        spawn_daily(
            Arc::clone(monitor),
            JobAction::DailyReset,
            settings.daily_reset.clone(),
            Arc::clone(clock),
        ),
        spawn_daily(
            Arc::clone(monitor),
            JobAction::NagKickoff,
            settings.nag_kickoff.clone(),
            Arc::clone(clock),
        ),
        spawn_daily(
            Arc::clone(monitor),
            JobAction::PortalReminder,
            settings.portal_reminder.clone(),
            Arc::clone(clock),
        ),
    ];

    if let Some(schedule) = &settings.holiday_summary {
        handles.push(spawn_daily(
            Arc::clone(monitor),
            JobAction::HolidaySummary,
            schedule.clone(),
            Arc::clone(clock),
        ));
    }

    tracing::info!(
        jobs = handles.len(),
        timezone = settings.timezone.name(),
        "scheduler started"
    );
    handles
}

fn spawn_repeating(
    monitor: Arc<Monitor>,
    action: JobAction,
    first: Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval_at(Instant::now() + first, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            run_action(&monitor, action).await;
        }
    })
}

fn spawn_daily(
    monitor: Arc<Monitor>,
    action: JobAction,
    schedule: Schedule,
    clock: Arc<dyn Clock>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut cursor = clock.now();
        loop {
            let Some(next) = next_fire(&schedule, &cursor) else {
                tracing::warn!(job = action.name(), "schedule has no future fire time; job stopped");
                return;
            };
            tracing::debug!(job = action.name(), next = %next, "next run scheduled");

            let wait = (next - clock.now()).to_std().unwrap_or_default();
            time::sleep(wait).await;
            run_action(&monitor, action).await;

            // Never fire the same slot twice if the timer woke a little early.
            cursor = next.max(clock.now());
        }
    })
}
