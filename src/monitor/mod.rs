//! The detection-and-acknowledgment state machine.
//!
//! [`Monitor`] owns the day's [`DailyMonitorState`] behind a single async
//! mutex. Every entry point (scheduled tick, poll answer, reset, startup)
//! holds that mutex for its whole run, outbound calls included, so each
//! read-modify-write is observed atomically by the next one.
//!
//! Entry points never return errors: endpoint failures are broadcast under a
//! cooldown and delivery failures are logged, so one bad tick cannot take the
//! process down.

use crate::channels::{NotificationChannel, PollAnswer, PollHandle, TextFormat};
use crate::clock::{Clock, TimeWindow, is_business_day, parse_update_marker};
use crate::config::MessagesConfig;
use crate::endpoint::{PriceEndpoint, PricePayload};
use crate::error::FetchError;
use crate::holidays::{Country, HolidayLookup, weekly_summary};
use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::sync::Mutex;

pub mod messages;
pub mod state;


pub use state::{DailyMonitorState, PollRegistry, PollWorkflow};

/// Resolved, validated knobs the state machine runs with.
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub check_window: TimeWindow,
    pub nag_window: TimeWindow,
    pub error_cooldown: TimeDelta,
    pub messages: MessagesConfig,
    pub holiday_countries: Vec<Country>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MonitoringHalted,
    NaggingHalted,
    AlreadyDetected,
    NotBusinessDay,
    OutsideWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Skipped(SkipReason),
    /// The fetch failed; `alerted` tells whether the cooldown allowed a broadcast.
    FetchFailed { alerted: bool },
    /// A marker was read but nothing was announced.
    Observed { changed: bool, is_today: bool },
    Announced { poll_opened: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NagOutcome {
    Skipped(SkipReason),
    Opened {
        poll_id: String,
        superseded: Option<String>,
    },
    PollFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementChoice {
    Acknowledge,
    Investigating,
    PublicHoliday,
    Other(usize),
}

impl AnnouncementChoice {
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Acknowledge,
            1 => Self::Investigating,
            2 => Self::PublicHoliday,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NagChoice {
    Investigating,
    PublicHoliday,
}

impl NagChoice {
    pub fn from_index(index: usize) -> Self {
        if index == 1 {
            Self::PublicHoliday
        } else {
            Self::Investigating
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The vote was retracted; nothing selected.
    NoSelection,
    /// The poll is unknown, already resolved, or superseded.
    Stale,
    Announcement(AnnouncementChoice),
    Nag(NagChoice),
}

pub struct Monitor {
    endpoint: Arc<dyn PriceEndpoint>,
    channel: Arc<dyn NotificationChannel>,
    clock: Arc<dyn Clock>,
    holidays: Option<Arc<dyn HolidayLookup>>,
    settings: MonitorSettings,
    state: Mutex<DailyMonitorState>,
}

impl Monitor {
    pub fn new(
        endpoint: Arc<dyn PriceEndpoint>,
        channel: Arc<dyn NotificationChannel>,
        clock: Arc<dyn Clock>,
        settings: MonitorSettings,
    ) -> Self {
        Self {
            endpoint,
            channel,
            clock,
            holidays: None,
            settings,
            state: Mutex::new(DailyMonitorState::default()),
        }
    }

    pub fn with_holidays(mut self, lookup: Arc<dyn HolidayLookup>) -> Self {
        self.holidays = Some(lookup);
        self
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> DailyMonitorState {
        self.state.lock().await.clone()
    }

    // ── Change detection ────────────────────────────────────────────────

    pub async fn check(&self) -> CheckOutcome {
        let mut state = self.state.lock().await;
        if state.monitoring_halted {
            return CheckOutcome::Skipped(SkipReason::MonitoringHalted);
        }

        let now = self.clock.now();
        if !is_business_day(&now) {
            return CheckOutcome::Skipped(SkipReason::NotBusinessDay);
        }
        if !self.settings.check_window.contains(now.time()) {
            return CheckOutcome::Skipped(SkipReason::OutsideWindow);
        }

        let payload = match self.endpoint.fetch().await {
            Ok(payload) => payload,
            Err(e) => return self.report_fetch_error(&mut state, now, &e).await,
        };

        let marker = payload.update_marker().to_string();
        let Some(marker_time) = parse_update_marker(&marker) else {
            let e = FetchError::Malformed(format!("unparseable update_time {marker:?}"));
            return self.report_fetch_error(&mut state, now, &e).await;
        };

        let changed = state.observe_marker(&marker);
        let is_today = marker_time.date() == now.date_naive();

        if !state.should_announce(changed, is_today) {
            if changed {
                tracing::info!(%marker, is_today, "update marker changed; not announcing");
            } else {
                tracing::debug!(%marker, "update marker unchanged");
            }
            return CheckOutcome::Observed { changed, is_today };
        }

        tracing::info!(%marker, "same-day price update detected; announcing");
        state.mark_detected(payload.clone());
        self.announce(&mut state, &payload).await
    }

    async fn announce(&self, state: &mut DailyMonitorState, payload: &PricePayload) -> CheckOutcome {
        self.broadcast(&messages::payload_block(payload), TextFormat::Html)
            .await;
        self.broadcast(&self.settings.messages.tag_line, TextFormat::Plain)
            .await;

        let question = messages::announcement_question(&self.settings.messages);
        match self.open_poll(&question, &messages::ANNOUNCEMENT_OPTIONS).await {
            Some(handle) => {
                tracing::info!(poll_id = %handle.id, "announcement poll opened");
                state.polls.register_announcement(handle.id);
                CheckOutcome::Announced { poll_opened: true }
            }
            None => CheckOutcome::Announced { poll_opened: false },
        }
    }

    async fn report_fetch_error(
        &self,
        state: &mut DailyMonitorState,
        now: DateTime<Tz>,
        error: &FetchError,
    ) -> CheckOutcome {
        if !state.claim_error_slot(now, self.settings.error_cooldown) {
            tracing::warn!("price fetch failed (alert suppressed by cooldown): {error}");
            return CheckOutcome::FetchFailed { alerted: false };
        }

        tracing::warn!("price fetch failed: {error}");
        let text = messages::error_alert(&self.settings.messages, error);
        self.broadcast(&text, TextFormat::Html).await;
        CheckOutcome::FetchFailed { alerted: true }
    }

    // ── Nagging ─────────────────────────────────────────────────────────

    /// One nag attempt; shared by the daily kickoff and the repeating tick.
    pub async fn nag(&self) -> NagOutcome {
        let mut state = self.state.lock().await;
        self.nag_locked(&mut state).await
    }

    async fn nag_locked(&self, state: &mut DailyMonitorState) -> NagOutcome {
        if state.monitoring_halted {
            return NagOutcome::Skipped(SkipReason::MonitoringHalted);
        }
        if state.nagging_halted {
            return NagOutcome::Skipped(SkipReason::NaggingHalted);
        }
        if state.update_detected {
            return NagOutcome::Skipped(SkipReason::AlreadyDetected);
        }

        let now = self.clock.now();
        if !is_business_day(&now) {
            return NagOutcome::Skipped(SkipReason::NotBusinessDay);
        }
        if !self.settings.nag_window.contains(now.time()) {
            return NagOutcome::Skipped(SkipReason::OutsideWindow);
        }

        let question = messages::nag_question(&self.settings.messages);
        let Some(handle) = self.open_poll(&question, &messages::NAG_OPTIONS).await else {
            return NagOutcome::PollFailed;
        };

        let superseded = state.polls.register_nag(handle.id.clone());
        tracing::info!(poll_id = %handle.id, superseded = ?superseded, "nag poll opened");
        NagOutcome::Opened {
            poll_id: handle.id,
            superseded,
        }
    }

    // ── Poll answers ────────────────────────────────────────────────────

    pub async fn handle_poll_answer(&self, answer: &PollAnswer) -> AnswerOutcome {
        let Some(index) = answer.choice() else {
            tracing::debug!(poll_id = %answer.poll_id, "poll vote retracted; ignoring");
            return AnswerOutcome::NoSelection;
        };

        let mut state = self.state.lock().await;
        match state.polls.lookup(&answer.poll_id) {
            None => {
                tracing::debug!(poll_id = %answer.poll_id, "answer to unknown or superseded poll dropped");
                AnswerOutcome::Stale
            }
            Some(PollWorkflow::Announcement) => {
                self.resolve_announcement(&mut state, answer, index).await
            }
            Some(PollWorkflow::Nag) => self.resolve_nag(&mut state, answer, index).await,
        }
    }

    async fn resolve_announcement(
        &self,
        state: &mut DailyMonitorState,
        answer: &PollAnswer,
        index: usize,
    ) -> AnswerOutcome {
        state.polls.resolve(&answer.poll_id);
        state.monitoring_halted = true;

        let choice = AnnouncementChoice::from_index(index);
        tracing::info!(
            poll_id = %answer.poll_id,
            option = index,
            voter = answer.voter.as_deref().unwrap_or("unknown"),
            "announcement poll answered; monitoring halted for today"
        );

        let text = match (choice, state.pending_payload.as_ref()) {
            (AnnouncementChoice::Acknowledge, Some(payload)) => {
                messages::acknowledgment(&self.settings.messages, self.clock.today(), payload)
            }
            (AnnouncementChoice::Investigating, _) => messages::MARKED_INVESTIGATING.to_string(),
            (AnnouncementChoice::PublicHoliday, _) => messages::MARKED_HOLIDAY.to_string(),
            _ => messages::MARKED_NOTED.to_string(),
        };
        self.broadcast(&text, TextFormat::Plain).await;

        AnswerOutcome::Announcement(choice)
    }

    async fn resolve_nag(
        &self,
        state: &mut DailyMonitorState,
        answer: &PollAnswer,
        index: usize,
    ) -> AnswerOutcome {
        let choice = NagChoice::from_index(index);
        tracing::info!(poll_id = %answer.poll_id, option = index, "nag poll answered");

        match choice {
            NagChoice::PublicHoliday => {
                state.nagging_halted = true;
                state.polls.resolve(&answer.poll_id);
                self.broadcast(messages::NAG_HOLIDAY_NOTED, TextFormat::Plain)
                    .await;
            }
            NagChoice::Investigating => {
                self.broadcast(messages::NAG_INVESTIGATING_NOTED, TextFormat::Plain)
                    .await;
            }
        }

        AnswerOutcome::Nag(choice)
    }

    // ── Daily lifecycle ─────────────────────────────────────────────────

    /// Back to the start-of-day state, unconditionally.
    pub async fn daily_reset(&self) {
        let mut state = self.state.lock().await;
        *state = DailyMonitorState::default();
        tracing::info!("daily state reset");

        let text = messages::reset_notice(&self.settings.messages, self.clock.timezone());
        self.broadcast(&text, TextFormat::Plain).await;
    }

    /// Startup notice, then an immediate nag attempt to cover a kickoff or
    /// repeat tick missed while the process was down.
    pub async fn resume_after_restart(&self) -> NagOutcome {
        let mut state = self.state.lock().await;

        let now = self.clock.now();
        let text = messages::startup_notice(&self.settings.messages, &now);
        self.broadcast(&text, TextFormat::Plain).await;

        let outcome = self.nag_locked(&mut state).await;
        if let NagOutcome::Opened { poll_id, .. } = &outcome {
            tracing::info!(%poll_id, "resumed nagging after restart");
        }
        outcome
    }

    // ── Informational broadcasts ────────────────────────────────────────

    /// Weekly public-holiday summary; returns whether it was sent.
    pub async fn send_holiday_summary(&self) -> bool {
        let Some(lookup) = self.holidays.as_ref() else {
            return false;
        };
        if !self.informational_allowed().await {
            return false;
        }

        let text = weekly_summary(
            lookup.as_ref(),
            &self.settings.holiday_countries,
            self.clock.today(),
        )
        .await;
        self.broadcast(&text, TextFormat::Plain).await
    }

    /// Daily "please update the portal" line; returns whether it was sent.
    pub async fn send_portal_reminder(&self) -> bool {
        if !self.informational_allowed().await {
            return false;
        }
        self.broadcast(&self.settings.messages.daily_reminder, TextFormat::Plain)
            .await
    }

    async fn informational_allowed(&self) -> bool {
        let halted = self.state.lock().await.monitoring_halted;
        !halted && is_business_day(&self.clock.now())
    }

    // ── Status probe ────────────────────────────────────────────────────

    /// One fetch, rendered for a chat reply. Does not touch daily state.
    pub async fn status_report(&self) -> (String, TextFormat) {
        match self.endpoint.fetch().await {
            Ok(payload) => (messages::payload_block(&payload), TextFormat::Html),
            Err(e) => (messages::status_failure(&e), TextFormat::Plain),
        }
    }

    // ── Delivery helpers ────────────────────────────────────────────────

    async fn broadcast(&self, text: &str, format: TextFormat) -> bool {
        match self.channel.send_text(text, format).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("{} send failed: {e}", self.channel.name());
                false
            }
        }
    }

    async fn open_poll(&self, question: &str, options: &[&str]) -> Option<PollHandle> {
        match self.channel.send_poll(question, options).await {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("{} poll send failed: {e}", self.channel.name());
                None
            }
        }
    }
}
