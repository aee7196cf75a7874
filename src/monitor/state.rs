use crate::endpoint::PricePayload;
use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use std::collections::HashMap;

/// Which workflow a poll belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollWorkflow {
    Announcement,
    Nag,
}

/// Active poll identifiers and the workflow each one answers for.
///
/// At most one announcement poll and one nag poll are tracked. A new nag poll
/// supersedes the previous one, so answers to older nag polls no longer
/// resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollRegistry {
    active: HashMap<String, PollWorkflow>,
}

impl PollRegistry {
    pub fn register_announcement(&mut self, poll_id: String) {
        self.active
            .retain(|_, workflow| *workflow != PollWorkflow::Announcement);
        self.active.insert(poll_id, PollWorkflow::Announcement);
    }

    /// Register a nag poll, returning the identifier it superseded.
    pub fn register_nag(&mut self, poll_id: String) -> Option<String> {
        let previous = self.pending_nag().map(str::to_string);
        if let Some(old) = &previous {
            self.active.remove(old);
        }
        self.active.insert(poll_id, PollWorkflow::Nag);
        previous
    }

    pub fn lookup(&self, poll_id: &str) -> Option<PollWorkflow> {
        self.active.get(poll_id).copied()
    }

    /// Stop tracking a poll once its answer has been consumed.
    pub fn resolve(&mut self, poll_id: &str) -> Option<PollWorkflow> {
        self.active.remove(poll_id)
    }

    pub fn pending_announcement(&self) -> Option<&str> {
        self.find(PollWorkflow::Announcement)
    }

    pub fn pending_nag(&self) -> Option<&str> {
        self.find(PollWorkflow::Nag)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    fn find(&self, wanted: PollWorkflow) -> Option<&str> {
        self.active
            .iter()
            .find(|(_, workflow)| **workflow == wanted)
            .map(|(id, _)| id.as_str())
    }
}

/// Everything the monitor remembers about the current day.
///
/// The zero value (`Default`) is the start-of-day state; the daily reset
/// replaces the whole struct with it and nothing else clears a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyMonitorState {
    pub last_seen_marker: Option<String>,
    pub update_detected: bool,
    pub monitoring_halted: bool,
    pub nagging_halted: bool,
    pub pending_payload: Option<PricePayload>,
    pub polls: PollRegistry,
    pub last_error_notified_at: Option<DateTime<Tz>>,
}

impl DailyMonitorState {
    /// Record a freshly observed marker, returning whether it differs from
    /// the previous one.
    pub fn observe_marker(&mut self, marker: &str) -> bool {
        let changed = self.last_seen_marker.as_deref() != Some(marker);
        self.last_seen_marker = Some(marker.to_string());
        changed
    }

    pub fn should_announce(&self, changed: bool, is_today: bool) -> bool {
        changed && is_today && !self.update_detected
    }

    pub fn mark_detected(&mut self, payload: PricePayload) {
        self.update_detected = true;
        self.pending_payload = Some(payload);
    }

    /// Whether an error broadcast is allowed at `now`; records `now` when it is.
    pub fn claim_error_slot(&mut self, now: DateTime<Tz>, cooldown: TimeDelta) -> bool {
        let allowed = self
            .last_error_notified_at
            .is_none_or(|last| now - last >= cooldown);
        if allowed {
            self.last_error_notified_at = Some(now);
        }
        allowed
    }
}
