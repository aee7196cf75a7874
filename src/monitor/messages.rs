//! Text of every broadcast the monitor sends.

use crate::channels::pre_block;
use crate::clock::{pretty_date, pretty_iso_date};
use crate::config::MessagesConfig;
use crate::endpoint::PricePayload;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::fmt::Display;

pub const ANNOUNCEMENT_OPTIONS: [&str; 3] = [
    "✅ Acknowledge",
    "🕵️ Investigating / Dispute",
    "🎌 Public holiday",
];

pub const NAG_OPTIONS: [&str; 2] = ["🕵️ Investigating / Dispute", "🎌 Public holiday"];

pub const MARKED_INVESTIGATING: &str =
    "🕵️ Marked as Investigating / Dispute. Monitoring stopped for today.";
pub const MARKED_HOLIDAY: &str = "🎌 Marked as Public holiday. Monitoring stopped for today.";
pub const MARKED_NOTED: &str = "Noted. Monitoring stopped for today.";

pub const NAG_HOLIDAY_NOTED: &str = "🎌 Public holiday noted. Nag reminders stopped for today.";
pub const NAG_INVESTIGATING_NOTED: &str = "🕵️ Noted: Investigating / Dispute.";

pub fn announcement_question(messages: &MessagesConfig) -> String {
    format!("{} price update detected. Action?", messages.product)
}

pub fn nag_question(messages: &MessagesConfig) -> String {
    format!("⚠️ {} price not updated yet. Action?", messages.product)
}

/// Raw payload as an HTML `<pre>` block.
pub fn payload_block(payload: &PricePayload) -> String {
    pre_block(&payload.to_json())
}

pub fn error_alert(messages: &MessagesConfig, error: &impl Display) -> String {
    format!(
        "⚠️ {} monitor error:\n{}",
        messages.product,
        pre_block(&error.to_string())
    )
}

/// Acknowledgment line for the "Acknowledge" answer.
///
/// An unparseable price date is shown as published rather than dropped.
pub fn acknowledgment(messages: &MessagesConfig, today: NaiveDate, payload: &PricePayload) -> String {
    let raw_date = payload.price_date();
    let price_date = pretty_iso_date(raw_date).unwrap_or_else(|| raw_date.to_string());
    format!(
        "Updated today on {} for {price_date} {} price. Price of {} tallies with NAV report. {}",
        pretty_date(today),
        messages.product,
        payload.price(),
        messages.cc_line
    )
}

pub fn startup_notice(messages: &MessagesConfig, now: &DateTime<Tz>) -> String {
    format!(
        "✅ {} bot online at {} ({})",
        messages.product,
        now.format("%a %d %b %Y %H:%M"),
        now.timezone().name()
    )
}

pub fn reset_notice(messages: &MessagesConfig, tz: Tz) -> String {
    format!("🔄 {} bot daily reset ({}).", messages.product, tz.name())
}

pub fn status_failure(error: &impl Display) -> String {
    format!("⚠️ /status failed: {error}")
}
