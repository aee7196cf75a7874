//! Wall-clock and calendar helpers.
//!
//! Every time decision the monitor makes goes through a [`Clock`] so tests can
//! pin "now" to a known local instant in the configured timezone.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use std::sync::{Mutex, PoisonError};

/// Marker format published by the price endpoint (naive local time).
pub const UPDATE_MARKER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the current local time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;

    fn timezone(&self) -> Tz {
        self.now().timezone()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Reads the system clock and converts it into the configured timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn timezone(&self) -> Tz {
        self.tz
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Tz>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Build a clock at a local wall-clock time such as `2025-06-10 17:30:00`.
    ///
    /// Returns `None` when the text does not parse or names a local time that
    /// does not exist in `tz`.
    pub fn at_local(tz: Tz, local: &str) -> Option<Self> {
        let naive = NaiveDateTime::parse_from_str(local, UPDATE_MARKER_FORMAT).ok()?;
        let now = naive.and_local_timezone(tz).single()?;
        Some(Self::new(now))
    }

    pub fn set(&self, now: DateTime<Tz>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard += delta;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Tz> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Inclusive local-time interval, e.g. 17:30–21:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// Monday through Friday.
pub fn is_business_day(dt: &DateTime<Tz>) -> bool {
    dt.weekday().num_days_from_monday() < 5
}

/// `10 Jun 2025`, day without a leading zero.
pub fn pretty_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Pretty-print a `YYYY-MM-DD` string, or `None` when it is not a date.
pub fn pretty_iso_date(raw: &str) -> Option<String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .map(pretty_date)
}

pub fn parse_update_marker(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), UPDATE_MARKER_FORMAT).ok()
}

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}
