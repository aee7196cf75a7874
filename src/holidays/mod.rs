//! Public-holiday lookup for the weekday informational summary.
//!
//! Nothing here touches monitor state; a failed lookup just reads as "None".

use crate::error::FetchError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

pub mod nager;

pub use nager::NagerHolidayClient;

/// Holidays this close to today (in either direction) are listed.
pub const SUMMARY_RADIUS_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub label: String,
    pub code: String,
}

impl Country {
    pub fn new(label: &str, code: &str) -> Self {
        Self {
            label: label.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicHoliday {
    pub date: NaiveDate,
    pub name: String,
}

pub trait HolidayLookup: Send + Sync {
    fn public_holidays<'a>(
        &'a self,
        year: i32,
        country_code: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PublicHoliday>, FetchError>> + Send + 'a>>;
}

/// Build the weekly summary text, querying each country in order.
pub async fn weekly_summary(
    lookup: &dyn HolidayLookup,
    countries: &[Country],
    today: NaiveDate,
) -> String {
    let codes: Vec<&str> = countries.iter().map(|c| c.code.as_str()).collect();
    let mut lines = vec![format!(
        "📅 Public Holidays ({}) — Week of {}",
        codes.join(" / "),
        today.format("%d %b %Y")
    )];

    let year = chrono::Datelike::year(&today);
    for country in countries {
        let holidays = match lookup.public_holidays(year, &country.code).await {
            Ok(holidays) => holidays,
            Err(e) => {
                tracing::warn!(country = %country.code, "holiday lookup failed: {e}");
                Vec::new()
            }
        };

        let found = near(&holidays, today);
        if found.is_empty() {
            lines.push(format!("\n• {}: None", country.label));
        } else {
            lines.push(format!("\n• {}:", country.label));
            lines.extend(
                found
                    .iter()
                    .map(|h| format!("  - {}: {}", h.date.format("%a %d %b"), h.name)),
            );
        }
    }

    lines.join("\n")
}

fn near(holidays: &[PublicHoliday], today: NaiveDate) -> Vec<&PublicHoliday> {
    holidays
        .iter()
        .filter(|h| (h.date - today).num_days().abs() <= SUMMARY_RADIUS_DAYS)
        .collect()
}
