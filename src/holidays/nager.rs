use super::{HolidayLookup, PublicHoliday};
use crate::error::FetchError;
use crate::http_client::{build_client_with_timeout, truncate_body};
use chrono::NaiveDate;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;

pub const DEFAULT_API_BASE: &str = "https://date.nager.at";
const TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    #[serde(default)]
    date: String,
    name: Option<String>,
    local_name: Option<String>,
}

/// Client for the public Nager.Date holiday API.
pub struct NagerHolidayClient {
    api_base: String,
    client: reqwest::Client,
}

impl NagerHolidayClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            client: build_client_with_timeout(TIMEOUT_SECS),
        }
    }

    fn url(&self, year: i32, country_code: &str) -> String {
        format!(
            "{}/api/v3/PublicHolidays/{year}/{country_code}",
            self.api_base.trim_end_matches('/')
        )
    }

    async fn fetch(&self, year: i32, country_code: &str) -> Result<Vec<PublicHoliday>, FetchError> {
        let resp = self
            .client
            .get(self.url(year, country_code))
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, TIMEOUT_SECS))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(&body, 200),
            });
        }

        let raw: Vec<NagerHoliday> = resp
            .json()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, TIMEOUT_SECS))?;

        // Entries with an unreadable date are skipped rather than failing the lookup.
        Ok(raw
            .into_iter()
            .filter_map(|h| {
                let date = NaiveDate::parse_from_str(&h.date, "%Y-%m-%d").ok()?;
                let name = h
                    .name
                    .filter(|n| !n.is_empty())
                    .or(h.local_name.filter(|n| !n.is_empty()))
                    .unwrap_or_else(|| "Holiday".into());
                Some(PublicHoliday { date, name })
            })
            .collect())
    }
}

impl HolidayLookup for NagerHolidayClient {
    fn public_holidays<'a>(
        &'a self,
        year: i32,
        country_code: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PublicHoliday>, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch(year, country_code))
    }
}
