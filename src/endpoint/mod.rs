use crate::error::FetchError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub mod http;

pub use http::HttpPriceEndpoint;

/// Latest published price as returned by the endpoint.
///
/// The raw JSON is kept verbatim because it is broadcast as-is; the update
/// marker is extracted once at construction so a payload without one can
/// never reach the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePayload {
    raw: Value,
    marker: String,
}

impl PricePayload {
    pub fn from_value(raw: Value) -> Result<Self, FetchError> {
        let marker = raw
            .get("data")
            .and_then(|d| d.get("update_time"))
            .and_then(Value::as_str)
            .ok_or_else(|| FetchError::Malformed("missing data.update_time".into()))?
            .to_string();
        Ok(Self { raw, marker })
    }

    /// `YYYY-MM-DD HH:MM:SS`, naive local time.
    pub fn update_marker(&self) -> &str {
        &self.marker
    }

    /// `YYYY-MM-DD`, or empty when absent.
    pub fn price_date(&self) -> &str {
        self.data_field("price_date")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The price as published; numbers are rendered without reformatting.
    pub fn price(&self) -> String {
        match self.data_field("price") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn to_json(&self) -> String {
        self.raw.to_string()
    }

    fn data_field(&self, key: &str) -> Option<&Value> {
        self.raw.get("data").and_then(|d| d.get(key))
    }
}

/// Source of the latest published price.
pub trait PriceEndpoint: Send + Sync {
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<PricePayload, FetchError>> + Send + 'a>>;
}
