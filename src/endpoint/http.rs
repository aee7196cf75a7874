use super::{PriceEndpoint, PricePayload};
use crate::error::FetchError;
use crate::http_client::{build_client_with_timeout, truncate_body};
use std::future::Future;
use std::pin::Pin;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Fetches the price payload with a plain `GET`.
pub struct HttpPriceEndpoint {
    url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpPriceEndpoint {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url: url.into(),
            timeout_secs,
            client: build_client_with_timeout(timeout_secs),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn fetch_once(&self) -> Result<PricePayload, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, self.timeout_secs))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read response body: {e}>"));
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate_body(body.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        let value: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| FetchError::from_reqwest(&e, self.timeout_secs))?;

        PricePayload::from_value(value)
    }
}

impl PriceEndpoint for HttpPriceEndpoint {
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<PricePayload, FetchError>> + Send + 'a>> {
        Box::pin(self.fetch_once())
    }
}
