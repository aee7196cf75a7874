pub(crate) mod api;
mod handler;


use crate::http_client::build_client_with_timeout;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Seconds `getUpdates` is allowed to hold the connection open.
const LONG_POLL_SECS: u64 = 30;
/// Client-side ceiling for a single request, long polls included.
const REQUEST_TIMEOUT_SECS: u64 = LONG_POLL_SECS + 15;
/// Back-off after a failed `getUpdates` round.
const POLL_ERROR_BACKOFF_SECS: u64 = 5;

/// Telegram channel: posts to one chat and long-polls the Bot API for
/// poll answers and commands
pub struct TelegramChannel {
    bot_token: String,
    chat_id: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            bot_token,
            chat_id,
            api_base: DEFAULT_API_BASE.to_string(),
            client: build_client_with_timeout(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Point the channel at a different Bot API server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}
