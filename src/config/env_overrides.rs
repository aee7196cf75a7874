use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("QCDT_BOT_TOKEN").or_else(|_| std::env::var("BOT_TOKEN"))
            && !token.trim().is_empty()
        {
            self.telegram.bot_token = token.trim().to_string();
        }

        if let Ok(chat_str) = std::env::var("QCDT_CHAT_ID")
            && let Ok(chat_id) = chat_str.trim().parse::<i64>()
        {
            self.telegram.chat_id = chat_id;
        }

        if let Ok(url) = std::env::var("QCDT_API_URL")
            && !url.is_empty()
        {
            self.endpoint.url = url;
        }

        if let Ok(tz) = std::env::var("QCDT_TIMEZONE")
            && !tz.is_empty()
        {
            self.schedule.timezone = tz;
        }
    }
}
