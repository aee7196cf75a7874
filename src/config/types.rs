use crate::holidays::Country;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Path the config was loaded from - not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub endpoint: EndpointConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub holidays: HolidaysConfig,
}

// ── Telegram ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Required; usually supplied via `BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_chat_id")]
    pub chat_id: i64,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_chat_id() -> i64 {
    -5_299_275_232
}

fn default_telegram_api_base() -> String {
    crate::channels::telegram::DEFAULT_API_BASE.into()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: default_chat_id(),
            api_base: default_telegram_api_base(),
        }
    }
}

// ── Price endpoint ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_endpoint_url")]
    pub url: String,
    #[serde(default = "default_endpoint_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "https://uat.dmz.finance/stores/tdd/qcdt/new_price".into()
}

fn default_endpoint_timeout_secs() -> u64 {
    15
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_secs: default_endpoint_timeout_secs(),
        }
    }
}

// ── Schedule ─────────────────────────────────────────────────────────────

/// Local-time window given as `HH:MM` or `HH:MM:SS`, both ends inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub start: String,
    pub end: String,
}

impl WindowConfig {
    fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA timezone every time decision is made in.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_check_window")]
    pub check_window: WindowConfig,
    #[serde(default = "default_nag_window")]
    pub nag_window: WindowConfig,

    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default = "default_check_first_delay_secs")]
    pub check_first_delay_secs: u64,
    #[serde(default = "default_nag_interval_secs")]
    pub nag_interval_secs: u64,
    #[serde(default = "default_nag_first_delay_secs")]
    pub nag_first_delay_secs: u64,

    #[serde(default = "default_error_cooldown_mins")]
    pub error_cooldown_mins: u32,

    /// Cron expressions (5-field crontab or 6/7-field with seconds),
    /// evaluated in `timezone`.
    #[serde(default = "default_daily_reset")]
    pub daily_reset: String,
    #[serde(default = "default_nag_kickoff")]
    pub nag_kickoff: String,
    #[serde(default = "default_holiday_summary")]
    pub holiday_summary: String,
    #[serde(default = "default_portal_reminder")]
    pub portal_reminder: String,
}

fn default_timezone() -> String {
    "Asia/Singapore".into()
}

fn default_check_window() -> WindowConfig {
    WindowConfig::new("15:00", "21:00")
}

fn default_nag_window() -> WindowConfig {
    WindowConfig::new("17:30", "21:00")
}

fn default_check_interval_secs() -> u64 {
    120
}

fn default_check_first_delay_secs() -> u64 {
    10
}

fn default_nag_interval_secs() -> u64 {
    300
}

fn default_nag_first_delay_secs() -> u64 {
    60
}

fn default_error_cooldown_mins() -> u32 {
    60
}

fn default_daily_reset() -> String {
    "1 0 * * *".into()
}

fn default_nag_kickoff() -> String {
    "30 17 * * Mon-Fri".into()
}

fn default_holiday_summary() -> String {
    "45 16 * * Mon-Fri".into()
}

fn default_portal_reminder() -> String {
    "30 17 * * Mon-Fri".into()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            check_window: default_check_window(),
            nag_window: default_nag_window(),
            check_interval_secs: default_check_interval_secs(),
            check_first_delay_secs: default_check_first_delay_secs(),
            nag_interval_secs: default_nag_interval_secs(),
            nag_first_delay_secs: default_nag_first_delay_secs(),
            error_cooldown_mins: default_error_cooldown_mins(),
            daily_reset: default_daily_reset(),
            nag_kickoff: default_nag_kickoff(),
            holiday_summary: default_holiday_summary(),
            portal_reminder: default_portal_reminder(),
        }
    }
}

// ── Messages ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesConfig {
    /// Product name used in every broadcast.
    #[serde(default = "default_product")]
    pub product: String,
    /// Escalation line sent right after an update is announced.
    #[serde(default = "default_tag_line")]
    pub tag_line: String,
    /// Mentions appended to the acknowledgment line.
    #[serde(default = "default_cc_line")]
    pub cc_line: String,
    #[serde(default = "default_daily_reminder")]
    pub daily_reminder: String,
}

fn default_product() -> String {
    "QCDT".into()
}

fn default_tag_line() -> String {
    "@mrpotato1234 please cross ref QCDT price to NAV pack email".into()
}

fn default_cc_line() -> String {
    "CC: @Nathan_DMZ @LEEKAIYANG @Duke_RWAlpha @AscentHamza @Ascentkaiwei".into()
}

fn default_daily_reminder() -> String {
    "📝 Ascent, please remember to update QCDT price on the portal.".into()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            product: default_product(),
            tag_line: default_tag_line(),
            cc_line: default_cc_line(),
            daily_reminder: default_daily_reminder(),
        }
    }
}

// ── Holidays ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidaysConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_holidays_api_base")]
    pub api_base: String,
    #[serde(default = "default_countries")]
    pub countries: Vec<Country>,
}

fn default_true() -> bool {
    true
}

fn default_holidays_api_base() -> String {
    crate::holidays::nager::DEFAULT_API_BASE.into()
}

fn default_countries() -> Vec<Country> {
    vec![Country::new("Singapore", "SG"), Country::new("UAE", "AE")]
}

impl Default for HolidaysConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: default_holidays_api_base(),
            countries: default_countries(),
        }
    }
}
