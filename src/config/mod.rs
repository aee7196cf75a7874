mod env_overrides;
mod loader;
mod settings;
#[cfg(test)]
mod test_env;
pub mod types;

pub use types::{
    Config, EndpointConfig, HolidaysConfig, MessagesConfig, ScheduleConfig, TelegramConfig,
    WindowConfig,
};
