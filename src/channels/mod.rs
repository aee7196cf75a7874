pub mod telegram;
pub mod traits;

pub use telegram::TelegramChannel;
pub use traits::{
    ChannelEvent, ChannelFuture, NotificationChannel, PollAnswer, PollHandle, TextFormat,
    escape_html, pre_block,
};
