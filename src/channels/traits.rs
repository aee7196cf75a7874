use crate::error::DeliveryError;
use std::future::Future;
use std::pin::Pin;

pub type ChannelFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How the receiving client should render a text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Identifies a poll once the platform has accepted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollHandle {
    pub id: String,
    pub message_id: Option<i64>,
}

/// A user's selection on a poll.
///
/// `option_ids` is empty when the user retracted their vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollAnswer {
    pub poll_id: String,
    pub option_ids: Vec<usize>,
    pub voter: Option<String>,
}

impl PollAnswer {
    pub fn new(poll_id: impl Into<String>, option_ids: Vec<usize>) -> Self {
        Self {
            poll_id: poll_id.into(),
            option_ids,
            voter: None,
        }
    }

    /// The first selected option, if any.
    pub fn choice(&self) -> Option<usize> {
        self.option_ids.first().copied()
    }
}

/// Something the channel observed that the daemon should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    PollAnswer(PollAnswer),
    /// A bot command such as `/status`, without the slash or `@botname`.
    Command {
        name: String,
        chat_id: String,
        sender: Option<String>,
    },
}

/// Outbound messages and polls to the monitored chat, plus the inbound stream
/// of poll answers and commands.
pub trait NotificationChannel: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Send a text message to the monitored chat
    fn send_text<'a>(
        &'a self,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>>;

    /// Open a non-anonymous multiple-choice poll in the monitored chat
    fn send_poll<'a>(
        &'a self,
        question: &'a str,
        options: &'a [&'a str],
    ) -> ChannelFuture<'a, Result<PollHandle, DeliveryError>>;

    /// Reply in an arbitrary chat (used for command responses)
    fn reply<'a>(
        &'a self,
        chat_id: &'a str,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>>;

    /// Start listening for poll answers and commands (long-running)
    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<ChannelEvent>,
    ) -> ChannelFuture<'a, anyhow::Result<()>>;

    /// Check if channel is healthy
    fn health_check<'a>(&'a self) -> ChannelFuture<'a, bool> {
        Box::pin(async move { true })
    }
}

/// Escape text for inclusion in an HTML-formatted message.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wrap text in a `<pre>` block, escaping it first.
pub fn pre_block(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html(text))
}
