//! Bot API wire types. Only the fields the monitor reads are modelled.

use crate::channels::traits::{ChannelEvent, PollAnswer};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SentMessage {
    pub message_id: i64,
    pub poll: Option<Poll>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Poll {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub poll_answer: Option<TelegramPollAnswer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct User {
    pub id: i64,
    pub username: Option<String>,
}

impl User {
    fn display(&self) -> String {
        self.username
            .as_ref()
            .map_or_else(|| self.id.to_string(), |u| format!("@{u}"))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TelegramPollAnswer {
    pub poll_id: String,
    #[serde(default)]
    pub option_ids: Vec<usize>,
    pub user: Option<User>,
}

/// `/status@qcdt_bot now` → `status`.
pub(crate) fn parse_command(text: &str) -> Option<String> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    let name = command.split('@').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

impl Update {
    pub(crate) fn into_event(self) -> Option<ChannelEvent> {
        if let Some(answer) = self.poll_answer {
            return Some(ChannelEvent::PollAnswer(PollAnswer {
                poll_id: answer.poll_id,
                option_ids: answer.option_ids,
                voter: answer.user.as_ref().map(User::display),
            }));
        }

        let message = self.message?;
        let name = parse_command(message.text.as_deref()?)?;
        Some(ChannelEvent::Command {
            name,
            chat_id: message.chat.id.to_string(),
            sender: message.from.as_ref().map(User::display),
        })
    }
}
