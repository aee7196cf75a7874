//! In-memory endpoint and channel doubles shared by unit tests.

use crate::channels::{ChannelEvent, ChannelFuture, NotificationChannel, PollHandle, TextFormat};
use crate::endpoint::{PriceEndpoint, PricePayload};
use crate::error::{DeliveryError, FetchError};
use serde_json::json;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Hands out queued fetch results in order; an empty queue reads as a
/// network failure.
#[derive(Default)]
pub(crate) struct ScriptedEndpoint {
    responses: Mutex<VecDeque<Result<PricePayload, FetchError>>>,
    calls: AtomicUsize,
}

impl ScriptedEndpoint {
    pub(crate) fn push_ok(&self, update_time: &str) {
        let payload = PricePayload::from_value(json!({
            "code": 0,
            "data": {
                "update_time": update_time,
                "price_date": "2025-06-09",
                "price": "1.0023"
            }
        }))
        .unwrap();
        self.responses.lock().unwrap().push_back(Ok(payload));
    }

    pub(crate) fn push_err(&self, err: FetchError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PriceEndpoint for ScriptedEndpoint {
    fn fetch<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<PricePayload, FetchError>> + Send + 'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Network("no scripted response".into())));
        Box::pin(async move { next })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Sent {
    Text {
        text: String,
        format: TextFormat,
    },
    Poll {
        id: String,
        question: String,
        options: Vec<String>,
    },
    Reply {
        chat_id: String,
        text: String,
        format: TextFormat,
    },
}

/// Records everything sent; polls get ids `poll-1`, `poll-2`, ...
#[derive(Default)]
pub(crate) struct RecordingChannel {
    sent: Mutex<Vec<Sent>>,
    next_poll: AtomicUsize,
    pub(crate) fail_polls: AtomicBool,
}

impl RecordingChannel {
    pub(crate) fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Broadcast texts only, in order.
    pub(crate) fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    /// `(id, question, options)` of every poll opened.
    pub(crate) fn polls(&self) -> Vec<(String, String, Vec<String>)> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Poll {
                    id,
                    question,
                    options,
                } => Some((id, question, options)),
                _ => None,
            })
            .collect()
    }
}

impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn send_text<'a>(
        &'a self,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>> {
        self.sent.lock().unwrap().push(Sent::Text {
            text: text.to_string(),
            format,
        });
        Box::pin(async { Ok(()) })
    }

    fn send_poll<'a>(
        &'a self,
        question: &'a str,
        options: &'a [&'a str],
    ) -> ChannelFuture<'a, Result<PollHandle, DeliveryError>> {
        if self.fail_polls.load(Ordering::SeqCst) {
            return Box::pin(async { Err(DeliveryError::Forbidden { method: "sendPoll" }) });
        }
        let id = format!("poll-{}", self.next_poll.fetch_add(1, Ordering::SeqCst) + 1);
        self.sent.lock().unwrap().push(Sent::Poll {
            id: id.clone(),
            question: question.to_string(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
        });
        Box::pin(async move {
            Ok(PollHandle {
                id,
                message_id: None,
            })
        })
    }

    fn reply<'a>(
        &'a self,
        chat_id: &'a str,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>> {
        self.sent.lock().unwrap().push(Sent::Reply {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            format,
        });
        Box::pin(async { Ok(()) })
    }

    fn listen<'a>(
        &'a self,
        _tx: tokio::sync::mpsc::Sender<ChannelEvent>,
    ) -> ChannelFuture<'a, anyhow::Result<()>> {
        Box::pin(async { Ok(()) })
    }
}
