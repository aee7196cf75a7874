use super::api::{ApiResponse, SentMessage, Update};
use super::{LONG_POLL_SECS, POLL_ERROR_BACKOFF_SECS, TelegramChannel};
use crate::channels::traits::{
    ChannelEvent, ChannelFuture, NotificationChannel, PollHandle, TextFormat,
};
use crate::error::DeliveryError;
use crate::http_client::truncate_body;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

impl TelegramChannel {
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: &Value,
    ) -> Result<T, DeliveryError> {
        let resp = self
            .client
            .post(self.api_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Network {
                method,
                message: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| DeliveryError::Network {
            method,
            message: e.to_string(),
        })?;

        let parsed: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(parsed) => parsed,
            Err(_) if status == StatusCode::FORBIDDEN => {
                return Err(DeliveryError::Forbidden { method });
            }
            Err(e) => {
                return Err(DeliveryError::Rejected {
                    method,
                    description: format!(
                        "unreadable response ({status}, {e}): {}",
                        truncate_body(&text, 200)
                    ),
                });
            }
        };

        if status == StatusCode::FORBIDDEN || parsed.error_code == Some(403) {
            return Err(DeliveryError::Forbidden { method });
        }

        if !parsed.ok || !status.is_success() {
            return Err(DeliveryError::Rejected {
                method,
                description: parsed.description.unwrap_or_else(|| status.to_string()),
            });
        }

        parsed.result.ok_or_else(|| DeliveryError::Rejected {
            method,
            description: "response carried no result".into(),
        })
    }

    async fn post_message(
        &self,
        chat_id: &str,
        text: &str,
        format: TextFormat,
    ) -> Result<(), DeliveryError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if format == TextFormat::Html {
            body["parse_mode"] = json!("HTML");
        }

        let _: SentMessage = self.call("sendMessage", &body).await?;
        Ok(())
    }

    async fn post_poll(&self, question: &str, options: &[&str]) -> Result<PollHandle, DeliveryError> {
        let body = json!({
            "chat_id": self.chat_id,
            "question": question,
            "options": options,
            "is_anonymous": false,
        });

        let sent: SentMessage = self.call("sendPoll", &body).await?;
        let poll = sent.poll.ok_or_else(|| DeliveryError::Rejected {
            method: "sendPoll",
            description: "response carried no poll".into(),
        })?;

        Ok(PollHandle {
            id: poll.id,
            message_id: Some(sent.message_id),
        })
    }

    async fn poll_updates(&self, tx: tokio::sync::mpsc::Sender<ChannelEvent>) -> anyhow::Result<()> {
        let mut offset: i64 = 0;

        tracing::info!("Telegram channel listening for poll answers and commands...");

        loop {
            let body = json!({
                "offset": offset,
                "timeout": LONG_POLL_SECS,
                "allowed_updates": ["message", "poll_answer"]
            });

            let updates: Vec<Value> = match self.call("getUpdates", &body).await {
                Ok(updates) => updates,
                Err(e) => {
                    tracing::warn!("Telegram poll error: {e}");
                    tokio::time::sleep(Duration::from_secs(POLL_ERROR_BACKOFF_SECS)).await;
                    continue;
                }
            };

            for raw in updates {
                // Advance offset past this update even if it does not parse
                let raw_id = raw.get("update_id").and_then(Value::as_i64);
                let update: Update = match serde_json::from_value(raw) {
                    Ok(update) => update,
                    Err(e) => {
                        tracing::warn!("Telegram: skipping unreadable update: {e}");
                        if let Some(id) = raw_id {
                            offset = offset.max(id + 1);
                        }
                        continue;
                    }
                };
                offset = offset.max(update.update_id + 1);

                let Some(event) = update.into_event() else {
                    continue;
                };

                if tx.send(event).await.is_err() {
                    return Ok(());
                }
            }
        }
    }
}

impl NotificationChannel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn send_text<'a>(
        &'a self,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>> {
        Box::pin(self.post_message(&self.chat_id, text, format))
    }

    fn send_poll<'a>(
        &'a self,
        question: &'a str,
        options: &'a [&'a str],
    ) -> ChannelFuture<'a, Result<PollHandle, DeliveryError>> {
        Box::pin(self.post_poll(question, options))
    }

    fn reply<'a>(
        &'a self,
        chat_id: &'a str,
        text: &'a str,
        format: TextFormat,
    ) -> ChannelFuture<'a, Result<(), DeliveryError>> {
        Box::pin(self.post_message(chat_id, text, format))
    }

    fn listen<'a>(
        &'a self,
        tx: tokio::sync::mpsc::Sender<ChannelEvent>,
    ) -> ChannelFuture<'a, anyhow::Result<()>> {
        Box::pin(self.poll_updates(tx))
    }

    fn health_check<'a>(&'a self) -> ChannelFuture<'a, bool> {
        Box::pin(async move {
            self.client
                .get(self.api_url("getMe"))
                .send()
                .await
                .map(|r| r.status().is_success())
                .unwrap_or(false)
        })
    }
}
