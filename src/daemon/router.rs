use crate::channels::{ChannelEvent, NotificationChannel};
use crate::monitor::Monitor;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Drain channel events into the monitor until every sender is gone.
pub(super) async fn route_events(
    monitor: Arc<Monitor>,
    channel: Arc<dyn NotificationChannel>,
    mut rx: mpsc::Receiver<ChannelEvent>,
) {
    while let Some(event) = rx.recv().await {
        handle_event(&monitor, channel.as_ref(), event).await;
    }
    tracing::info!("event stream closed; router stopped");
}

pub(super) async fn handle_event(
    monitor: &Monitor,
    channel: &dyn NotificationChannel,
    event: ChannelEvent,
) {
    match event {
        ChannelEvent::PollAnswer(answer) => {
            let outcome = monitor.handle_poll_answer(&answer).await;
            tracing::debug!(poll_id = %answer.poll_id, ?outcome, "poll answer handled");
        }
        ChannelEvent::Command {
            name,
            chat_id,
            sender,
        } => match name.as_str() {
            "status" => {
                tracing::info!(
                    %chat_id,
                    sender = sender.as_deref().unwrap_or("unknown"),
                    "/status requested"
                );
                let (text, format) = monitor.status_report().await;
                if let Err(e) = channel.reply(&chat_id, &text, format).await {
                    tracing::error!("{} /status reply failed: {e}", channel.name());
                }
            }
            other => tracing::debug!(command = other, "ignoring unknown command"),
        },
    }
}
