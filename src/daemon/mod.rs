use crate::channels::{NotificationChannel, TelegramChannel};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::endpoint::{HttpPriceEndpoint, PriceEndpoint};
use crate::holidays::NagerHolidayClient;
use crate::monitor::Monitor;
use crate::scheduler;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

mod router;
mod supervisor;

use supervisor::spawn_component_supervisor;

const EVENT_BUFFER: usize = 64;
const LISTENER_INITIAL_BACKOFF_SECS: u64 = 2;
const LISTENER_MAX_BACKOFF_SECS: u64 = 60;

/// Run until Ctrl+C: scheduled jobs, the Telegram listener and the event
/// router, all sharing one [`Monitor`].
pub async fn run(config: &Config) -> Result<()> {
    let token = config.require_bot_token()?.to_string();
    let monitor_settings = config
        .monitor_settings()
        .context("Invalid monitor settings")?;
    let schedule_settings = config
        .schedule_settings()
        .context("Invalid schedule settings")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(schedule_settings.timezone));

    let telegram = TelegramChannel::new(token, config.telegram.chat_id.to_string())
        .with_api_base(config.telegram.api_base.clone());
    if !telegram.health_check().await {
        tracing::warn!("Telegram getMe failed; continuing, sends may fail");
    }
    let channel: Arc<dyn NotificationChannel> = Arc::new(telegram);

    let endpoint: Arc<dyn PriceEndpoint> = Arc::new(HttpPriceEndpoint::new(
        config.endpoint.url.clone(),
        config.endpoint.timeout_secs,
    ));

    let mut monitor = Monitor::new(
        endpoint,
        Arc::clone(&channel),
        Arc::clone(&clock),
        monitor_settings,
    );
    if config.holidays.enabled {
        monitor = monitor.with_holidays(Arc::new(NagerHolidayClient::new(
            config.holidays.api_base.clone(),
        )));
    }
    let monitor = Arc::new(monitor);

    monitor.resume_after_restart().await;

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let mut handles: Vec<JoinHandle<()>> = scheduler::spawn(&monitor, &schedule_settings, &clock);

    let listen_channel = Arc::clone(&channel);
    handles.push(spawn_component_supervisor(
        "telegram-listener",
        LISTENER_INITIAL_BACKOFF_SECS,
        LISTENER_MAX_BACKOFF_SECS,
        0,
        move || {
            let channel = Arc::clone(&listen_channel);
            let tx = tx.clone();
            async move { channel.listen(tx).await }
        },
    ));
    handles.push(tokio::spawn(router::route_events(
        Arc::clone(&monitor),
        channel,
        rx,
    )));

    tracing::info!(
        chat_id = config.telegram.chat_id,
        endpoint = %config.endpoint.url,
        "monitor running; press Ctrl+C to stop"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown requested");

    for handle in &handles {
        handle.abort();
    }
    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
