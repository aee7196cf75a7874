use chrono::{NaiveTime, TimeDelta};
use chrono_tz::Asia::Singapore;
use qcdt_monitor::channels::{PollAnswer, TelegramChannel};
use qcdt_monitor::clock::{ManualClock, TimeWindow};
use qcdt_monitor::config::MessagesConfig;
use qcdt_monitor::endpoint::HttpPriceEndpoint;
use qcdt_monitor::monitor::{
    AnnouncementChoice, AnswerOutcome, CheckOutcome, Monitor, MonitorSettings, NagOutcome,
};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

async fn mount_telegram(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {"message_id": 1}})),
        )
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendPoll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 2, "poll": {"id": "tg-poll-1"}}
        })))
        .mount(server)
        .await;
}

fn monitor_for(server: &MockServer, local: &str) -> Monitor {
    let channel = TelegramChannel::new("123:ABC".into(), "-5299275232".into())
        .with_api_base(server.uri());
    let endpoint = HttpPriceEndpoint::new(format!("{}/qcdt/new_price", server.uri()), 5);
    let clock = ManualClock::at_local(Singapore, local).unwrap();

    Monitor::new(
        Arc::new(endpoint),
        Arc::new(channel),
        Arc::new(clock),
        MonitorSettings {
            check_window: TimeWindow::new(hm(15, 0), hm(21, 0)),
            nag_window: TimeWindow::new(hm(17, 30), hm(21, 0)),
            error_cooldown: TimeDelta::minutes(60),
            messages: MessagesConfig::default(),
            holiday_countries: Vec::new(),
        },
    )
}

/// `(method, body)` of every Telegram call, in arrival order.
async fn telegram_calls(server: &MockServer) -> Vec<(String, Value)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path().starts_with("/bot"))
        .map(|r| {
            let method = r.url.path().rsplit('/').next().unwrap_or_default().to_string();
            let body = serde_json::from_slice(&r.body).unwrap_or(Value::Null);
            (method, body)
        })
        .collect()
}

#[tokio::test]
async fn detected_update_is_announced_and_acknowledged_over_http() {
    let server = MockServer::start().await;
    mount_telegram(&server).await;
    Mock::given(method("GET"))
        .and(path("/qcdt/new_price"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "update_time": "2025-06-10 15:01:00",
                "price_date": "2025-06-10",
                "price": "1.0023"
            }
        })))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server, "2025-06-10 15:02:00");

    assert_eq!(
        monitor.check().await,
        CheckOutcome::Announced { poll_opened: true }
    );
    let calls = telegram_calls(&server).await;
    let methods: Vec<&str> = calls.iter().map(|(m, _)| m.as_str()).collect();
    assert_eq!(methods, ["sendMessage", "sendMessage", "sendPoll"]);

    assert_eq!(calls[0].1["parse_mode"], "HTML");
    assert!(calls[0].1["text"].as_str().unwrap().starts_with("<pre>{"));
    assert_eq!(calls[2].1["is_anonymous"], false);
    assert_eq!(calls[2].1["options"].as_array().unwrap().len(), 3);

    let outcome = monitor
        .handle_poll_answer(&PollAnswer::new("tg-poll-1", vec![0]))
        .await;
    assert_eq!(
        outcome,
        AnswerOutcome::Announcement(AnnouncementChoice::Acknowledge)
    );

    let calls = telegram_calls(&server).await;
    let (last_method, last_body) = calls.last().unwrap();
    assert_eq!(last_method, "sendMessage");
    assert_eq!(last_body["chat_id"], "-5299275232");
    assert!(
        last_body["text"]
            .as_str()
            .unwrap()
            .starts_with("Updated today on 10 Jun 2025 for 10 Jun 2025 QCDT price.")
    );
    assert!(monitor.snapshot().await.monitoring_halted);
}

#[tokio::test]
async fn endpoint_outage_is_broadcast_once_per_cooldown() {
    let server = MockServer::start().await;
    mount_telegram(&server).await;
    Mock::given(method("GET"))
        .and(path("/qcdt/new_price"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let monitor = monitor_for(&server, "2025-06-10 15:00:00");
    assert_eq!(monitor.check().await, CheckOutcome::FetchFailed { alerted: true });
    assert_eq!(monitor.check().await, CheckOutcome::FetchFailed { alerted: false });

    let calls = telegram_calls(&server).await;
    assert_eq!(calls.len(), 1);
    let text = calls[0].1["text"].as_str().unwrap();
    assert!(text.starts_with("⚠️ QCDT monitor error:"));
    assert!(text.contains("endpoint returned 503: upstream down"));
}

#[tokio::test]
async fn nag_poll_is_sent_when_no_update_arrives() {
    let server = MockServer::start().await;
    mount_telegram(&server).await;

    let monitor = monitor_for(&server, "2025-06-10 17:30:00");
    assert_eq!(
        monitor.nag().await,
        NagOutcome::Opened {
            poll_id: "tg-poll-1".into(),
            superseded: None
        }
    );

    let calls = telegram_calls(&server).await;
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "sendPoll");
    assert_eq!(calls[0].1["question"], "⚠️ QCDT price not updated yet. Action?");
}
