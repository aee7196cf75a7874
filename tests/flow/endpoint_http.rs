use qcdt_monitor::endpoint::{HttpPriceEndpoint, PriceEndpoint};
use qcdt_monitor::error::FetchError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn endpoint_with(response: ResponseTemplate) -> (MockServer, HttpPriceEndpoint) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/qcdt/new_price"))
        .respond_with(response)
        .mount(&server)
        .await;
    let endpoint = HttpPriceEndpoint::new(format!("{}/qcdt/new_price", server.uri()), 1);
    (server, endpoint)
}

#[tokio::test]
async fn fetch_returns_payload_with_marker() {
    let (_server, endpoint) = endpoint_with(ResponseTemplate::new(200).set_body_json(json!({
        "code": 0,
        "data": {
            "update_time": "2025-06-10 15:01:00",
            "price_date": "2025-06-10",
            "price": 1.0023
        }
    })))
    .await;

    let payload = endpoint.fetch().await.unwrap();
    assert_eq!(payload.update_marker(), "2025-06-10 15:01:00");
    assert_eq!(payload.price(), "1.0023");
    assert_eq!(payload.raw()["code"], 0);
}

#[tokio::test]
async fn non_success_status_keeps_truncated_body() {
    let long_body = "x".repeat(1_000);
    let (_server, endpoint) =
        endpoint_with(ResponseTemplate::new(502).set_body_string(long_body)).await;

    match endpoint.fetch().await.unwrap_err() {
        FetchError::Status { status, body } => {
            assert_eq!(status, 502);
            assert!(body.chars().count() <= 301);
            assert!(body.ends_with('…'));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (_server, endpoint) =
        endpoint_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;
    assert!(matches!(
        endpoint.fetch().await.unwrap_err(),
        FetchError::Malformed(_)
    ));
}

#[tokio::test]
async fn missing_update_marker_is_malformed() {
    let (_server, endpoint) = endpoint_with(
        ResponseTemplate::new(200).set_body_json(json!({"data": {"price": "1.0"}})),
    )
    .await;
    match endpoint.fetch().await.unwrap_err() {
        FetchError::Malformed(msg) => assert!(msg.contains("update_time")),
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let (_server, endpoint) = endpoint_with(
        ResponseTemplate::new(200)
            .set_body_json(json!({"data": {"update_time": "2025-06-10 15:01:00"}}))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let err = endpoint.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(1)), "got {err:?}");
    assert_eq!(err.to_string(), "request timed out after 1s");
}
