use super::support::{BOT_TOKEN, GatewayTestServer, LINE_SECRET};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use serde_json::{Value, json};
use sha2::Sha256;

fn line_signature(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(LINE_SECRET.as_bytes())
        .expect("hmac accepts any key length");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

#[tokio::test]
async fn healthz_reports_ok_and_store() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::get(server.url("/healthz"))
        .await
        .expect("health request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.expect("health body should be json");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "sqlite");
    assert_eq!(body["store_healthy"], true);
}

#[tokio::test]
async fn line_webhook_rejects_invalid_signature() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::Client::new()
        .post(server.url("/webhook"))
        .header("X-Line-Signature", "AAAA")
        .body(r#"{"events":[]}"#)
        .send()
        .await
        .expect("webhook request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("error body should be json");
    assert_eq!(body["detail"], "Invalid signature");
}

#[tokio::test]
async fn line_webhook_acknowledges_signed_non_text_events() {
    let server = GatewayTestServer::start(None).await;
    let body = serde_json::to_vec(&json!({
        "destination": "U0",
        "events": [{
            "type": "message",
            "replyToken": "token",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "sticker", "packageId": "1", "stickerId": "1"}
        }]
    }))
    .expect("payload should serialize");

    let response = reqwest::Client::new()
        .post(server.url("/webhook"))
        .header("X-Line-Signature", line_signature(&body))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("webhook request should complete");
    assert_eq!(response.status(), StatusCode::OK);

    let ack: Value = response.json().await.expect("ack should be json");
    assert_eq!(ack["status"], "ok");
}

#[tokio::test]
async fn telegram_webhook_wrong_token_is_not_found() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::Client::new()
        .post(server.url("/webhook/not-the-token"))
        .json(&json!({"message": {"text": "hi", "chat": {"id": 1}}}))
        .send()
        .await
        .expect("telegram request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn telegram_webhook_ignores_unknown_command() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::Client::new()
        .post(server.url(&format!("/webhook/{BOT_TOKEN}")))
        .json(&json!({"message": {"text": "/settings", "chat": {"id": 1}, "from": {"id": 2}}}))
        .send()
        .await
        .expect("telegram request should complete");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::Client::new()
        .post(server.url("/webhook"))
        .header("X-Line-Signature", "AAAA")
        .body(vec![b'x'; 70_000])
        .send()
        .await
        .expect("oversized request should complete");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
