use super::support::{FEEDBACK_SECRET, GatewayTestServer};
use reqwest::StatusCode;
use serde_json::{Value, json};

fn feedback_payload() -> Value {
    json!({"user_id": "U1", "message_id": "m-1", "feedback": {"rating": "good"}})
}

#[tokio::test]
async fn feedback_disabled_without_secret() {
    let server = GatewayTestServer::start(None).await;
    let response = reqwest::Client::new()
        .post(server.url("/feedback"))
        .json(&feedback_payload())
        .send()
        .await
        .expect("feedback request should complete");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feedback_requires_matching_secret() {
    let server = GatewayTestServer::start(Some(FEEDBACK_SECRET)).await;
    let client = reqwest::Client::new();

    let wrong = client
        .post(server.url("/feedback"))
        .header("X-Webhook-Secret", "wrong")
        .json(&feedback_payload())
        .send()
        .await
        .expect("feedback request should complete");
    assert_eq!(wrong.status(), StatusCode::FORBIDDEN);

    let stored = client
        .post(server.url("/feedback"))
        .header("X-Webhook-Secret", FEEDBACK_SECRET)
        .json(&feedback_payload())
        .send()
        .await
        .expect("feedback request should complete");
    assert_eq!(stored.status(), StatusCode::OK);
    let body: Value = stored.json().await.expect("feedback body should be json");
    assert_eq!(body["stored"], true);
}

#[tokio::test]
async fn feedback_rejects_malformed_body() {
    let server = GatewayTestServer::start(Some(FEEDBACK_SECRET)).await;
    let response = reqwest::Client::new()
        .post(server.url("/feedback"))
        .header("X-Webhook-Secret", FEEDBACK_SECRET)
        .json(&json!({"user_id": "U1"}))
        .send()
        .await
        .expect("feedback request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
