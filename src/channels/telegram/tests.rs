use super::*;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn channel() -> TelegramChannel {
    TelegramChannel::new("123:ABC".into())
}

fn text_update(text: &str) -> Value {
    serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "from": {"id": 42, "is_bot": false, "first_name": "Aki"},
            "chat": {"id": -100, "type": "private"},
            "text": text
        }
    })
}

#[test]
fn telegram_channel_name() {
    assert_eq!(channel().name(), "telegram");
    assert_eq!(channel().max_message_length(), 4096);
}

#[test]
fn telegram_api_url() {
    assert_eq!(
        channel().api_url("sendMessage"),
        "https://api.telegram.org/bot123:ABC/sendMessage"
    );
}

#[test]
fn telegram_webhook_url_appends_token() {
    assert_eq!(
        channel().webhook_url("https://bot.example.com/"),
        "https://bot.example.com/webhook/123:ABC"
    );
}

#[test]
fn telegram_token_match_is_exact() {
    let ch = channel();
    assert!(ch.token_matches("123:ABC"));
    assert!(!ch.token_matches("123:ABD"));
    assert!(!ch.token_matches("123:AB"));
    assert!(!ch.token_matches(""));
}

#[test]
fn telegram_parse_text_message() {
    let update = channel().parse_update(&text_update("Hello")).unwrap();
    assert_eq!(
        update,
        TelegramUpdate::Message(InboundMessage {
            user_id: "42".into(),
            text: "Hello".into(),
            reply_handle: "-100".into(),
            event_id: Some("1".into()),
        })
    );
}

#[test]
fn telegram_parse_commands() {
    let ch = channel();
    assert_eq!(
        ch.parse_update(&text_update("/start")),
        Some(TelegramUpdate::Command {
            chat_id: "-100".into(),
            command: BotCommand::Start
        })
    );
    assert_eq!(
        ch.parse_update(&text_update("/help@my_bot")),
        Some(TelegramUpdate::Command {
            chat_id: "-100".into(),
            command: BotCommand::Help
        })
    );
    assert_eq!(
        ch.parse_update(&text_update("/settings now")),
        Some(TelegramUpdate::Command {
            chat_id: "-100".into(),
            command: BotCommand::Other("settings".into())
        })
    );
}

#[test]
fn telegram_parse_ignores_non_text_updates() {
    let ch = channel();
    let photo = serde_json::json!({
        "update_id": 2,
        "message": {"message_id": 11, "chat": {"id": 1}, "photo": []}
    });
    assert!(ch.parse_update(&photo).is_none());
    assert!(
        ch.parse_update(&serde_json::json!({"update_id": 3, "callback_query": {}}))
            .is_none()
    );
    assert!(ch.parse_update(&text_update("/")).is_none());
}

#[tokio::test]
async fn telegram_reply_sends_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(2)
        .mount(&server)
        .await;

    let ch = channel().with_api_base(&server.uri());
    let text = "x".repeat(5000);
    ch.reply("-100", &text).await.unwrap();
}

#[tokio::test]
async fn telegram_reply_splits_emoji_by_utf16_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(2)
        .mount(&server)
        .await;

    let ch = channel().with_api_base(&server.uri());
    ch.reply("-100", &"🎉".repeat(3000)).await.unwrap();

    for request in server.received_requests().await.unwrap() {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        let text = body["text"].as_str().unwrap();
        assert!(text.encode_utf16().count() <= 4096);
    }
}

#[tokio::test]
async fn telegram_reply_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("bot was blocked"))
        .mount(&server)
        .await;

    let ch = channel().with_api_base(&server.uri());
    assert!(ch.reply("1", "hi").await.is_err());
}

#[tokio::test]
async fn telegram_set_webhook_registers_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot123:ABC/setWebhook"))
        .and(body_json(serde_json::json!({
            "url": "https://bot.example.com/webhook/123:ABC"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true, "result": true})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ch = channel().with_api_base(&server.uri());
    let url = ch.set_webhook("https://bot.example.com").await.unwrap();
    assert_eq!(url, "https://bot.example.com/webhook/123:ABC");
}

#[tokio::test]
async fn telegram_set_webhook_rejection_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "ok": false, "description": "Bad Request: bad webhook"
        })))
        .mount(&server)
        .await;

    let ch = channel().with_api_base(&server.uri());
    let err = ch.set_webhook("https://bot.example.com").await.unwrap_err();
    assert!(err.to_string().contains("bad webhook"));
}

#[tokio::test]
async fn telegram_set_webhook_requires_https() {
    let ch = channel().with_api_base("http://127.0.0.1:9");
    let err = ch.set_webhook("http://insecure.example.com").await.unwrap_err();
    assert!(err.to_string().contains("https"));

    assert!(ch.set_webhook("not a url").await.is_err());
}
