use super::{AppState, FeedbackBody, WEBHOOK_SECRET_HEADER};
use crate::channels::line::SIGNATURE_HEADER;
use crate::channels::{BotCommand, ChannelAdapter, InboundMessage, TelegramUpdate};
use crate::store::Feedback;
use crate::utils::text::truncate_with_ellipsis;
use axum::{
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::{Value, json};
use std::sync::Arc;
use subtle::ConstantTimeEq;

type JsonResponse = (StatusCode, Json<Value>);

fn ack_response() -> JsonResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

fn detail_response(status: StatusCode, detail: &str) -> JsonResponse {
    (status, Json(json!({"detail": detail})))
}

fn secret_matches(candidate: &str, secret: &str) -> bool {
    !candidate.is_empty() && bool::from(candidate.as_bytes().ct_eq(secret.as_bytes()))
}

/// Empty pipeline replies are replaced so the user always gets an answer.
fn reply_or_fallback(reply: String, locale: &str) -> String {
    if reply.trim().is_empty() {
        t!("channel.fallback", locale = locale).to_string()
    } else {
        reply
    }
}

async fn reply_or_log(channel: &dyn ChannelAdapter, reply_handle: &str, text: &str) {
    if let Err(error) = channel.reply(reply_handle, text).await {
        tracing::error!(channel = channel.name(), error = %error, "failed to send reply");
    }
}

/// `false` when the event id was already seen; events without an id pass.
fn first_delivery(state: &AppState, channel: &str, message: &InboundMessage) -> bool {
    let Some(event_id) = message.event_id.as_deref() else {
        return true;
    };
    let fresh = state
        .replay_guard
        .check_and_record(&format!("{channel}:{event_id}"));
    if !fresh {
        tracing::info!(channel, event_id, "redelivered event ignored");
    }
    fresh
}

/// Run the pipeline and send replies on a separate task, so the webhook is
/// acknowledged before any tool call starts. Messages are handled in order.
fn spawn_replies(
    state: &AppState,
    channel: Arc<dyn ChannelAdapter>,
    messages: Vec<InboundMessage>,
    locale: Arc<str>,
) {
    if messages.is_empty() {
        return;
    }
    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        for message in messages {
            tracing::info!(
                channel = channel.name(),
                user_id = %message.user_id,
                text = %truncate_with_ellipsis(&message.text, 50),
                "inbound message"
            );
            let reply = pipeline.handle(&message.user_id, &message.text).await;
            let reply = reply_or_fallback(reply, &locale);
            reply_or_log(channel.as_ref(), &message.reply_handle, &reply).await;
        }
    });
}

/// GET /healthz
pub(super) async fn handle_health(State(state): State<AppState>) -> JsonResponse {
    let store = state.pipeline.store();
    let store_healthy = store.health_check().await;
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "store": store.name(),
            "store_healthy": store_healthy,
        })),
    )
}

/// POST /webhook (LINE)
pub(super) async fn handle_line_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> JsonResponse {
    let Some(line) = state.line.clone() else {
        return detail_response(StatusCode::NOT_FOUND, "LINE channel not configured");
    };

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !line.verify_signature(&body, signature) {
        tracing::warn!("LINE webhook rejected: invalid signature");
        return detail_response(StatusCode::BAD_REQUEST, "Invalid signature");
    }

    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        return detail_response(StatusCode::BAD_REQUEST, "Invalid JSON payload");
    };

    let messages: Vec<InboundMessage> = line
        .parse_webhook_payload(&payload)
        .into_iter()
        .filter(|message| first_delivery(&state, "line", message))
        .collect();
    let locale = Arc::clone(&state.line_locale);
    spawn_replies(&state, line, messages, locale);

    ack_response()
}

/// POST /webhook/{token} (Telegram)
pub(super) async fn handle_telegram_webhook(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> JsonResponse {
    let Some(telegram) = state
        .telegram
        .clone()
        .filter(|telegram| telegram.token_matches(&token))
    else {
        return detail_response(StatusCode::NOT_FOUND, "Not found");
    };

    let Json(update) = match body {
        Ok(update) => update,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Telegram webhook JSON parse failed");
            return detail_response(StatusCode::BAD_REQUEST, "Invalid JSON payload");
        }
    };

    let locale = Arc::clone(&state.telegram_locale);
    let parsed = telegram.parse_update(&update);
    match parsed {
        Some(TelegramUpdate::Command { chat_id, command }) => {
            let text = match command {
                BotCommand::Start => t!("channel.start", locale = &*locale).to_string(),
                BotCommand::Help => t!("channel.help", locale = &*locale).to_string(),
                BotCommand::Other(name) => {
                    tracing::debug!(command = %name, "ignoring unknown Telegram command");
                    return ack_response();
                }
            };
            tokio::spawn(async move {
                reply_or_log(telegram.as_ref(), &chat_id, &text).await;
            });
        }
        Some(TelegramUpdate::Message(message)) => {
            if first_delivery(&state, "telegram", &message) {
                spawn_replies(&state, telegram, vec![message], locale);
            }
        }
        None => tracing::debug!("Telegram update without text message ignored"),
    }

    ack_response()
}

/// POST /feedback
pub(super) async fn handle_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<FeedbackBody>, JsonRejection>,
) -> JsonResponse {
    let Some(secret) = state.webhook_secret.as_deref() else {
        tracing::warn!("feedback rejected: no webhook secret configured");
        return detail_response(StatusCode::FORBIDDEN, "Feedback endpoint disabled");
    };
    let provided = headers
        .get(WEBHOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !secret_matches(provided, secret) {
        tracing::warn!("feedback rejected: missing or invalid X-Webhook-Secret");
        return detail_response(StatusCode::FORBIDDEN, "Forbidden");
    }

    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "feedback JSON parse failed");
            return detail_response(
                StatusCode::BAD_REQUEST,
                "Invalid JSON body. Expected: {\"user_id\": \"...\", \"message_id\": \"...\", \"feedback\": {...}}",
            );
        }
    };

    let feedback = Feedback {
        user_id: body.user_id,
        message_id: body.message_id,
        feedback: body.feedback,
    };
    if state.pipeline.store().store_feedback(&feedback).await {
        (StatusCode::OK, Json(json!({"stored": true})))
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"stored": false})),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_compare_rejects_mismatch_and_empty() {
        assert!(secret_matches("s3cret", "s3cret"));
        assert!(!secret_matches("s3cre", "s3cret"));
        assert!(!secret_matches("", "s3cret"));
    }

    #[test]
    fn blank_reply_uses_fallback_text() {
        assert_eq!(reply_or_fallback("hi".into(), "en"), "hi");
        assert_eq!(
            reply_or_fallback("  ".into(), "en"),
            t!("channel.fallback", locale = "en").to_string()
        );
    }
}
