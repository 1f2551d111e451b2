//! LINE Messaging API adapter.

use super::traits::{ChannelAdapter, InboundMessage};
use crate::error::ChannelError;
use crate::utils::text::chunk_message;
use anyhow::Context;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use std::future::Future;
use std::pin::Pin;


pub const SIGNATURE_HEADER: &str = "X-Line-Signature";
const LINE_API_BASE: &str = "https://api.line.me";
/// Text message limit of the Messaging API.
const MAX_TEXT_CHARS: usize = 5000;
/// A reply request may carry at most five messages.
const MAX_MESSAGES_PER_REPLY: usize = 5;

pub struct LineChannel {
    channel_secret: String,
    access_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl LineChannel {
    pub fn new(channel_secret: String, access_token: String) -> Self {
        Self {
            channel_secret,
            access_token,
            api_base: LINE_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn reply_url(&self) -> String {
        format!("{}/v2/bot/message/reply", self.api_base)
    }

    /// Check `X-Line-Signature`: base64 of HMAC-SHA256 over the raw body,
    /// keyed with the channel secret. Comparison is constant-time.
    pub fn verify_signature(&self, body: &[u8], signature: &str) -> bool {
        let signature = signature.trim();
        if signature.is_empty() {
            return false;
        }
        let Ok(expected) = STANDARD.decode(signature) else {
            return false;
        };
        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(self.channel_secret.as_bytes()) else {
            return false;
        };
        mac.update(body);
        mac.verify_slice(&expected).is_ok()
    }

    /// Extract text messages from a webhook body. Other event and message
    /// types are skipped. The event id is `webhookEventId`, or the message id
    /// for payloads without one.
    pub fn parse_webhook_payload(&self, payload: &Value) -> Vec<InboundMessage> {
        let Some(events) = payload.get("events").and_then(Value::as_array) else {
            return Vec::new();
        };

        events
            .iter()
            .filter_map(|event| {
                if event.get("type").and_then(Value::as_str) != Some("message") {
                    return None;
                }
                let message = event.get("message")?;
                if message.get("type").and_then(Value::as_str) != Some("text") {
                    return None;
                }
                let text = message.get("text").and_then(Value::as_str)?;
                let Some(reply_token) = event.get("replyToken").and_then(Value::as_str) else {
                    tracing::debug!("LINE text event without reply token skipped");
                    return None;
                };
                let user_id = event
                    .get("source")
                    .and_then(|source| source.get("userId"))
                    .and_then(Value::as_str)
                    .unwrap_or("unknown");

                let event_id = event
                    .get("webhookEventId")
                    .or_else(|| message.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string);

                Some(InboundMessage {
                    user_id: user_id.to_string(),
                    text: text.to_string(),
                    reply_handle: reply_token.to_string(),
                    event_id,
                })
            })
            .collect()
    }

    fn build_reply_body(reply_token: &str, text: &str) -> Value {
        let mut chunks = chunk_message(text, MAX_TEXT_CHARS);
        if chunks.len() > MAX_MESSAGES_PER_REPLY {
            tracing::warn!(
                chunks = chunks.len(),
                "LINE reply exceeds message limit; extra parts dropped"
            );
            chunks.truncate(MAX_MESSAGES_PER_REPLY);
        }
        let messages: Vec<Value> = chunks
            .into_iter()
            .map(|chunk| serde_json::json!({"type": "text", "text": chunk}))
            .collect();
        serde_json::json!({"replyToken": reply_token, "messages": messages})
    }

    async fn send_reply(&self, reply_token: &str, text: &str) -> anyhow::Result<()> {
        let body = Self::build_reply_body(reply_token, text);
        let response = self
            .client
            .post(self.reply_url())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .context("LINE reply request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ChannelError::Send {
                channel: "line".into(),
                message: format!("{status}: {detail}"),
            }
            .into());
        }
        Ok(())
    }
}

impl ChannelAdapter for LineChannel {
    fn name(&self) -> &str {
        "line"
    }

    fn max_message_length(&self) -> usize {
        MAX_TEXT_CHARS
    }

    fn reply<'a>(
        &'a self,
        reply_handle: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(self.send_reply(reply_handle, text))
    }
}
