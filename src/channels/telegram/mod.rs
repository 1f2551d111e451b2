//! Telegram Bot API adapter for webhook delivery.

use super::traits::{ChannelAdapter, InboundMessage};
use crate::error::ChannelError;
use crate::utils::text::chunk_message_utf16;
use anyhow::Context;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use subtle::ConstantTimeEq;

#[cfg(test)]
mod tests;

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
/// `sendMessage` text limit, in UTF-16 code units.
const MAX_TEXT_CHARS: usize = 4096;

/// Bot commands the webhook answers itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Other(String),
}

impl BotCommand {
    /// Parse `/name` or `/name@botname`, ignoring arguments.
    fn parse(text: &str) -> Option<Self> {
        let command = text.strip_prefix('/')?.split_whitespace().next()?;
        let name = command.split('@').next().unwrap_or(command);
        Some(match name.to_ascii_lowercase().as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            other => Self::Other(other.to_string()),
        })
    }
}

/// Decoded webhook update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TelegramUpdate {
    Command { chat_id: String, command: BotCommand },
    Message(InboundMessage),
}

pub struct TelegramChannel {
    bot_token: String,
    api_base: String,
    client: reqwest::Client,
}

impl TelegramChannel {
    pub fn new(bot_token: String) -> Self {
        Self {
            bot_token,
            api_base: TELEGRAM_API_BASE.to_string(),
            client: reqwest::Client::new(),
        }
    }

    #[must_use]
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.bot_token)
    }

    /// Constant-time check of the secret path segment against the bot token.
    pub fn token_matches(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && bool::from(candidate.as_bytes().ct_eq(self.bot_token.as_bytes()))
    }

    /// Public webhook address for a deployment base URL.
    pub fn webhook_url(&self, base_url: &str) -> String {
        format!(
            "{}/webhook/{}",
            base_url.trim_end_matches('/'),
            self.bot_token
        )
    }

    /// Decode a webhook update. Returns `None` for anything that is not a
    /// text message from a user.
    pub fn parse_update(&self, update: &Value) -> Option<TelegramUpdate> {
        let message = update.get("message")?;
        let text = message.get("text").and_then(Value::as_str)?;
        let chat_id = message
            .get("chat")
            .and_then(|chat| chat.get("id"))
            .and_then(value_to_id)?;

        if text.starts_with('/') {
            let command = BotCommand::parse(text)?;
            return Some(TelegramUpdate::Command { chat_id, command });
        }

        let user_id = message
            .get("from")
            .and_then(|from| from.get("id"))
            .and_then(value_to_id)
            .unwrap_or_else(|| "unknown".to_string());

        Some(TelegramUpdate::Message(InboundMessage {
            user_id,
            text: text.to_string(),
            reply_handle: chat_id,
            event_id: update.get("update_id").and_then(value_to_id),
        }))
    }

    async fn send_text(&self, chat_id: &str, text: &str) -> anyhow::Result<()> {
        for chunk in chunk_message_utf16(text, MAX_TEXT_CHARS) {
            let body = serde_json::json!({"chat_id": chat_id, "text": chunk});
            let response = self
                .client
                .post(self.api_url("sendMessage"))
                .json(&body)
                .send()
                .await
                .context("Telegram sendMessage request failed")?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(ChannelError::Send {
                    channel: "telegram".into(),
                    message: format!("{status}: {detail}"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Register `{base_url}/webhook/{token}` with Telegram. Returns the URL.
    pub async fn set_webhook(&self, base_url: &str) -> anyhow::Result<String> {
        let parsed = url::Url::parse(base_url)
            .with_context(|| format!("invalid webhook base URL {base_url}"))?;
        if parsed.scheme() != "https" {
            return Err(ChannelError::Gateway(format!(
                "Telegram webhooks require https, got {}",
                parsed.scheme()
            ))
            .into());
        }

        let url = self.webhook_url(base_url);
        let response = self
            .client
            .post(self.api_url("setWebhook"))
            .json(&serde_json::json!({"url": url}))
            .send()
            .await
            .context("Telegram setWebhook request failed")?;

        let body: Value = response
            .json()
            .await
            .context("Telegram setWebhook response JSON decode failed")?;
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let description = body
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ChannelError::Gateway(format!("setWebhook rejected: {description}")).into());
        }

        tracing::info!("Telegram webhook registered");
        Ok(url)
    }
}

fn value_to_id(value: &Value) -> Option<String> {
    value
        .as_i64()
        .map(|id| id.to_string())
        .or_else(|| value.as_str().map(ToString::to_string))
}

impl ChannelAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn max_message_length(&self) -> usize {
        MAX_TEXT_CHARS
    }

    fn reply<'a>(
        &'a self,
        reply_handle: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>> {
        Box::pin(self.send_text(reply_handle, text))
    }
}
