//! Axum HTTP gateway for platform webhooks.
//!
//! Routes:
//! - `GET  /healthz` liveness plus store health
//! - `POST /webhook` LINE Messaging API events
//! - `POST /webhook/{token}` Telegram updates
//! - `POST /feedback` feedback records, guarded by `X-Webhook-Secret`
//!
//! Every route sits behind a 64KB body limit and a 30s request timeout.
//! Webhooks are acknowledged once the payload is verified; replies are
//! produced on a spawned task.

mod handlers;
mod replay_guard;
mod server;

pub use replay_guard::ReplayGuard;
pub use server::{build_app, build_gateway_state, run_gateway, run_gateway_with_listener};

use crate::agent::MessagePipeline;
use crate::channels::{LineChannel, TelegramChannel};
use std::sync::Arc;

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Header carrying the shared secret for `/feedback`
pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<MessagePipeline>,
    pub line: Option<Arc<LineChannel>>,
    pub telegram: Option<Arc<TelegramChannel>>,
    pub webhook_secret: Option<Arc<str>>,
    pub replay_guard: Arc<ReplayGuard>,
    /// Locale for LINE fallback replies
    pub line_locale: Arc<str>,
    /// Locale for Telegram `/start`, `/help` and fallback replies
    pub telegram_locale: Arc<str>,
}

impl AppState {
    /// State with no channels and no secret; channels are attached by the
    /// caller.
    pub fn new(pipeline: Arc<MessagePipeline>, locale: &str) -> Self {
        Self {
            pipeline,
            line: None,
            telegram: None,
            webhook_secret: None,
            replay_guard: Arc::new(ReplayGuard::new()),
            line_locale: Arc::from(locale),
            telegram_locale: Arc::from(locale),
        }
    }
}

/// `/feedback` request body
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct FeedbackBody {
    pub user_id: String,
    pub message_id: String,
    pub feedback: serde_json::Value,
}
