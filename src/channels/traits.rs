use std::future::Future;
use std::pin::Pin;

/// A text message decoded from a platform webhook.
///
/// `reply_handle` is whatever the platform needs to answer this message
/// (a LINE reply token, a Telegram chat id). `event_id` stays the same when
/// the platform redelivers the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub user_id: String,
    pub text: String,
    pub reply_handle: String,
    pub event_id: Option<String>,
}

/// Outbound side of a messaging platform.
pub trait ChannelAdapter: Send + Sync {
    /// Human-readable channel name
    fn name(&self) -> &str;

    /// Longest text a single platform message may carry
    fn max_message_length(&self) -> usize {
        usize::MAX
    }

    /// Answer an inbound message. Long texts are split by the adapter.
    fn reply<'a>(
        &'a self,
        reply_handle: &'a str,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;
}
