use crate::agent::ConversationState;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// User feedback on a bot reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub user_id: String,
    pub message_id: String,
    pub feedback: serde_json::Value,
}

/// Persistence for per-user conversation state.
///
/// Operations never fail outward: reads degrade to an empty state and
/// writes report success as a `bool`. Backends log the underlying error.
pub trait ConversationStore: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Stored state for `user_id`, or an empty state when absent or unreadable.
    fn get<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ConversationState> + Send + 'a>>;

    /// Upsert the state for `user_id`.
    fn put<'a>(
        &'a self,
        user_id: &'a str,
        state: &'a ConversationState,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

    fn store_feedback<'a>(
        &'a self,
        feedback: &'a Feedback,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move { true })
    }
}
