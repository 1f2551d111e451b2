//! Store-backed message handling with per-user serialization.

use super::manager::AgentManager;
use crate::store::ConversationStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Idle lock entries are pruned once the map grows past this size.
const PRUNE_THRESHOLD: usize = 1024;

/// One async mutex per user id.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_for(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if locks.len() > PRUNE_THRESHOLD {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        Arc::clone(locks.entry(user_id.to_string()).or_default())
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MessagePipeline {
    agent: Arc<AgentManager>,
    store: Arc<dyn ConversationStore>,
    locks: UserLocks,
}

impl MessagePipeline {
    pub fn new(agent: Arc<AgentManager>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            agent,
            store,
            locks: UserLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Load, process and save one message for `user_id`, returning the reply.
    /// Messages from the same user are handled one at a time.
    pub async fn handle(&self, user_id: &str, text: &str) -> String {
        let lock = self.locks.lock_for(user_id);
        let _guard = lock.lock().await;

        let state = self.store.get(user_id).await;
        let response = self.agent.process_message(text, user_id, state).await;

        if !self.store.put(user_id, &response.state).await {
            tracing::warn!(
                user_id,
                store = self.store.name(),
                "conversation state not saved"
            );
        }

        response.reply
    }
}
