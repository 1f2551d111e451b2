use super::{ConversationStore, InMemoryStore, SqliteConversationStore, SupabaseStore};
use crate::config::Config;
use crate::error::StoreError;
use anyhow::Context;
use std::sync::Arc;

/// Build the conversation store selected by `[store].backend`.
pub async fn create_store(config: &Config) -> anyhow::Result<Arc<dyn ConversationStore>> {
    let store: Arc<dyn ConversationStore> = match config.store.backend.as_str() {
        "memory" => Arc::new(InMemoryStore::new()),
        "sqlite" => {
            let path = config.sqlite_path();
            let store = SqliteConversationStore::open(&path)
                .await
                .with_context(|| format!("open SQLite store at {}", path.display()))?;
            Arc::new(store)
        }
        "supabase" => match SupabaseStore::from_config(&config.store.supabase) {
            Some(store) => Arc::new(store),
            None => {
                tracing::warn!(
                    "Supabase URL or key not set. Using in-memory storage; conversations will not survive a restart."
                );
                Arc::new(InMemoryStore::new())
            }
        },
        other => {
            return Err(StoreError::BackendUnavailable(format!(
                "unknown store backend '{other}'; supported: memory, sqlite, supabase"
            ))
            .into());
        }
    };

    tracing::info!(backend = store.name(), "conversation store ready");
    Ok(store)
}
