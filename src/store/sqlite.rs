use super::traits::{ConversationStore, Feedback};
use crate::agent::{ConversationState, ConversationTurn, IntentKind};
use crate::error::StoreError;
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use uuid::Uuid;

/// SQLite-backed conversation store using a sqlx async pool.
pub struct SqliteConversationStore {
    pool: SqlitePool,
}

impl SqliteConversationStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| {
                    format!("Failed to create store directory: {}", parent.display())
                })?;
        }

        let url = format!("sqlite://{}?mode=rwc", path.display());
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&url)
            .await
            .with_context(|| format!("Failed to open conversation DB: {}", path.display()))?;

        Self::new(pool).await
    }

    /// Create a store on an existing pool and ensure the schema exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS conversations (
                 user_id     TEXT PRIMARY KEY,
                 context     TEXT NOT NULL DEFAULT '[]',
                 last_intent TEXT,
                 updated_at  TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .context("create conversations table")?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS feedback (
                 id         TEXT PRIMARY KEY,
                 user_id    TEXT NOT NULL,
                 message_id TEXT NOT NULL,
                 feedback   TEXT NOT NULL,
                 created_at TEXT NOT NULL
             )",
        )
        .execute(&pool)
        .await
        .context("create feedback table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_feedback_user ON feedback(user_id, created_at)")
            .execute(&pool)
            .await
            .context("create feedback index")?;

        Ok(Self { pool })
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load(&self, user_id: &str) -> Result<Option<ConversationState>, StoreError> {
        let row = sqlx::query("SELECT context, last_intent FROM conversations WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let corrupt = |message: String| StoreError::Corrupt {
            user_id: user_id.to_string(),
            message,
        };
        let context_raw: String = row.try_get("context").map_err(|e| corrupt(e.to_string()))?;
        let intent_raw: Option<String> =
            row.try_get("last_intent").map_err(|e| corrupt(e.to_string()))?;

        let context: Vec<ConversationTurn> =
            serde_json::from_str(&context_raw).map_err(|e| corrupt(e.to_string()))?;
        let last_intent = intent_raw
            .map(|raw| raw.parse::<IntentKind>())
            .transpose()
            .map_err(|e| corrupt(e.to_string()))?;

        Ok(Some(ConversationState {
            user_id: user_id.to_string(),
            context,
            last_intent,
        }))
    }

    async fn save(&self, user_id: &str, state: &ConversationState) -> Result<()> {
        let context = serde_json::to_string(&state.context).context("serialize context")?;
        let last_intent = state.last_intent.map(|kind| kind.to_string());

        sqlx::query(
            "INSERT INTO conversations (user_id, context, last_intent, updated_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT(user_id) DO UPDATE SET
                 context = excluded.context,
                 last_intent = excluded.last_intent,
                 updated_at = excluded.updated_at",
        )
        .bind(user_id)
        .bind(context)
        .bind(last_intent)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("upsert conversation")?;

        Ok(())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<()> {
        sqlx::query(
            "INSERT INTO feedback (id, user_id, message_id, feedback, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&feedback.user_id)
        .bind(&feedback.message_id)
        .bind(feedback.feedback.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("insert feedback")?;
        Ok(())
    }
}

impl ConversationStore for SqliteConversationStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ConversationState> + Send + 'a>> {
        Box::pin(async move {
            match self.load(user_id).await {
                Ok(Some(state)) => state,
                Ok(None) => ConversationState::empty(user_id),
                Err(error) => {
                    tracing::error!(user_id, error = %error, "failed to load conversation");
                    ConversationState::empty(user_id)
                }
            }
        })
    }

    fn put<'a>(
        &'a self,
        user_id: &'a str,
        state: &'a ConversationState,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match self.save(user_id, state).await {
                Ok(()) => true,
                Err(error) => {
                    tracing::error!(
                        user_id,
                        error = %format!("{error:#}"),
                        "failed to save conversation"
                    );
                    false
                }
            }
        })
    }

    fn store_feedback<'a>(
        &'a self,
        feedback: &'a Feedback,
    ) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            match self.insert_feedback(feedback).await {
                Ok(()) => true,
                Err(error) => {
                    tracing::error!(
                        user_id = %feedback.user_id,
                        error = %format!("{error:#}"),
                        "failed to store feedback"
                    );
                    false
                }
            }
        })
    }

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .is_ok()
        })
    }
}
