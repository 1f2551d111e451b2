//! Supabase backend over the PostgREST HTTP interface.

use super::traits::{ConversationStore, Feedback};
use crate::agent::{ConversationState, ConversationTurn, IntentKind};
use crate::config::SupabaseConfig;
use crate::error::StoreError;
use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Rows written by older deployments carry `intent`, either a kind string or
/// the whole intent object with a `type` field.
#[derive(Debug, Deserialize)]
struct ConversationRow {
    #[serde(default)]
    context: Option<Vec<ConversationTurn>>,
    #[serde(default)]
    last_intent: Option<Value>,
    #[serde(default)]
    intent: Option<Value>,
}

impl ConversationRow {
    fn intent_kind(&self) -> Option<IntentKind> {
        self.last_intent
            .as_ref()
            .and_then(kind_from_value)
            .or_else(|| self.intent.as_ref().and_then(kind_from_value))
    }
}

fn kind_from_value(value: &Value) -> Option<IntentKind> {
    let name = match value {
        Value::String(name) => name.as_str(),
        Value::Object(fields) => fields.get("type")?.as_str()?,
        _ => return None,
    };
    name.parse().ok()
}

#[derive(Debug, Serialize)]
struct ConversationUpsert<'a> {
    user_id: &'a str,
    context: &'a [ConversationTurn],
    last_intent: Option<IntentKind>,
    updated_at: String,
}

pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    conversations_table: String,
    feedback_table: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            conversations_table: "conversations".into(),
            feedback_table: "feedback".into(),
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    /// `None` unless both URL and key are set.
    pub fn from_config(config: &SupabaseConfig) -> Option<Self> {
        let url = config.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
        let key = config.key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let mut store = Self::new(url, key);
        store.conversations_table.clone_from(&config.conversations_table);
        store.feedback_table.clone_from(&config.feedback_table);
        Some(store)
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn fetch(&self, user_id: &str) -> Result<Option<ConversationState>> {
        let request = self
            .client
            .get(self.table_url(&self.conversations_table))
            .query(&[("user_id", format!("eq.{user_id}")), ("select", "*".into())]);
        let response = self
            .authorized(request)
            .send()
            .await
            .context("Supabase select failed")?;
        if !response.status().is_success() {
            return Err(StoreError::Query(format!(
                "Supabase select returned {}",
                response.status()
            ))
            .into());
        }

        let rows: Vec<ConversationRow> = response
            .json()
            .await
            .context("Supabase select JSON decode failed")?;

        Ok(rows.into_iter().next().map(|row| {
            let last_intent = row.intent_kind();
            ConversationState {
                user_id: user_id.to_string(),
                context: row.context.unwrap_or_default(),
                last_intent,
            }
        }))
    }

    async fn upsert(&self, user_id: &str, state: &ConversationState) -> Result<()> {
        let body = ConversationUpsert {
            user_id,
            context: &state.context,
            last_intent: state.last_intent,
            updated_at: Utc::now().to_rfc3339(),
        };
        let request = self
            .client
            .post(self.table_url(&self.conversations_table))
            .query(&[("on_conflict", "user_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&body);
        let response = self
            .authorized(request)
            .send()
            .await
            .context("Supabase upsert failed")?;
        if !response.status().is_success() {
            return Err(StoreError::Query(format!(
                "Supabase upsert returned {}",
                response.status()
            ))
            .into());
        }
        Ok(())
    }

    async fn insert_feedback(&self, feedback: &Feedback) -> Result<()> {
        let request = self
            .client
            .post(self.table_url(&self.feedback_table))
            .header("Prefer", "return=minimal")
            .json(feedback);
        let response = self
            .authorized(request)
            .send()
            .await
            .context("Supabase feedback insert failed")?;
        if !response.status().is_success() {
            return Err(StoreError::Query(format!(
                "Supabase feedback insert returned {}",
                response.status()
            ))
            .into());
        }
        Ok(())
    }
}

impl ConversationStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    fn get<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ConversationState> + Send + 'a>> {
        Box::pin(async move {
            match self.fetch(user_id).await {
                Ok(Some(state)) => state,
                Ok(None) => ConversationState::empty(user_id),
                Err(error) => {
                    tracing::error!(
                        user_id,
                        error = %format!("{error:#}"),
                        "Supabase get failed"
                    );
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
            match self.upsert(user_id, state).await {
                Ok(()) => true,
                Err(error) => {
                    tracing::error!(
                        user_id,
                        error = %format!("{error:#}"),
                        "Supabase put failed"
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
                        "Supabase feedback failed"
                    );
                    false
                }
            }
        })
    }

    fn health_check<'a>(&'a self) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.table_url(&self.conversations_table))
                .query(&[("select", "user_id"), ("limit", "1")]);
            self.authorized(request)
                .send()
                .await
                .is_ok_and(|response| response.status().is_success())
        })
    }
}
