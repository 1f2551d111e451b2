//! OpenAI Assistants API client (v2 beta).
//!
//! Questions are answered with a stateless "create thread and run" call:
//! the conversation context becomes the thread's messages, the run is polled
//! until it reaches a terminal status, and the newest thread message is the
//! reply. The management calls serve the `assistant` CLI subcommands.

use super::http::{api_error, build_client};
use super::traits::Assistant;
use crate::agent::{ConversationTurn, Role};
use crate::config::OpenAiConfig;
use crate::error::ToolError;
use anyhow::Context;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const REQUEST_TIMEOUT_SECS: u64 = 30;
const TERMINAL_STATUSES: &[&str] = &["completed", "failed", "cancelled", "expired"];

#[derive(Debug, Serialize)]
struct ThreadMessage<'a> {
    role: Role,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct NewThread<'a> {
    messages: Vec<ThreadMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct CreateThreadAndRun<'a> {
    assistant_id: &'a str,
    thread: NewThread<'a>,
}

#[derive(Debug, Serialize)]
struct CreateAssistant<'a> {
    name: &'a str,
    instructions: &'a str,
    model: &'a str,
    tools: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Run {
    id: String,
    thread_id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Vec<MessageObject>,
}

#[derive(Debug, Deserialize)]
struct MessageObject {
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize)]
struct MessageContent {
    #[serde(default)]
    text: Option<MessageText>,
}

#[derive(Debug, Deserialize)]
struct MessageText {
    value: String,
}

/// Assistant object as returned by the management endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
struct AssistantList {
    #[serde(default)]
    data: Vec<AssistantInfo>,
}

#[derive(Debug, Deserialize)]
struct DeletionStatus {
    #[serde(default)]
    deleted: bool,
}

pub struct OpenAiAssistant {
    cached_auth_header: String,
    assistant_id: Option<String>,
    model: String,
    base_url: String,
    poll_timeout: Duration,
    poll_interval: Duration,
    client: Client,
}

impl OpenAiAssistant {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        Self {
            cached_auth_header: format!("Bearer {api_key}"),
            assistant_id: None,
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            poll_timeout: Duration::from_secs(60),
            poll_interval: DEFAULT_POLL_INTERVAL,
            client: build_client(REQUEST_TIMEOUT_SECS),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &OpenAiConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let mut assistant = Self::new(api_key, &config.base_url, &config.model)
            .with_poll_timeout(Duration::from_secs(config.poll_timeout_secs));
        if let Some(id) = config.assistant_id.as_deref().filter(|id| !id.is_empty()) {
            assistant = assistant.with_assistant_id(id);
        }
        Some(assistant)
    }

    #[must_use]
    pub fn with_assistant_id(mut self, assistant_id: &str) -> Self {
        self.assistant_id = Some(assistant_id.to_string());
        self
    }

    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn assistant_id(&self) -> Option<&str> {
        self.assistant_id.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", &self.cached_auth_header)
            .header(BETA_HEADER.0, BETA_HEADER.1)
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> anyhow::Result<T> {
        let response = self
            .authorized(request)
            .send()
            .await
            .with_context(|| format!("OpenAI {what} request failed"))?;

        if !response.status().is_success() {
            return Err(api_error("OpenAI", response).await);
        }

        response
            .json()
            .await
            .with_context(|| format!("OpenAI {what} response JSON decode failed"))
    }

    async fn ask(&self, message: &str, context: &[ConversationTurn]) -> anyhow::Result<String> {
        let assistant_id = self
            .assistant_id
            .as_deref()
            .ok_or_else(|| ToolError::NotConfigured("no assistant id".into()))?;

        let mut messages: Vec<ThreadMessage<'_>> = context
            .iter()
            .map(|turn| ThreadMessage {
                role: turn.role,
                content: &turn.content,
            })
            .collect();
        let already_present = context
            .last()
            .is_some_and(|turn| turn.role == Role::User && turn.content == message);
        if !already_present {
            messages.push(ThreadMessage {
                role: Role::User,
                content: message,
            });
        }

        let body = CreateThreadAndRun {
            assistant_id,
            thread: NewThread { messages },
        };
        let run: Run = self
            .send_json(self.client.post(self.url("threads/runs")).json(&body), "run")
            .await?;
        tracing::debug!(run_id = %run.id, thread_id = %run.thread_id, "assistant run started");

        let run = self.wait_for_run(run).await?;
        if run.status != "completed" {
            return Err(ToolError::RunFailed {
                run_id: run.id,
                status: run.status,
            }
            .into());
        }

        let list: MessageList = self
            .send_json(
                self.client
                    .get(self.url(&format!("threads/{}/messages", run.thread_id)))
                    .query(&[("order", "desc"), ("limit", "1")]),
                "messages",
            )
            .await?;

        list.data
            .into_iter()
            .next()
            .and_then(|message| message.content.into_iter().find_map(|part| part.text))
            .map(|text| text.value)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("assistant run {} produced no text reply", run.id))
    }

    async fn wait_for_run(&self, mut run: Run) -> anyhow::Result<Run> {
        let started = Instant::now();
        while !TERMINAL_STATUSES.contains(&run.status.as_str()) {
            if started.elapsed() >= self.poll_timeout {
                return Err(ToolError::RunTimedOut {
                    run_id: run.id,
                    secs: self.poll_timeout.as_secs(),
                }
                .into());
            }
            tokio::time::sleep(self.poll_interval).await;
            let path = format!("threads/{}/runs/{}", run.thread_id, run.id);
            run = self
                .send_json(self.client.get(self.url(&path)), "run status")
                .await?;
        }
        Ok(run)
    }

    /// Create an assistant with the code interpreter tool. Returns its id.
    pub async fn create_assistant(
        &self,
        name: &str,
        instructions: &str,
        model: Option<&str>,
    ) -> anyhow::Result<String> {
        let body = CreateAssistant {
            name,
            instructions,
            model: model.unwrap_or(&self.model),
            tools: vec![serde_json::json!({"type": "code_interpreter"})],
        };
        let created: AssistantInfo = self
            .send_json(self.client.post(self.url("assistants")).json(&body), "create assistant")
            .await?;
        tracing::info!(assistant_id = %created.id, "created assistant");
        Ok(created.id)
    }

    pub async fn get_assistant(&self, assistant_id: &str) -> anyhow::Result<AssistantInfo> {
        self.send_json(
            self.client.get(self.url(&format!("assistants/{assistant_id}"))),
            "get assistant",
        )
        .await
    }

    pub async fn list_assistants(&self) -> anyhow::Result<Vec<AssistantInfo>> {
        let list: AssistantList = self
            .send_json(self.client.get(self.url("assistants")), "list assistants")
            .await?;
        Ok(list.data)
    }

    pub async fn delete_assistant(&self, assistant_id: &str) -> anyhow::Result<bool> {
        let status: DeletionStatus = self
            .send_json(
                self.client
                    .delete(self.url(&format!("assistants/{assistant_id}"))),
                "delete assistant",
            )
            .await?;
        Ok(status.deleted)
    }
}

impl Assistant for OpenAiAssistant {
    fn name(&self) -> &str {
        "openai"
    }

    fn respond<'a>(
        &'a self,
        message: &'a str,
        context: &'a [ConversationTurn],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(self.ask(message, context))
    }
}
