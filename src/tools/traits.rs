use crate::agent::{ConversationTurn, ToolParameters};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// Payload returned by a remote code tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResponse {
    #[serde(default)]
    pub content: Option<String>,
}

impl ToolResponse {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
        }
    }
}

/// Outcome of running a script on a remote runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptOutcome {
    Success { result: String },
    Failure { error: String },
}

/// Remote code tool API (code assistant, analyzer, debugger).
pub trait ToolExecutor: Send + Sync {
    fn name(&self) -> &str;

    /// Execute `tool_name`. Transport and decoding failures are `Err`;
    /// API-level failures come back as `Ok` with explanatory content.
    fn execute<'a>(
        &'a self,
        tool_name: &'a str,
        parameters: &'a ToolParameters,
        context: &'a [ConversationTurn],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResponse>> + Send + 'a>>;
}

/// Remote script runner. Never fails; problems are reported as
/// [`ScriptOutcome::Failure`].
pub trait ScriptExecutor: Send + Sync {
    fn name(&self) -> &str;

    fn execute_script<'a>(
        &'a self,
        script: &'a str,
        title: &'a str,
    ) -> Pin<Box<dyn Future<Output = ScriptOutcome> + Send + 'a>>;
}

/// Conversational assistant used to answer questions.
pub trait Assistant: Send + Sync {
    fn name(&self) -> &str;

    fn respond<'a>(
        &'a self,
        message: &'a str,
        context: &'a [ConversationTurn],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}
