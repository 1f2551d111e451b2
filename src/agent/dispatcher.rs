//! Maps a classified intent to a reply.

use super::types::{ConversationTurn, Intent, IntentKind, ToolName};
use crate::tools::{Assistant, ScriptExecutor, ScriptOutcome, ToolExecutor, ToolSet};
use crate::utils::text::truncate_with_ellipsis;
use std::sync::Arc;

const SCRIPT_TITLE_MAX_CHARS: usize = 40;

pub struct Dispatcher {
    tools: Arc<dyn ToolExecutor>,
    scripts: Option<Arc<dyn ScriptExecutor>>,
    assistant: Option<Arc<dyn Assistant>>,
    locale: String,
}

impl Dispatcher {
    pub fn new(tools: Arc<dyn ToolExecutor>) -> Self {
        Self {
            tools,
            scripts: None,
            assistant: None,
            locale: "en".to_string(),
        }
    }

    pub fn from_tool_set(tool_set: ToolSet) -> Self {
        Self {
            tools: tool_set.executor,
            scripts: tool_set.scripts,
            assistant: tool_set.assistant,
            locale: "en".to_string(),
        }
    }

    #[must_use]
    pub fn with_script_executor(mut self, scripts: Arc<dyn ScriptExecutor>) -> Self {
        self.scripts = Some(scripts);
        self
    }

    #[must_use]
    pub fn with_assistant(mut self, assistant: Arc<dyn Assistant>) -> Self {
        self.assistant = Some(assistant);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Produce the reply for `intent`. Never fails: every error path ends in
    /// a fixed apology text.
    pub async fn dispatch(&self, intent: &Intent, context: &[ConversationTurn]) -> String {
        if intent.requires_external_tool {
            return self.call_tool(intent, context).await;
        }

        if let Some(scripts) = self.scripts.as_ref()
            && let Some(script) = extract_script(&intent.raw_message)
        {
            return self.run_script(&**scripts, script, &intent.raw_message).await;
        }

        let locale = self.locale.as_str();
        match intent.kind {
            IntentKind::Question => match self.handle_question(intent, context).await {
                Ok(reply) => reply,
                Err(error) => {
                    tracing::warn!(error = %error, "question handler failed");
                    t!("reply.handler_failed", locale = locale).to_string()
                }
            },
            IntentKind::Request => t!("reply.request", locale = locale).to_string(),
            IntentKind::Greeting => t!("reply.greeting", locale = locale).to_string(),
            IntentKind::Farewell => t!("reply.farewell", locale = locale).to_string(),
            IntentKind::General => t!("reply.general", locale = locale).to_string(),
        }
    }

    async fn handle_question(
        &self,
        intent: &Intent,
        context: &[ConversationTurn],
    ) -> anyhow::Result<String> {
        match self.assistant.as_ref() {
            Some(assistant) => assistant.respond(&intent.raw_message, context).await,
            None => Ok(t!("reply.question", locale = self.locale.as_str()).to_string()),
        }
    }

    async fn call_tool(&self, intent: &Intent, context: &[ConversationTurn]) -> String {
        let locale = self.locale.as_str();
        let tool_name = intent.tool_name.unwrap_or(ToolName::GeneralAssistant);

        match self
            .tools
            .execute(tool_name.as_ref(), &intent.parameters, context)
            .await
        {
            Ok(response) => response
                .content
                .filter(|content| !content.trim().is_empty())
                .unwrap_or_else(|| t!("reply.tool_no_content", locale = locale).to_string()),
            Err(error) => {
                tracing::error!(
                    tool = %tool_name,
                    executor = self.tools.name(),
                    error = %error,
                    "tool call failed"
                );
                t!("reply.tool_failed", locale = locale).to_string()
            }
        }
    }

    async fn run_script(&self, scripts: &dyn ScriptExecutor, script: &str, message: &str) -> String {
        let locale = self.locale.as_str();
        let title = script_title(message);
        tracing::info!(runner = scripts.name(), title = %title, "running script");

        match scripts.execute_script(script, &title).await {
            ScriptOutcome::Success { result } => {
                t!("reply.script_succeeded", locale = locale, result = result).to_string()
            }
            ScriptOutcome::Failure { error } => {
                tracing::warn!(error = %error, "script failed");
                t!("reply.script_failed", locale = locale, error = error).to_string()
            }
        }
    }
}

/// Body of the first fenced block tagged `javascript`, `js`, `gs` or untagged.
fn extract_script(message: &str) -> Option<&str> {
    let start = message.find("```")? + 3;
    let rest = &message[start..];
    let newline = rest.find('\n')?;
    let tag = rest[..newline].trim().to_ascii_lowercase();
    if !matches!(tag.as_str(), "" | "javascript" | "js" | "gs") {
        return None;
    }
    let body = &rest[newline + 1..];
    let end = body.find("```")?;
    let script = body[..end].trim();
    (!script.is_empty()).then_some(script)
}

/// Text before the fence, or a generic title when the message starts with it.
fn script_title(message: &str) -> String {
    let lead = message
        .split("```")
        .next()
        .map(str::trim)
        .unwrap_or_default();
    if lead.is_empty() {
        "chatrelay script".to_string()
    } else {
        truncate_with_ellipsis(lead, SCRIPT_TITLE_MAX_CHARS)
    }
}
