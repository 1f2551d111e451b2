//! Client for the Devin code tool API.

use super::http::build_client;
use super::traits::{ToolExecutor, ToolResponse};
use crate::agent::{ConversationTurn, ToolParameters};
use crate::config::DevinConfig;
use anyhow::Context;
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

pub const MISSING_KEY_MESSAGE: &str =
    "I couldn't access the required tools. Please check the API configuration.";

#[derive(Debug, Serialize)]
struct ExecuteRequest<'a> {
    tool: &'a str,
    parameters: &'a ToolParameters,
    context: &'a [ConversationTurn],
}

pub struct DevinClient {
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: Option<String>,
    api_url: String,
    client: Client,
}

impl DevinClient {
    pub fn new(api_key: Option<&str>, api_url: &str, timeout_secs: u64) -> Self {
        Self {
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(|key| format!("Bearer {key}")),
            api_url: api_url.trim_end_matches('/').to_string(),
            client: build_client(timeout_secs),
        }
    }

    pub fn from_config(config: &DevinConfig) -> Self {
        Self::new(
            config.api_key.as_deref(),
            &config.api_url,
            config.timeout_secs,
        )
    }

    fn execute_url(&self) -> String {
        format!("{}/tools/execute", self.api_url)
    }

    async fn call(
        &self,
        tool_name: &str,
        parameters: &ToolParameters,
        context: &[ConversationTurn],
    ) -> anyhow::Result<ToolResponse> {
        let Some(auth_header) = self.cached_auth_header.as_ref() else {
            tracing::warn!(tool = tool_name, "Devin API key not set; skipping tool call");
            return Ok(ToolResponse::with_content(MISSING_KEY_MESSAGE));
        };

        let request = ExecuteRequest {
            tool: tool_name,
            parameters,
            context,
        };

        let response = self
            .client
            .post(self.execute_url())
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .context("Devin request failed")?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(tool = tool_name, status = status.as_u16(), "Devin tool call rejected");
            return Ok(ToolResponse::with_content(format!(
                "Error executing tool: {}",
                status.as_u16()
            )));
        }

        response
            .json::<ToolResponse>()
            .await
            .context("Devin response JSON decode failed")
    }
}

impl ToolExecutor for DevinClient {
    fn name(&self) -> &str {
        "devin"
    }

    fn execute<'a>(
        &'a self,
        tool_name: &'a str,
        parameters: &'a ToolParameters,
        context: &'a [ConversationTurn],
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResponse>> + Send + 'a>> {
        Box::pin(self.call(tool_name, parameters, context))
    }
}
