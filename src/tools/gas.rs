//! Google Apps Script runner client.

use super::http::build_client;
use super::traits::{ScriptExecutor, ScriptOutcome};
use crate::config::GasConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const EMPTY_RESULT: &str = "結果がありません";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunRequest<'a> {
    script: &'a str,
    title: &'a str,
    api_key: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct RunResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

pub struct GasClient {
    api_url: String,
    api_key: String,
    client: Client,
}

impl GasClient {
    pub fn new(api_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            client: build_client(timeout_secs),
        }
    }

    /// `None` unless both the endpoint and the key are configured.
    pub fn from_config(config: &GasConfig) -> Option<Self> {
        if !config.is_configured() {
            return None;
        }
        let api_url = config.api_url.as_deref()?;
        let api_key = config.api_key.as_deref()?;
        Some(Self::new(api_url, api_key, config.timeout_secs))
    }

    async fn run(&self, script: &str, title: &str) -> ScriptOutcome {
        let request = RunRequest {
            script,
            title,
            api_key: &self.api_key,
        };

        let response = match self.client.post(&self.api_url).json(&request).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(error = %error, "GAS request failed");
                return ScriptOutcome::Failure {
                    error: error.to_string(),
                };
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        interpret_response(status, &body)
    }
}

fn interpret_response(status: StatusCode, body: &str) -> ScriptOutcome {
    let parsed = serde_json::from_str::<RunResponse>(body).ok();

    if status == StatusCode::OK
        && let Some(RunResponse { success: true, result, .. }) = parsed
    {
        return ScriptOutcome::Success {
            result: result.unwrap_or_else(|| EMPTY_RESULT.to_string()),
        };
    }

    let error = parsed
        .and_then(|response| response.error)
        .filter(|error| !error.is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {body}", status.as_u16()));
    ScriptOutcome::Failure { error }
}

impl ScriptExecutor for GasClient {
    fn name(&self) -> &str {
        "gas"
    }

    fn execute_script<'a>(
        &'a self,
        script: &'a str,
        title: &'a str,
    ) -> Pin<Box<dyn Future<Output = ScriptOutcome> + Send + 'a>> {
        Box::pin(self.run(script, title))
    }
}
