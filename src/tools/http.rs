use crate::utils::text::truncate_with_ellipsis;
use reqwest::Client;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Shared client construction for the tool adapters.
pub(crate) fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Turn a non-success response into an error carrying a shortened body.
pub(crate) async fn api_error(service: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    let body = truncate_with_ellipsis(body.trim(), MAX_ERROR_BODY_CHARS);
    anyhow::anyhow!("{service} API error ({status}): {body}")
}
