use chatrelay::config::{Config, LineConfig, TelegramConfig};
use chatrelay::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const LINE_SECRET: &str = "line-channel-secret";
pub const BOT_TOKEN: &str = "123456:TEST-TOKEN";
pub const FEEDBACK_SECRET: &str = "gateway-shared-secret";

pub struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _data_dir: TempDir,
}

impl GatewayTestServer {
    pub async fn start(webhook_secret: Option<&str>) -> Self {
        let data_dir = TempDir::new().expect("temp data dir should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.data_dir = data_dir.path().to_path_buf();
        config.config_path = data_dir.path().join("config.toml");
        config.store.backend = "sqlite".to_string();
        config.gateway.webhook_secret = webhook_secret.map(ToString::to_string);
        config.channels_config.line = Some(LineConfig {
            channel_secret: LINE_SECRET.to_string(),
            channel_access_token: "line-access-token".to_string(),
            locale: None,
        });
        config.channels_config.telegram = Some(TelegramConfig {
            bot_token: BOT_TOKEN.to_string(),
            webhook_url: None,
            locale: "ja".to_string(),
        });

        let config = Arc::new(config);
        let handle = tokio::spawn(async move {
            run_gateway_with_listener("127.0.0.1", listener, config, "en").await
        });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _data_dir: data_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..200 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/healthz"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}
