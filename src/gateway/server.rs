use super::handlers::{
    handle_feedback, handle_health, handle_line_webhook, handle_telegram_webhook,
};
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS};

use crate::agent::{AgentManager, MessagePipeline};
use crate::channels::{LineChannel, TelegramChannel};
use crate::config::Config;
use crate::store::create_store;
use crate::tools::create_tools;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Bind `host:port` and serve until Ctrl-C.
pub async fn run_gateway(host: &str, port: u16, config: Arc<Config>, locale: &str) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind gateway socket {addr}"))?;

    run_gateway_with_listener(host, listener, config, locale).await
}

/// Serve from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
    locale: &str,
) -> Result<()> {
    let actual_port = listener
        .local_addr()
        .context("get gateway listener local address")?
        .port();
    let display_addr = format!("{host}:{actual_port}");

    let state = build_gateway_state(&config, locale).await?;
    print_gateway_banner(&display_addr, &state);

    let app = build_app(state, &config.gateway.cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway")?;

    tracing::info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Wire store, tools, agent and channels from configuration.
pub async fn build_gateway_state(config: &Config, locale: &str) -> Result<AppState> {
    let store = create_store(config).await?;
    let tools = create_tools(&config.tools);
    let agent = AgentManager::from_config(config, tools, locale).context("build agent")?;
    let pipeline = Arc::new(MessagePipeline::new(Arc::new(agent), store));

    let mut state = AppState::new(pipeline, locale);
    state.webhook_secret = config
        .gateway
        .webhook_secret
        .as_deref()
        .map(str::trim)
        .filter(|secret| !secret.is_empty())
        .map(Arc::from);

    if let Some(line) = config.channels_config.line.as_ref() {
        state.line = Some(Arc::new(LineChannel::new(
            line.channel_secret.clone(),
            line.channel_access_token.clone(),
        )));
        if let Some(line_locale) = line.locale.as_deref() {
            state.line_locale = Arc::from(line_locale);
        }
    }

    if let Some(telegram) = config.channels_config.telegram.as_ref() {
        state.telegram = Some(Arc::new(TelegramChannel::new(telegram.bot_token.clone())));
        state.telegram_locale = Arc::from(telegram.locale.as_str());
    }

    Ok(state)
}

fn print_gateway_banner(display_addr: &str, state: &AppState) {
    println!("Gateway listening on {display_addr}");
    println!("  GET  /healthz");
    if state.line.is_some() {
        println!("  POST /webhook          (LINE)");
    }
    if state.telegram.is_some() {
        println!("  POST /webhook/<token>  (Telegram)");
    }
    if state.webhook_secret.is_some() {
        println!("  POST /feedback");
    } else {
        println!("  POST /feedback         (disabled: no webhook secret)");
    }
    println!("  Store: {}", state.pipeline.store().name());
}

/// Router with all routes and the body-limit, timeout and CORS layers.
pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(handle_health))
        .route("/webhook", post(handle_line_webhook))
        .route("/webhook/{token}", post(handle_telegram_webhook))
        .route("/feedback", post(handle_feedback))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    if !cors_origins.is_empty() {
        let origins: Vec<_> = cors_origins.iter().filter_map(|o| o.parse().ok()).collect();
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::HeaderName::from_static("x-webhook-secret"),
                ]),
        );
    }

    app
}
