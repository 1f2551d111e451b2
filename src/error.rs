use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `chatrelay`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; adapter internals continue to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ChatRelayError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Agent pipeline ──────────────────────────────────────────────────
    #[error("agent: {0}")]
    Agent(#[from] AgentError),

    // ── Conversation store ──────────────────────────────────────────────
    #[error("store: {0}")]
    Store(#[from] StoreError),

    // ── External tools ──────────────────────────────────────────────────
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // ── Channels ────────────────────────────────────────────────────────
    #[error("channel: {0}")]
    Channel(#[from] ChannelError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Agent errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("no reply within {secs}s")]
    ReplyTimedOut { secs: u64 },

    #[error("intent rule {pattern} failed to compile: {message}")]
    InvalidRule { pattern: String, message: String },
}

// ─── Store errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("backend not available: {0}")]
    BackendUnavailable(String),

    #[error("corrupt conversation row for {user_id}: {message}")]
    Corrupt { user_id: String, message: String },
}

// ─── Tool errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("assistant not configured: {0}")]
    NotConfigured(String),

    #[error("assistant run {run_id} ended with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("assistant run {run_id} did not finish within {secs}s")]
    RunTimedOut { run_id: String, secs: u64 },
}

// ─── Channel errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel {channel} send failed: {message}")]
    Send { channel: String, message: String },

    #[error("gateway: {0}")]
    Gateway(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ChatRelayError>;
