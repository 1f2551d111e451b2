use super::{AgentConfig, ChannelsConfig, GatewayConfig, StoreConfig, ToolsConfig};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory - computed from home, not serialized
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub agent: AgentConfig,

    #[serde(default)]
    pub channels_config: ChannelsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            agent: AgentConfig::default(),
            channels_config: ChannelsConfig::default(),
            store: StoreConfig::default(),
            tools: ToolsConfig::default(),
            gateway: GatewayConfig::default(),
            locale: default_locale(),
        }
    }
}

impl Config {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.agent.context_window == 0 {
            return Err(ConfigError::Validation(
                "[agent] context_window must be at least 1".into(),
            ));
        }
        if self.agent.max_message_chars == 0 {
            return Err(ConfigError::Validation(
                "[agent] max_message_chars must be at least 1".into(),
            ));
        }
        if self.agent.reply_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "[agent] reply_timeout_secs must be at least 1".into(),
            ));
        }
        if !matches!(self.store.backend.as_str(), "memory" | "sqlite" | "supabase") {
            return Err(ConfigError::Validation(format!(
                "[store] backend must be one of memory, sqlite, supabase (got {})",
                self.store.backend
            )));
        }
        Ok(())
    }

    /// Resolve the SQLite database path, relative paths land in the data dir.
    pub fn sqlite_path(&self) -> PathBuf {
        let configured = PathBuf::from(&self.store.sqlite_path);
        if configured.is_absolute() {
            configured
        } else {
            self.data_dir.join(configured)
        }
    }
}
