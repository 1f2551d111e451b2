mod env_overrides;
mod loader;
mod locale;
pub mod schema;

pub use schema::{
    AgentConfig, ChannelsConfig, Config, DevinConfig, GasConfig, GatewayConfig, LineConfig,
    OpenAiConfig, StoreConfig, SupabaseConfig, TelegramConfig, ToolsConfig,
};
