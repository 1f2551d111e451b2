mod agent;
mod channels;
mod core;
mod gateway;
mod store;
mod tools;

pub use agent::AgentConfig;
pub use channels::{ChannelsConfig, LineConfig, TelegramConfig};
pub use self::core::Config;
pub use gateway::GatewayConfig;
pub use store::{StoreConfig, SupabaseConfig};
pub use tools::{DevinConfig, GasConfig, OpenAiConfig, ToolsConfig};
