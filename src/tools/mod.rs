//! Clients for the external services a reply can be delegated to.

pub mod devin;
pub mod factory;
pub mod gas;
mod http;
pub mod openai;
pub mod traits;

pub use devin::DevinClient;
pub use factory::{ToolSet, create_tools};
pub use gas::GasClient;
pub use openai::{AssistantInfo, OpenAiAssistant};
pub use traits::{Assistant, ScriptExecutor, ScriptOutcome, ToolExecutor, ToolResponse};
