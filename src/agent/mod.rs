//! Intent classification, reply dispatch and per-user orchestration.

pub mod context;
pub mod dispatcher;
pub mod intent;
pub mod manager;
pub mod pipeline;
pub mod types;

pub use context::{ContextWindow, DEFAULT_CONTEXT_WINDOW};
pub use dispatcher::Dispatcher;
pub use intent::IntentClassifier;
pub use manager::{AgentManager, Response};
pub use pipeline::{MessagePipeline, UserLocks};
pub use types::{
    ConversationState, ConversationTurn, Intent, IntentKind, Role, ToolName, ToolParameters,
};
