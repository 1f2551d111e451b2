use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IntentKind {
    Question,
    Request,
    Greeting,
    Farewell,
    #[default]
    General,
}

/// Remote tool selected for a message that needs one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    CodeAssistant,
    CodeAnalyzer,
    CodeDebugger,
    GeneralAssistant,
}

pub type ToolParameters = BTreeMap<String, String>;

/// Classification result for a single inbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub kind: IntentKind,
    pub requires_external_tool: bool,
    pub tool_name: Option<ToolName>,
    pub parameters: ToolParameters,
    pub raw_message: String,
}

impl Intent {
    /// `general` with no tool, for messages that are not classified.
    pub fn fallback(raw_message: impl Into<String>) -> Self {
        Self {
            kind: IntentKind::General,
            requires_external_tool: false,
            tool_name: None,
            parameters: ToolParameters::new(),
            raw_message: raw_message.into(),
        }
    }
}

/// Per-user state persisted between exchanges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub user_id: String,
    #[serde(default)]
    pub context: Vec<ConversationTurn>,
    #[serde(default)]
    pub last_intent: Option<IntentKind>,
}

impl ConversationState {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            context: Vec::new(),
            last_intent: None,
        }
    }
}
