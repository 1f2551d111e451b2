use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Turns kept per conversation (default: 10)
    #[serde(default = "default_context_window")]
    pub context_window: usize,
    /// Messages longer than this, in characters, skip classification and get
    /// the general reply (default: 5000)
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
    /// Deadline for producing one reply, tool and assistant calls included
    /// (default: 90)
    #[serde(default = "default_reply_timeout_secs")]
    pub reply_timeout_secs: u64,
    /// Extra words that route a message to the external tool client
    #[serde(default)]
    pub extra_tool_keywords: Vec<String>,
}

fn default_context_window() -> usize {
    10
}

fn default_max_message_chars() -> usize {
    5000
}

fn default_reply_timeout_secs() -> u64 {
    90
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            max_message_chars: default_max_message_chars(),
            reply_timeout_secs: default_reply_timeout_secs(),
            extra_tool_keywords: Vec::new(),
        }
    }
}
