use super::{Assistant, DevinClient, GasClient, OpenAiAssistant, ScriptExecutor, ToolExecutor};
use crate::config::ToolsConfig;
use std::sync::Arc;

/// External clients handed to the response dispatcher.
#[derive(Clone)]
pub struct ToolSet {
    pub executor: Arc<dyn ToolExecutor>,
    pub scripts: Option<Arc<dyn ScriptExecutor>>,
    pub assistant: Option<Arc<dyn Assistant>>,
}

/// Build the tool clients described by `[tools]`.
///
/// The code tool client always exists (it answers with a configuration hint
/// when no key is set). The script runner needs both URL and key. The
/// assistant needs an API key and an assistant id.
pub fn create_tools(config: &ToolsConfig) -> ToolSet {
    let executor: Arc<dyn ToolExecutor> = Arc::new(DevinClient::from_config(&config.devin));

    let scripts = GasClient::from_config(&config.gas)
        .map(|client| Arc::new(client) as Arc<dyn ScriptExecutor>);

    let assistant = match OpenAiAssistant::from_config(&config.openai) {
        Some(client) if client.assistant_id().is_some() => {
            Some(Arc::new(client) as Arc<dyn Assistant>)
        }
        Some(_) => {
            tracing::warn!(
                "OpenAI API key set without an assistant id; questions use the built-in reply. \
                 Create one with `chatrelay assistant create`."
            );
            None
        }
        None => None,
    };

    tracing::debug!(
        executor = executor.name(),
        scripts = scripts.as_ref().map(|s| s.name()),
        assistant = assistant.as_ref().map(|a| a.name()),
        "tool clients ready"
    );

    ToolSet {
        executor,
        scripts,
        assistant,
    }
}
