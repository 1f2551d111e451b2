use super::context::ContextWindow;
use super::dispatcher::Dispatcher;
use super::intent::IntentClassifier;
use super::types::{ConversationState, ConversationTurn, Intent, Role};
use crate::config::Config;
use crate::error::AgentError;
use crate::tools::ToolSet;
use crate::utils::text::truncate_with_ellipsis;
use std::time::Duration;

/// Longest message classified; LINE accepts up to 5000 characters.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 5000;
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(90);

/// Reply text plus the state to persist for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub reply: String,
    pub state: ConversationState,
}

pub struct AgentManager {
    classifier: IntentClassifier,
    dispatcher: Dispatcher,
    window: ContextWindow,
    max_message_chars: usize,
    reply_timeout: Duration,
}

impl AgentManager {
    pub fn new(classifier: IntentClassifier, dispatcher: Dispatcher) -> Self {
        Self {
            classifier,
            dispatcher,
            window: ContextWindow::default(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    /// Wire the agent from `[agent]` settings, the tool clients and the
    /// resolved reply locale.
    pub fn from_config(config: &Config, tools: ToolSet, locale: &str) -> Result<Self, AgentError> {
        let classifier = IntentClassifier::with_extra_keywords(&config.agent.extra_tool_keywords)?;
        let dispatcher = Dispatcher::from_tool_set(tools).with_locale(locale);
        Ok(Self::new(classifier, dispatcher)
            .with_window(ContextWindow::new(config.agent.context_window))
            .with_max_message_chars(config.agent.max_message_chars)
            .with_reply_timeout(Duration::from_secs(config.agent.reply_timeout_secs)))
    }

    #[must_use]
    pub fn with_window(mut self, window: ContextWindow) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_max_message_chars(mut self, max_message_chars: usize) -> Self {
        self.max_message_chars = max_message_chars;
        self
    }

    #[must_use]
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    /// Run one exchange. Never fails: on error the caller gets the original
    /// state back together with an apology.
    pub async fn process_message(
        &self,
        message: &str,
        user_id: &str,
        state: ConversationState,
    ) -> Response {
        match self.try_process(message, user_id, &state).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(user_id, error = %error, "message not processed");
                Response {
                    reply: t!("reply.pipeline_failed", locale = self.dispatcher.locale())
                        .to_string(),
                    state,
                }
            }
        }
    }

    async fn try_process(
        &self,
        message: &str,
        user_id: &str,
        state: &ConversationState,
    ) -> Result<Response, AgentError> {
        let context = self.window.append(&state.context, message, Role::User);
        let intent = self.intent_for(message, &context);
        tracing::debug!(
            user_id,
            kind = %intent.kind,
            tool = ?intent.tool_name,
            message = %truncate_with_ellipsis(message, 80),
            "classified message"
        );

        let reply = tokio::time::timeout(
            self.reply_timeout,
            self.dispatcher.dispatch(&intent, &context),
        )
        .await
        .map_err(|_| AgentError::ReplyTimedOut {
            secs: self.reply_timeout.as_secs(),
        })?;
        let context = self.window.append(&context, &reply, Role::Assistant);

        Ok(Response {
            reply,
            state: ConversationState {
                user_id: user_id.to_string(),
                context,
                last_intent: Some(intent.kind),
            },
        })
    }

    /// Oversized messages are not classified.
    fn intent_for(&self, message: &str, context: &[ConversationTurn]) -> Intent {
        let len = message.chars().count();
        if len > self.max_message_chars {
            tracing::info!(
                len,
                max = self.max_message_chars,
                "message too long to classify"
            );
            return Intent::fallback(message);
        }
        self.classifier.classify(message, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ConversationTurn, IntentKind};
    use crate::agent::ToolParameters;
    use crate::tools::{DevinClient, ToolExecutor, ToolResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;

    struct SlowTools;

    impl ToolExecutor for SlowTools {
        fn name(&self) -> &str {
            "slow"
        }

        fn execute<'a>(
            &'a self,
            _tool_name: &'a str,
            _parameters: &'a ToolParameters,
            _context: &'a [ConversationTurn],
        ) -> Pin<Box<dyn Future<Output = anyhow::Result<ToolResponse>> + Send + 'a>> {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(ToolResponse {
                    content: Some("late".into()),
                })
            })
        }
    }

    fn manager() -> AgentManager {
        let tools = Arc::new(DevinClient::new(None, "http://127.0.0.1:9", 1));
        AgentManager::new(IntentClassifier::new().unwrap(), Dispatcher::new(tools))
    }

    #[tokio::test]
    async fn greeting_from_new_user() {
        let response = manager()
            .process_message("Hello", "u1", ConversationState::empty("u1"))
            .await;
        assert_eq!(response.reply, "Hello! How can I assist you today?");
        assert_eq!(response.state.user_id, "u1");
        assert_eq!(response.state.last_intent, Some(IntentKind::Greeting));
        assert_eq!(
            response.state.context,
            vec![
                ConversationTurn::user("Hello"),
                ConversationTurn::assistant("Hello! How can I assist you today?"),
            ]
        );
    }

    #[tokio::test]
    async fn tool_request_without_key_reports_configuration() {
        let response = manager()
            .process_message("Please write code for sorting", "u1", ConversationState::empty("u1"))
            .await;
        assert_eq!(
            response.reply,
            "I couldn't access the required tools. Please check the API configuration."
        );
        assert_eq!(response.state.last_intent, Some(IntentKind::Request));
    }

    #[tokio::test]
    async fn context_stays_within_window() {
        let agent = manager().with_window(ContextWindow::new(10));
        let mut state = ConversationState::empty("u1");
        for i in 0..8 {
            state = agent
                .process_message(&format!("message {i}"), "u1", state)
                .await
                .state;
        }
        assert_eq!(state.context.len(), 10);
        assert_eq!(state.context[0], ConversationTurn::user("message 3"));
        assert_eq!(
            state.context[9].content,
            "I'm here to help. What would you like to know or do?"
        );
    }

    #[tokio::test]
    async fn blank_message_is_classified_as_general() {
        let response = manager()
            .process_message("   ", "u1", ConversationState::empty("u1"))
            .await;
        assert_eq!(
            response.reply,
            "I'm here to help. What would you like to know or do?"
        );
        assert_eq!(response.state.last_intent, Some(IntentKind::General));
        assert_eq!(response.state.context[0], ConversationTurn::user("   "));
    }

    #[tokio::test]
    async fn long_line_message_is_answered() {
        let text = format!("please fix {}", "x".repeat(4490));
        let response = manager()
            .process_message(&text, "u1", ConversationState::empty("u1"))
            .await;
        assert_eq!(response.state.last_intent, Some(IntentKind::Request));
        assert_eq!(response.state.context.len(), 2);
    }

    #[tokio::test]
    async fn oversized_message_skips_classification() {
        let agent = manager().with_max_message_chars(5);
        let response = agent
            .process_message("please fix it", "u1", ConversationState::empty("u1"))
            .await;
        assert_eq!(
            response.reply,
            "I'm here to help. What would you like to know or do?"
        );
        assert_eq!(response.state.last_intent, Some(IntentKind::General));
        assert_eq!(response.state.context.len(), 2);
    }

    #[tokio::test]
    async fn slow_tool_returns_original_state_and_apology() {
        let agent = AgentManager::new(
            IntentClassifier::new().unwrap(),
            Dispatcher::new(Arc::new(SlowTools)),
        )
        .with_reply_timeout(Duration::from_millis(50));

        let mut state = ConversationState::empty("u1");
        state.context.push(ConversationTurn::user("earlier"));
        state.last_intent = Some(IntentKind::Question);

        let response = agent
            .process_message("please fix my code", "u1", state.clone())
            .await;
        assert_eq!(
            response.reply,
            "Sorry, I encountered an error while processing your message."
        );
        assert_eq!(response.state, state);
    }

    #[tokio::test]
    async fn user_id_argument_wins_over_state() {
        let response = manager()
            .process_message("hi", "u2", ConversationState::empty("stale"))
            .await;
        assert_eq!(response.state.user_id, "u2");
    }

    #[test]
    fn from_config_applies_agent_settings() {
        let mut config = Config::default();
        config.agent.context_window = 4;
        config.agent.extra_tool_keywords = vec!["refactor".into()];
        config.agent.reply_timeout_secs = 12;
        let tools = crate::tools::create_tools(&config.tools);
        let agent = AgentManager::from_config(&config, tools, "en").unwrap();
        assert_eq!(agent.window.max_length(), 4);
        assert_eq!(agent.reply_timeout, Duration::from_secs(12));
        assert!(
            agent
                .classifier()
                .tool_keywords()
                .iter()
                .any(|k| k == "refactor")
        );
    }
}
