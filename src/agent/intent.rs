//! Rule-based intent classification.
//!
//! The message is lowercased and tested against ordered regex groups
//! (question, request, greeting, farewell). The first group with a matching
//! rule wins; nothing matching means `general`. A single trailing newline is
//! ignored by the anchored rules. Tool routing is a separate keyword scan over
//! the same lowercased text.

use super::types::{ConversationTurn, Intent, IntentKind, ToolName, ToolParameters};
use crate::error::AgentError;
use regex::Regex;

const QUESTION_RULES: &[&str] = &[
    r"^what\s.+\?$",
    r"^how\s.+\?$",
    r"^why\s.+\?$",
    r"^when\s.+\?$",
    r"^where\s.+\?$",
    r"^who\s.+\?$",
    r"^can\s.+\?$",
    r".+\?$",
];

const REQUEST_RULES: &[&str] = &[
    r"^please\s.+",
    r"^could you\s.+",
    r"^can you\s.+",
    r"^would you\s.+",
    r"^i need\s.+",
    r"^i want\s.+",
];

const GREETING_RULES: &[&str] = &[
    r"^hi$",
    r"^hello$",
    r"^hey$",
    r"^good morning$",
    r"^good afternoon$",
    r"^good evening$",
];

const FAREWELL_RULES: &[&str] = &[
    r"^bye$",
    r"^goodbye$",
    r"^see you$",
    r"^talk to you later$",
    r"^farewell$",
];

pub const DEFAULT_TOOL_KEYWORDS: &[&str] = &[
    "code",
    "programming",
    "develop",
    "build",
    "create",
    "generate",
    "analyze",
    "debug",
    "fix",
    "implement",
    "deploy",
    "automate",
];

struct RuleGroup {
    kind: IntentKind,
    rules: Vec<Regex>,
}

impl RuleGroup {
    fn compile(kind: IntentKind, patterns: &[&str]) -> Result<Self, AgentError> {
        let rules = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| AgentError::InvalidRule {
                    pattern: (*pattern).to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { kind, rules })
    }

    fn matches(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(text))
    }
}

pub struct IntentClassifier {
    groups: Vec<RuleGroup>,
    tool_keywords: Vec<String>,
}

impl IntentClassifier {
    /// Classifier with the built-in rules and keywords.
    pub fn new() -> Result<Self, AgentError> {
        Self::with_extra_keywords(&[])
    }

    /// Built-in rules plus additional tool keywords from configuration.
    pub fn with_extra_keywords(extra_keywords: &[String]) -> Result<Self, AgentError> {
        let groups = vec![
            RuleGroup::compile(IntentKind::Question, QUESTION_RULES)?,
            RuleGroup::compile(IntentKind::Request, REQUEST_RULES)?,
            RuleGroup::compile(IntentKind::Greeting, GREETING_RULES)?,
            RuleGroup::compile(IntentKind::Farewell, FAREWELL_RULES)?,
        ];

        let mut tool_keywords: Vec<String> = DEFAULT_TOOL_KEYWORDS
            .iter()
            .map(|keyword| (*keyword).to_string())
            .collect();
        for keyword in extra_keywords {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !tool_keywords.contains(&keyword) {
                tool_keywords.push(keyword);
            }
        }

        Ok(Self {
            groups,
            tool_keywords,
        })
    }

    pub fn tool_keywords(&self) -> &[String] {
        &self.tool_keywords
    }

    /// Classify a message. Context is accepted for future use and does not
    /// influence the result.
    pub fn classify(&self, message: &str, _context: &[ConversationTurn]) -> Intent {
        let text = message.to_lowercase();
        let rule_text = text.strip_suffix('\n').unwrap_or(&text);

        let kind = self
            .groups
            .iter()
            .find(|group| group.matches(rule_text))
            .map_or(IntentKind::General, |group| group.kind);

        let requires_external_tool = self
            .tool_keywords
            .iter()
            .any(|keyword| text.contains(keyword.as_str()));

        let (tool_name, parameters) = if requires_external_tool {
            let mut parameters = ToolParameters::new();
            parameters.insert("query".to_string(), message.to_string());
            (Some(select_tool(&text)), parameters)
        } else {
            (None, ToolParameters::new())
        };

        Intent {
            kind,
            requires_external_tool,
            tool_name,
            parameters,
            raw_message: message.to_string(),
        }
    }
}

fn select_tool(text: &str) -> ToolName {
    if text.contains("code") || text.contains("programming") {
        ToolName::CodeAssistant
    } else if text.contains("analyze") {
        ToolName::CodeAnalyzer
    } else if text.contains("debug") || text.contains("fix") {
        ToolName::CodeDebugger
    } else {
        ToolName::GeneralAssistant
    }
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("groups", &self.groups.len())
            .field("tool_keywords", &self.tool_keywords)
            .finish()
    }
}
