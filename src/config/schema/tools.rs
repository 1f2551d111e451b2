use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub devin: DevinConfig,
    #[serde(default)]
    pub gas: GasConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevinConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_devin_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_devin_api_url() -> String {
    "https://api.devin.com/v1".into()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DevinConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_devin_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Google Apps Script interpreter endpoint. Disabled unless both fields are set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GasConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
            && self.api_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub assistant_id: Option<String>,
    #[serde(default = "default_openai_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
    /// Upper bound on waiting for an assistant run
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

fn default_openai_model() -> String {
    "gpt-4-turbo".into()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_poll_timeout_secs() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            assistant_id: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gas_requires_key_and_url() {
        let mut gas = GasConfig::default();
        assert!(!gas.is_configured());
        gas.api_key = Some("k".into());
        assert!(!gas.is_configured());
        gas.api_url = Some("https://script.google.com/macros/s/x/exec".into());
        assert!(gas.is_configured());
        gas.api_key = Some(String::new());
        assert!(!gas.is_configured());
    }

    #[test]
    fn tool_defaults_match_public_endpoints() {
        let tools = ToolsConfig::default();
        assert_eq!(tools.devin.api_url, "https://api.devin.com/v1");
        assert_eq!(tools.openai.model, "gpt-4-turbo");
        assert_eq!(tools.openai.base_url, "https://api.openai.com/v1");
    }
}
