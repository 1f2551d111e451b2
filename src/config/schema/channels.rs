use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    pub line: Option<LineConfig>,
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    /// Secret used to verify `X-Line-Signature`
    pub channel_secret: String,
    /// Messaging API access token used for replies
    pub channel_access_token: String,
    /// Reply locale override; falls back to the global locale
    #[serde(default)]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Public base URL the webhook is registered under
    #[serde(default)]
    pub webhook_url: Option<String>,
    /// Locale for `/start`, `/help` and error replies (default: ja)
    #[serde(default = "default_telegram_locale")]
    pub locale: String,
}

fn default_telegram_locale() -> String {
    "ja".into()
}
