use super::{Config, LineConfig, TelegramConfig};

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Config {
    /// Apply deployment environment variables on top of the file config.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    pub(crate) fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // ── Channels ──
        let line_secret = non_empty(&lookup, "LINE_CHANNEL_SECRET");
        let line_token = non_empty(&lookup, "LINE_CHANNEL_ACCESS_TOKEN");
        match (&mut self.channels_config.line, line_secret, line_token) {
            (Some(line), secret, token) => {
                if let Some(secret) = secret {
                    line.channel_secret = secret;
                }
                if let Some(token) = token {
                    line.channel_access_token = token;
                }
            }
            (None, Some(channel_secret), Some(channel_access_token)) => {
                self.channels_config.line = Some(LineConfig {
                    channel_secret,
                    channel_access_token,
                    locale: None,
                });
            }
            (None, _, _) => {}
        }

        if let Some(bot_token) = non_empty(&lookup, "TELEGRAM_BOT_TOKEN") {
            match &mut self.channels_config.telegram {
                Some(telegram) => telegram.bot_token = bot_token,
                None => {
                    self.channels_config.telegram = Some(TelegramConfig {
                        bot_token,
                        webhook_url: None,
                        locale: "ja".into(),
                    });
                }
            }
        }
        if let Some(webhook_url) = non_empty(&lookup, "TELEGRAM_WEBHOOK_URL")
            && let Some(telegram) = &mut self.channels_config.telegram
        {
            telegram.webhook_url = Some(webhook_url);
        }

        // ── Store ──
        if let Some(url) = non_empty(&lookup, "SUPABASE_URL") {
            self.store.supabase.url = Some(url);
        }
        if let Some(key) = non_empty(&lookup, "SUPABASE_KEY") {
            self.store.supabase.key = Some(key);
        }
        if let Some(backend) = non_empty(&lookup, "CHATRELAY_STORE") {
            self.store.backend = backend;
        }

        // ── Tools ──
        if let Some(key) = non_empty(&lookup, "DEVIN_API_KEY") {
            self.tools.devin.api_key = Some(key);
        }
        if let Some(url) = non_empty(&lookup, "DEVIN_API_URL") {
            self.tools.devin.api_url = url;
        }
        if let Some(key) = non_empty(&lookup, "GAS_API_KEY") {
            self.tools.gas.api_key = Some(key);
        }
        if let Some(url) = non_empty(&lookup, "GAS_API_URL") {
            self.tools.gas.api_url = Some(url);
        }
        if let Some(key) = non_empty(&lookup, "OPENAI_API_KEY") {
            self.tools.openai.api_key = Some(key);
        }
        if let Some(id) = non_empty(&lookup, "OPENAI_ASSISTANT_ID") {
            self.tools.openai.assistant_id = Some(id);
        }
        if let Some(model) = non_empty(&lookup, "OPENAI_MODEL") {
            self.tools.openai.model = model;
        }

        // ── Gateway ──
        if let Some(port) = non_empty(&lookup, "CHATRELAY_GATEWAY_PORT")
            .or_else(|| non_empty(&lookup, "PORT"))
            .and_then(|raw| raw.parse::<u16>().ok())
        {
            self.gateway.port = port;
        }
        if let Some(host) =
            non_empty(&lookup, "CHATRELAY_GATEWAY_HOST").or_else(|| non_empty(&lookup, "HOST"))
        {
            self.gateway.host = host;
        }
        if let Some(secret) = non_empty(&lookup, "CHATRELAY_WEBHOOK_SECRET") {
            self.gateway.webhook_secret = Some(secret);
        }
    }
}
