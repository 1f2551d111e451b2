use chatrelay::Config;

fn configured(flag: bool) -> String {
    if flag {
        t!("status.configured").to_string()
    } else {
        t!("status.not_configured").to_string()
    }
}

pub fn render_status(config: &Config, locale: &str) -> String {
    let tools = &config.tools;
    let channels = &config.channels_config;
    let lines = vec![
        format!("◆ {}", t!("status.title")),
        String::new(),
        format!("{}     {}", t!("status.version"), env!("CARGO_PKG_VERSION")),
        format!("{}      {}", t!("status.config"), config.config_path.display()),
        format!("{}      {locale}", t!("status.locale")),
        String::new(),
        format!("  {}       {}", t!("status.store"), config.store.backend),
        format!(
            "  {}     {}",
            t!("status.context_window"),
            config.agent.context_window
        ),
        String::new(),
        format!("  LINE        {}", configured(channels.line.is_some())),
        format!("  Telegram    {}", configured(channels.telegram.is_some())),
        String::new(),
        format!(
            "  Devin       {}",
            configured(tools.devin.api_key.as_deref().is_some_and(|k| !k.is_empty()))
        ),
        format!("  GAS         {}", configured(tools.gas.is_configured())),
        format!(
            "  OpenAI      {}",
            configured(tools.openai.api_key.is_some() && tools.openai.assistant_id.is_some())
        ),
        String::new(),
        format!(
            "  {}     {}:{}",
            t!("status.gateway"),
            config.gateway.host,
            config.gateway.port
        ),
    ];
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lists_backend_and_channels() {
        let mut config = Config::default();
        config.store.backend = "memory".into();
        config.gateway.port = 9001;
        let rendered = render_status(&config, "en");
        assert!(rendered.contains("memory"));
        assert!(rendered.contains("Telegram"));
        assert!(rendered.contains(":9001"));
    }
}
