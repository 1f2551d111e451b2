use super::Config;
use anyhow::{Context, Result};
use directories::UserDirs;
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.chatrelay/config.toml`, writing defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .context("Could not find home directory")?;
        let chatrelay_dir = home.join(".chatrelay");
        let config_path = chatrelay_dir.join("config.toml");

        if !chatrelay_dir.exists() {
            fs::create_dir_all(&chatrelay_dir).context("Failed to create .chatrelay directory")?;
        }

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self {
                config_path: config_path.clone(),
                data_dir: chatrelay_dir,
                ..Self::default()
            };
            config.save()?;
            config
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load the config named on the command line, or the default one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Self::load_or_init();
        };
        let mut config = Self::load_from(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file; its directory becomes the data directory.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.config_path = path.to_path_buf();
        config.data_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_from_reads_sections_and_sets_paths() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
locale = "ja"

[agent]
context_window = 6
extra_tool_keywords = ["script"]

[store]
backend = "memory"

[channels_config.telegram]
bot_token = "123:ABC"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.locale, "ja");
        assert_eq!(config.agent.context_window, 6);
        assert_eq!(config.agent.extra_tool_keywords, vec!["script".to_string()]);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.config_path, path);
        assert_eq!(config.data_dir, dir.path());
        assert!(config.channels_config.telegram.is_some());
    }

    #[test]
    fn load_from_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[agent]\ncontext_window = 0\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let mut config = Config {
            config_path: dir.path().join("config.toml"),
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        config.gateway.port = 9123;
        config.save().unwrap();

        let loaded = Config::load_from(&config.config_path).unwrap();
        assert_eq!(loaded.gateway.port, 9123);
    }
}
