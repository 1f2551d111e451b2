use super::Config;

fn detect_system_locale(lookup: &impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup("LANG")
        .or_else(|| lookup("LC_MESSAGES"))
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty())
}

/// Detect locale: `CHATRELAY_LANG` env -> config value -> system `LANG` -> `"en"`.
fn detect_locale(config_locale: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    if let Some(lang) = lookup("CHATRELAY_LANG") {
        let lang = lang.trim().to_lowercase();
        if !lang.is_empty() {
            return normalise_locale(&lang);
        }
    }

    if config_locale != "en" && !config_locale.is_empty() {
        return normalise_locale(config_locale);
    }

    if let Some(system_locale) = detect_system_locale(&lookup) {
        return normalise_locale(&system_locale);
    }

    "en".into()
}

/// Normalise `"ja_JP.UTF-8"` -> `"ja"`, `"en_US"` -> `"en"`, passthrough `"ja"`.
pub(crate) fn normalise_locale(raw: &str) -> String {
    let base = raw.split('.').next().unwrap_or(raw);
    let lang = base.split('_').next().unwrap_or(base);
    match lang {
        "" | "c" | "posix" => "en".to_string(),
        other => other.to_string(),
    }
}

impl Config {
    /// Resolve the reply locale for this process.
    pub fn resolved_locale(&self) -> String {
        detect_locale(&self.locale, |key| std::env::var(key).ok())
    }

    /// Detect locale from env -> config -> system, then set `rust_i18n::set_locale`.
    pub fn apply_locale(&self) -> String {
        let locale = self.resolved_locale();
        rust_i18n::set_locale(&locale);
        locale
    }
}
