use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "memory" | "sqlite" | "supabase"
    #[serde(default = "default_store_backend")]
    pub backend: String,
    /// SQLite file, relative paths resolve under the data directory
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
    #[serde(default)]
    pub supabase: SupabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_conversations_table")]
    pub conversations_table: String,
    #[serde(default = "default_feedback_table")]
    pub feedback_table: String,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            key: None,
            conversations_table: default_conversations_table(),
            feedback_table: default_feedback_table(),
        }
    }
}

fn default_store_backend() -> String {
    "sqlite".into()
}

fn default_sqlite_path() -> String {
    "conversations.db".into()
}

fn default_conversations_table() -> String {
    "conversations".into()
}

fn default_feedback_table() -> String {
    "feedback".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            sqlite_path: default_sqlite_path(),
            supabase: SupabaseConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supabase_tables_default_when_section_present() {
        let config: StoreConfig = toml::from_str(
            "backend = \"supabase\"\n[supabase]\nurl = \"https://x.supabase.co\"\nkey = \"k\"",
        )
        .unwrap();
        assert_eq!(config.backend, "supabase");
        assert_eq!(config.supabase.conversations_table, "conversations");
        assert_eq!(config.supabase.feedback_table, "feedback");
    }
}
