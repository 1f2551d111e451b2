//! Subcommand groups shared by the binary's command line.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TelegramCommands {
    /// Register `<url>/webhook/<token>` with the Bot API
    SetWebhook {
        /// Public base URL (default: [channels_config.telegram].webhook_url)
        #[arg(long)]
        url: Option<String>,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AssistantCommands {
    /// Create an assistant with the code interpreter tool
    Create {
        #[arg(long)]
        name: String,

        /// System instructions for the assistant
        #[arg(long)]
        instructions: String,

        /// Model (default: [tools.openai].model)
        #[arg(long)]
        model: Option<String>,
    },
    /// List assistants on the account
    List,
    /// Show one assistant
    Get { id: String },
    /// Delete an assistant
    Delete { id: String },
}
