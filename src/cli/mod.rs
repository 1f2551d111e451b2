use chatrelay::commands::{AssistantCommands, TelegramCommands};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `chatrelay` - chat bot backend for LINE and Telegram.
#[derive(Parser, Debug)]
#[command(name = "chatrelay")]
#[command(version)]
#[command(about = "Intent-routing chat bot backend for LINE and Telegram.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.chatrelay/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the webhook gateway
    Serve {
        /// Port to listen on (use 0 for random available port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message through the pipeline and print the reply
    Chat {
        /// Conversation owner
        #[arg(short, long, default_value = "cli")]
        user: String,

        message: String,
    },

    /// Print the intent a message classifies to, as JSON
    Classify { message: String },

    /// Show configuration summary
    Status,

    /// Telegram bot management
    Telegram {
        #[command(subcommand)]
        telegram_command: TelegramCommands,
    },

    /// OpenAI assistant management
    Assistant {
        #[command(subcommand)]
        assistant_command: AssistantCommands,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_has_no_flag_conflicts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn chat_defaults_user() {
        let cli = Cli::try_parse_from(["chatrelay", "chat", "hello"]).unwrap();
        match cli.command {
            Commands::Chat { user, message } => {
                assert_eq!(user, "cli");
                assert_eq!(message, "hello");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["chatrelay", "serve", "--port", "0", "-v", "--config", "c.toml"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(cli.command, Commands::Serve { port: Some(0), host: None }));
    }

    #[test]
    fn assistant_create_requires_name_and_instructions() {
        assert!(Cli::try_parse_from(["chatrelay", "assistant", "create", "--name", "x"]).is_err());
        let cli = Cli::try_parse_from([
            "chatrelay",
            "assistant",
            "create",
            "--name",
            "helper",
            "--instructions",
            "be brief",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Assistant {
                assistant_command: AssistantCommands::Create { model: None, .. }
            }
        ));
    }

    #[test]
    fn telegram_set_webhook_url_is_optional() {
        let cli = Cli::try_parse_from(["chatrelay", "telegram", "set-webhook"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Telegram {
                telegram_command: TelegramCommands::SetWebhook { url: None }
            }
        ));
    }
}
