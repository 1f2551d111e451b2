use crate::cli::{Cli, Commands};
use anyhow::{Context, Result, bail};
use chatrelay::Config;
use chatrelay::agent::{AgentManager, IntentClassifier, MessagePipeline};
use chatrelay::channels::TelegramChannel;
use chatrelay::commands::{AssistantCommands, TelegramCommands};
use chatrelay::store::create_store;
use chatrelay::tools::{OpenAiAssistant, create_tools};
use std::sync::Arc;
use tracing::info;

use crate::app::status::render_status;

async fn run_chat(config: &Config, locale: &str, user: &str, message: &str) -> Result<()> {
    let store = create_store(config).await?;
    let tools = create_tools(&config.tools);
    let agent = AgentManager::from_config(config, tools, locale).context("build agent")?;
    let pipeline = MessagePipeline::new(Arc::new(agent), store);

    let reply = pipeline.handle(user, message).await;
    println!("{reply}");
    Ok(())
}

fn run_classify(config: &Config, message: &str) -> Result<()> {
    let classifier = IntentClassifier::with_extra_keywords(&config.agent.extra_tool_keywords)?;
    let intent = classifier.classify(message, &[]);
    println!("{}", serde_json::to_string_pretty(&intent)?);
    Ok(())
}

async fn run_telegram(config: &Config, command: TelegramCommands) -> Result<()> {
    let Some(telegram) = config.channels_config.telegram.as_ref() else {
        bail!("Telegram is not configured. Set [channels_config.telegram] bot_token or TELEGRAM_BOT_TOKEN.");
    };

    match command {
        TelegramCommands::SetWebhook { url } => {
            let Some(base_url) = url.or_else(|| telegram.webhook_url.clone()) else {
                bail!("No webhook URL. Pass --url or set TELEGRAM_WEBHOOK_URL.");
            };
            let channel = TelegramChannel::new(telegram.bot_token.clone());
            channel.set_webhook(&base_url).await?;
            println!("Webhook registered: {}/webhook/<token>", base_url.trim_end_matches('/'));
            Ok(())
        }
    }
}

async fn run_assistant(config: &Config, command: AssistantCommands) -> Result<()> {
    let Some(client) = OpenAiAssistant::from_config(&config.tools.openai) else {
        bail!("OpenAI API key not set. Set [tools.openai] api_key or OPENAI_API_KEY.");
    };

    match command {
        AssistantCommands::Create {
            name,
            instructions,
            model,
        } => {
            let id = client
                .create_assistant(&name, &instructions, model.as_deref())
                .await?;
            println!("Created assistant {id}");
            println!("Set [tools.openai] assistant_id or OPENAI_ASSISTANT_ID to use it.");
        }
        AssistantCommands::List => {
            let assistants = client.list_assistants().await?;
            if assistants.is_empty() {
                println!("No assistants.");
            }
            for assistant in assistants {
                println!(
                    "{}  {}  {}",
                    assistant.id,
                    assistant.name.as_deref().unwrap_or("(unnamed)"),
                    assistant.model
                );
            }
        }
        AssistantCommands::Get { id } => {
            let assistant = client.get_assistant(&id).await?;
            println!("Id:           {}", assistant.id);
            println!(
                "Name:         {}",
                assistant.name.as_deref().unwrap_or("(unnamed)")
            );
            println!("Model:        {}", assistant.model);
            println!("Created:      {}", assistant.created_at);
            if let Some(instructions) = assistant.instructions.as_deref() {
                println!("Instructions: {instructions}");
            }
        }
        AssistantCommands::Delete { id } => {
            if client.delete_assistant(&id).await? {
                println!("Deleted assistant {id}");
            } else {
                bail!("Assistant {id} was not deleted");
            }
        }
    }
    Ok(())
}

pub async fn dispatch(cli: Cli, config: Arc<Config>, locale: String) -> Result<()> {
    match cli.command {
        Commands::Serve { port, host } => {
            let port = port.unwrap_or(config.gateway.port);
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            if port == 0 {
                info!("Starting chatrelay gateway on {host} (random port)");
            } else {
                info!("Starting chatrelay gateway on {host}:{port}");
            }
            chatrelay::gateway::run_gateway(&host, port, Arc::clone(&config), &locale).await
        }

        Commands::Chat { user, message } => run_chat(&config, &locale, &user, &message).await,

        Commands::Classify { message } => run_classify(&config, &message),

        Commands::Status => {
            println!("{}", render_status(&config, &locale));
            Ok(())
        }

        Commands::Telegram { telegram_command } => run_telegram(&config, telegram_command).await,

        Commands::Assistant { assistant_command } => {
            run_assistant(&config, assistant_command).await
        }
    }
}
