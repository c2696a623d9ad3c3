//! Threadchat - terminal chat client
//!
#![doc = "Threadchat - terminal chat client"]
#![doc = "Main entry point for the threadchat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use threadchat::cli::{Cli, Commands};
use threadchat::commands;
use threadchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Pick up OPENAI_API_KEY and overrides from a local .env file
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command() {
        Commands::Chat => {
            tracing::info!("Starting interactive chat mode");
            commands::chat::run_chat(config).await?;
            Ok(())
        }
        Commands::Ask { question } => {
            let question = question.join(" ");
            tracing::debug!("Question: {}", question);
            commands::ask::run_ask(config, &question).await?;
            Ok(())
        }
        Commands::Models => {
            commands::models::list_models(&config.chat.model);
            Ok(())
        }
    }
}

/// Initialize tracing subscriber
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "threadchat=debug"
    } else {
        "threadchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
