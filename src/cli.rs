//! Command-line interface definition for Threadchat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat shell, a one-shot question mode,
//! and the model listing.

use clap::{Parser, Subcommand};

/// Threadchat - terminal chat client for OpenAI-compatible APIs
///
/// Keeps several conversation threads in memory for the duration of
/// a session and forwards each message to the configured model.
#[derive(Parser, Debug, Clone)]
#[command(name = "threadchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the model (gpt-4o, gpt-4-turbo, gpt-4, gpt-3.5-turbo)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Override the sampling temperature (0.0-1.0)
    #[arg(short, long, global = true)]
    pub temperature: Option<f32>,

    /// Override the maximum response length in tokens (50-2000)
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,

    /// Command to execute (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for Threadchat
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat shell
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to send
        #[arg(required = true)]
        question: Vec<String>,
    },

    /// List the models that can be selected
    Models,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The command to run, falling back to the chat shell
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            model: None,
            temperature: None,
            max_tokens: None,
            command: None,
        }
    }
}
