/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `chat`   - Interactive chat shell with conversation threads
- `ask`    - Answer a single question and exit
- `models` - Print the selectable models

The handlers only wire together the library components: configuration,
the provider, the completion gateway and the chat session.
*/

use crate::chat_session::{ChatSession, SendOutcome};
use crate::config::{api_key_from_env, Config};
use crate::error::Result;
use crate::gateway::{CompletionGateway, CompletionParams};
use crate::providers::create_provider;
use colored::Colorize;

// Masked API key prompt
pub mod api_key_prompt;

// Conversation list and message history rendering
pub mod history;

// Model listing
pub mod models;

// Special commands parser for the chat shell
pub mod special_commands;

/// Build a session from configuration, picking up the API key from the environment
fn build_session(config: &Config) -> Result<ChatSession> {
    let provider = create_provider(&config.provider)?;
    let mut session = ChatSession::new(
        CompletionGateway::new(provider),
        CompletionParams::from(&config.chat),
    );

    if let Some((key, source)) = api_key_from_env(&config.provider.openai) {
        session.set_api_key(key, source);
    }

    Ok(session)
}

fn print_missing_key_warning(config: &Config) {
    println!(
        "{}",
        format!(
            "No API key available. Set {} to send messages.",
            config.provider.openai.api_key_env
        )
        .yellow()
    );
}

// Chat command handler
pub mod chat {
    //! Interactive chat shell.
    //!
    //! Owns one [`ChatSession`] and runs a readline loop: slash commands
    //! manage conversations and parameters, everything else is sent to
    //! the current conversation.

    use super::*;
    use crate::commands::api_key_prompt::read_masked;
    use crate::commands::history::{print_conversation_list, print_history};
    use crate::commands::special_commands::{
        parse_special_command, print_help, CommandError, SpecialCommand,
    };
    use crate::config::ApiKeySource;
    use crate::error::ThreadchatError;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start the interactive chat shell
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration (consumed)
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::commands::chat;
    /// use threadchat::config::Config;
    ///
    /// // In application code:
    /// // chat::run_chat(Config::default()).await?;
    /// ```
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat shell");

        let mut session = build_session(&config)?;
        if session.api_key_source().is_none() {
            prompt_for_api_key(&mut session, &config.provider.openai.api_key_env)?;
        }

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner(&session);

        loop {
            let prompt = format_prompt(&mut session);
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(e) => {
                            print_command_error(&e);
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            if let Err(e) = send_message(&mut session, &config, trimmed).await {
                                println!("{}", format!("{:#}", e).red());
                            }
                        }
                        command => {
                            if let Err(e) = handle_special_command(&mut session, command) {
                                println!("{}", format!("{}\n", e).red());
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Ask once for an API key; a blank answer leaves the session without one
    fn prompt_for_api_key(session: &mut ChatSession, env_var: &str) -> Result<()> {
        println!("{}", format!("{} is not set.", env_var).yellow());
        match read_masked("Enter your OpenAI API key (leave blank to skip): ")? {
            Some(key) => session.set_api_key(key, ApiKeySource::Prompt),
            None => tracing::info!("Continuing without an API key"),
        }
        Ok(())
    }

    /// Make sure a conversation is current and render its title as the prompt
    fn format_prompt(session: &mut ChatSession) -> String {
        let store = session.store_mut();
        let id = store.ensure_current();
        store.refresh_titles();

        let title = store
            .get(&id)
            .map(|c| c.title().to_string())
            .unwrap_or_default();
        format!("[{}] >> ", title.cyan())
    }

    async fn send_message(session: &mut ChatSession, config: &Config, input: &str) -> Result<()> {
        match session.send(input).await? {
            SendOutcome::Ignored => {}
            SendOutcome::MissingApiKey => print_missing_key_warning(config),
            SendOutcome::Replied { reply, .. } => {
                let reply = if reply.starts_with("Error: ") {
                    reply.red().to_string()
                } else {
                    reply
                };
                println!("\n{}\n", reply);
            }
        }
        Ok(())
    }

    /// Apply a special command other than `Exit` and `None`
    ///
    /// Errors (unknown conversation, out-of-range parameter) are returned
    /// for the caller to print; they never end the session.
    pub fn handle_special_command(
        session: &mut ChatSession,
        command: SpecialCommand,
    ) -> Result<()> {
        match command {
            SpecialCommand::NewConversation => {
                let id = session.store_mut().create();
                println!("{}", format!("Started conversation {}\n", id).green());
            }
            SpecialCommand::ListConversations => {
                print_conversation_list(&session.store().list());
            }
            SpecialCommand::SwitchConversation(target) => {
                let id = session.store().resolve(&target)?;
                session.store_mut().select(&id)?;
                let title = session
                    .store()
                    .current()
                    .map(|c| c.title().to_string())
                    .unwrap_or_default();
                println!("{}", format!("Switched to \"{}\"\n", title).green());
            }
            SpecialCommand::DeleteConversation(target) => {
                let id = match target {
                    Some(target) => session.store().resolve(&target)?,
                    None => session
                        .store()
                        .current_id()
                        .map(str::to_string)
                        .ok_or_else(|| {
                            ThreadchatError::ConversationNotFound("(no current conversation)".into())
                        })?,
                };
                let removed = session.store_mut().delete(&id)?;
                println!("{}", format!("Deleted \"{}\"\n", removed.title()).green());
            }
            SpecialCommand::ShowHistory => match session.store().current() {
                Some(conversation) => print_history(conversation),
                None => println!("{}", "No current conversation.".yellow()),
            },
            SpecialCommand::SwitchModel(model) => {
                let old = session.params().model.clone();
                session.set_model(&model)?;
                println!("Switched from {} to {}\n", old, model.green());
            }
            SpecialCommand::ListModels => {
                super::models::list_models(&session.params().model);
            }
            SpecialCommand::SetTemperature(temperature) => {
                session.set_temperature(temperature)?;
                println!("Temperature set to {}\n", temperature.to_string().green());
            }
            SpecialCommand::SetMaxTokens(max_tokens) => {
                session.set_max_tokens(max_tokens)?;
                println!("Max tokens set to {}\n", max_tokens.to_string().green());
            }
            SpecialCommand::ShowStatus => print_status_display(session),
            SpecialCommand::Help => print_help(),
            SpecialCommand::Exit | SpecialCommand::None => {}
        }
        Ok(())
    }

    fn print_command_error(error: &CommandError) {
        println!("{}", format!("{}\n", error).red());
    }

    /// Display welcome banner with the current settings
    fn print_welcome_banner(session: &ChatSession) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║           Threadchat Interactive Chat - Welcome!             ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        print_settings(session);
        println!("\nType '/help' for available commands, 'exit' to quit\n");
    }

    fn print_settings(session: &ChatSession) {
        let params = session.params();
        let key = match session.api_key_source() {
            Some(source) => source.to_string().green(),
            None => "not set".yellow(),
        };
        println!("Model:       {}", params.model.cyan());
        println!("Temperature: {}", params.temperature);
        println!("Max tokens:  {}", params.max_tokens);
        println!("API key:     {}", key);
    }

    /// Display detailed status information about the current session
    ///
    /// Shows the model parameters and the stats of the current
    /// conversation. Called for the `/status` command.
    fn print_status_display(session: &ChatSession) {
        println!("\n{}", "Session Status".bold());
        println!("{}", "==============".bold());
        print_settings(session);
        println!("Conversations: {}", session.store().len());

        match session.store().current() {
            Some(conversation) => {
                println!("\n{}", "Current conversation".bold());
                println!("Title:    {}", conversation.title());
                println!("ID:       {}", conversation.id().cyan());
                println!("Messages: {}", conversation.len());
                println!(
                    "Created:  {}",
                    conversation.created_at().format("%Y-%m-%d %H:%M:%S")
                );
            }
            None => println!("\nNo current conversation."),
        }
        println!();
    }

}

// One-shot question handler
pub mod ask {
    //! Answer a single question in a fresh session.

    use super::*;
    use crate::error::ThreadchatError;

    /// Send `question` in a new conversation and print the reply
    ///
    /// # Errors
    ///
    /// Returns [`ThreadchatError::MissingCredentials`] if no API key is
    /// available from the environment. Completion failures are printed as
    /// an `Error: ` reply, like in the chat shell.
    pub async fn run_ask(config: Config, question: &str) -> Result<()> {
        tracing::info!("Answering a single question");

        let mut session = build_session(&config)?;
        match session.send(question).await? {
            SendOutcome::Ignored => {
                tracing::warn!("Empty question, nothing to send");
            }
            SendOutcome::MissingApiKey => {
                print_missing_key_warning(&config);
                return Err(ThreadchatError::MissingCredentials(format!(
                    "{} is not set",
                    config.provider.openai.api_key_env
                ))
                .into());
            }
            SendOutcome::Replied { reply, .. } => println!("{}", reply),
        }
        Ok(())
    }
}
