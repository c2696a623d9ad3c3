//! Special commands parser for the interactive chat shell
//!
//! Special commands manage conversations and model parameters instead
//! of being sent to the model. They are prefixed with `/` and are
//! case-insensitive; `exit` and `quit` also work without the slash.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq)]
pub enum SpecialCommand {
    /// Start a new conversation and make it current
    NewConversation,

    /// List all conversations, newest first
    ListConversations,

    /// Make another conversation current
    ///
    /// The argument is a 1-based position in the list or a conversation id.
    SwitchConversation(String),

    /// Delete a conversation; `None` deletes the current one
    DeleteConversation(Option<String>),

    /// Reprint the messages of the current conversation
    ShowHistory,

    /// Switch to a different model
    SwitchModel(String),

    /// Print the selectable models
    ListModels,

    /// Change the sampling temperature
    SetTemperature(f32),

    /// Change the maximum response length
    SetMaxTokens(u32),

    /// Show model parameters and current conversation stats
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

fn missing(command: &str, usage: &str) -> CommandError {
    CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    }
}

fn unsupported(command: &str, arg: &str) -> CommandError {
    CommandError::UnsupportedArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    }
}

/// Parse a user input string into a special command
///
/// Returns `Ok(SpecialCommand::None)` for regular chat text.
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if the input starts with `/` but
/// is not a known command, `CommandError::MissingArgument` if a required
/// argument is absent, and `CommandError::UnsupportedArgument` if an
/// argument cannot be parsed.
///
/// # Examples
///
/// ```
/// use threadchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewConversation);
/// assert_eq!(
///     parse_special_command("/switch 2").unwrap(),
///     SpecialCommand::SwitchConversation("2".to_string())
/// );
/// assert_eq!(parse_special_command("hello").unwrap(), SpecialCommand::None);
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    // Only the command word is case-folded; conversation ids are matched exactly.
    let (head, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, Some(rest.trim()).filter(|a| !a.is_empty())),
        None => (trimmed, None),
    };
    let command = head.to_lowercase();
    let command = command.as_str();

    match (command, arg) {
        ("/new", None) => Ok(SpecialCommand::NewConversation),
        ("/list" | "/chats", None) => Ok(SpecialCommand::ListConversations),

        ("/switch" | "/select", Some(target)) => {
            Ok(SpecialCommand::SwitchConversation(target.to_string()))
        }
        ("/switch" | "/select", None) => Err(missing(command, "/switch <number|id>")),

        ("/delete", target) => Ok(SpecialCommand::DeleteConversation(
            target.map(str::to_string),
        )),

        ("/history", None) => Ok(SpecialCommand::ShowHistory),

        ("/model", Some(model)) => Ok(SpecialCommand::SwitchModel(model.to_lowercase())),
        ("/model", None) => Err(missing("/model", "/model <name>")),
        ("/models", None) => Ok(SpecialCommand::ListModels),

        ("/temperature" | "/temp", Some(value)) => value
            .parse::<f32>()
            .map(SpecialCommand::SetTemperature)
            .map_err(|_| unsupported("/temperature", value)),
        ("/temperature" | "/temp", None) => {
            Err(missing("/temperature", "/temperature <0.0-1.0>"))
        }

        ("/max-tokens" | "/max_tokens", Some(value)) => value
            .parse::<u32>()
            .map(SpecialCommand::SetMaxTokens)
            .map_err(|_| unsupported("/max-tokens", value)),
        ("/max-tokens" | "/max_tokens", None) => {
            Err(missing("/max-tokens", "/max-tokens <50-2000>"))
        }

        ("/status", None) => Ok(SpecialCommand::ShowStatus),
        ("/help" | "/?", None) => Ok(SpecialCommand::Help),
        ("exit" | "quit" | "/exit" | "/quit", None) => Ok(SpecialCommand::Exit),

        (
            "/new" | "/list" | "/chats" | "/history" | "/models" | "/status" | "/help" | "/?"
            | "/exit" | "/quit",
            Some(extra),
        ) => Err(unsupported(command, extra)),

        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Help text for the special commands
pub const HELP_TEXT: &str = r#"
Special Commands for Interactive Chat
=====================================

CONVERSATIONS:
  /new              - Start a new conversation
  /list             - List conversations, newest first; conversations
                      created in the same second list the later one first
  /switch <n|id>    - Switch to conversation number n from /list, or by id
  /delete [n|id]    - Delete a conversation (default: the current one)
  /history          - Show the messages of the current conversation

MODEL SETTINGS:
  /models           - Show the selectable models
  /model <name>     - Switch to a different model
  /temperature <f>  - Set temperature (0.0-1.0, lower = more focused)
  /max-tokens <n>   - Set maximum response length (50-2000 tokens)

SESSION:
  /status           - Show settings and current conversation stats
  /help             - Show this help message
  /?                - Same as /help
  exit              - Exit the chat
  quit              - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the model
  - Conversations live only as long as this session
  - /switch and /delete numbers refer to the order shown by /list
"#;

/// Display help information for the special commands
pub fn print_help() {
    println!("{}", HELP_TEXT);
}
