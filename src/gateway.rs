//! Completion gateway
//!
//! Builds the prompt for one user question and calls the provider.
//! Provider failures never escape: they are turned into an `Error: `
//! reply so the chat flow stays linear.

use crate::config::ChatConfig;
use crate::providers::{CompletionRequest, Message, Provider};
use crate::session::ChatMessage;

/// Instruction sent as the first message of every request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant. Please respond to the user queries.";

/// Number of most recent history messages included in a request
pub const HISTORY_WINDOW: usize = 10;

/// Hint appended to every error reply
pub const ERROR_HINT: &str = "Please check your API key and try again.";

/// Model parameters for one completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionParams {
    /// Model name
    pub model: String,
    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,
    /// Maximum tokens to generate (50-2000)
    pub max_tokens: u32,
}

impl From<&ChatConfig> for CompletionParams {
    fn from(config: &ChatConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Build the prompt messages for `question`
///
/// The result is the system instruction, then at most the last
/// [`HISTORY_WINDOW`] history messages, then the question itself.
///
/// # Examples
///
/// ```
/// use threadchat::gateway::build_messages;
/// use threadchat::session::ChatMessage;
///
/// let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
/// let messages = build_messages("What is 2+2?", Some(history.as_slice()));
/// assert_eq!(messages.len(), 4);
/// assert_eq!(messages[3].content, "Question: What is 2+2?");
/// ```
pub fn build_messages(question: &str, history: Option<&[ChatMessage]>) -> Vec<Message> {
    let history = history.unwrap_or_default();
    let recent = &history[history.len().saturating_sub(HISTORY_WINDOW)..];

    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(Message::system(SYSTEM_PROMPT));
    messages.extend(recent.iter().map(ChatMessage::to_prompt_message));
    messages.push(Message::user(format!("Question: {}", question)));
    messages
}

/// Format a provider failure as an assistant reply
///
/// # Examples
///
/// ```
/// use threadchat::gateway::error_reply;
///
/// let reply = error_reply(&anyhow::anyhow!("timed out"));
/// assert_eq!(reply, "Error: timed out. Please check your API key and try again.");
/// ```
pub fn error_reply(error: &anyhow::Error) -> String {
    format!("Error: {}. {}", error, ERROR_HINT)
}

/// Stateless front of the completion provider
pub struct CompletionGateway {
    provider: Box<dyn Provider>,
}

impl CompletionGateway {
    /// Wraps a provider
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Answer `question` in the context of `history`
    ///
    /// `history` should not contain `question` itself. Never fails: any
    /// provider error is returned as text starting with `Error: `.
    pub async fn respond(
        &self,
        question: &str,
        api_key: &str,
        params: &CompletionParams,
        history: Option<&[ChatMessage]>,
    ) -> String {
        let request = CompletionRequest {
            model: params.model.clone(),
            messages: build_messages(question, history),
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        tracing::info!(
            "Requesting completion from {} ({} prompt messages)",
            self.provider.name(),
            request.messages.len()
        );

        match self.provider.complete(api_key, &request).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("Completion failed, returning error reply: {:#}", e);
                error_reply(&e)
            }
        }
    }
}
