//! Base provider trait and common request types for Threadchat
//!
//! This module defines the Provider trait that completion backends
//! implement, along with the prompt message and request structures
//! handed to them.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a prompt message as sent to the completion API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Fixed instruction framing the conversation
    System,
    /// Text typed by the user
    User,
    /// Text generated by the model
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Message structure for a completion request
///
/// # Examples
///
/// ```
/// use threadchat::providers::{Message, MessageRole};
///
/// let msg = Message::user("Hello, assistant!");
/// assert_eq!(msg.role, MessageRole::User);
/// assert_eq!(msg.content, "Hello, assistant!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new message with an explicit role
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Creates a new system message
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::providers::{Message, MessageRole};
    ///
    /// let msg = Message::system("You are a helpful assistant");
    /// assert_eq!(msg.role, MessageRole::System);
    /// ```
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

/// Everything a provider needs for one completion call, except the key
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model name, e.g. `gpt-4o`
    pub model: String,
    /// Ordered prompt messages
    pub messages: Vec<Message>,
    /// Sampling temperature (0.0-1.0)
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

/// Provider trait for completion backends
///
/// A provider turns an ordered list of prompt messages into a single
/// plain-text reply. The API key is passed per call because the chat
/// shell may learn it only after start-up.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes the prompt and returns the generated text
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer credential for the API
    /// * `request` - Model, parameters and prompt messages
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP call fails, the API answers with a
    /// non-success status, or the response cannot be parsed
    async fn complete(&self, api_key: &str, request: &CompletionRequest) -> Result<String>;

    /// Short name of the provider, used in logs
    fn name(&self) -> &str {
        "provider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("a").role, MessageRole::User);
        assert_eq!(Message::assistant("b").role, MessageRole::Assistant);
        assert_eq!(Message::system("c").role, MessageRole::System);
    }

    #[test]
    fn test_message_role_display() {
        assert_eq!(MessageRole::System.to_string(), "system");
        assert_eq!(MessageRole::User.to_string(), "user");
        assert_eq!(MessageRole::Assistant.to_string(), "assistant");
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
