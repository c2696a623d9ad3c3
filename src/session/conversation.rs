//! Conversation records and title derivation
//!
//! A conversation is an append-only thread of user and assistant
//! messages. Its title is derived from the first user message.

use crate::providers::{Message, MessageRole};
use chrono::{DateTime, Local};
use std::fmt;

/// Title shown for a conversation without any user message
pub const DEFAULT_TITLE: &str = "New Chat";

/// Number of characters of the first user message kept in a title
pub const TITLE_MAX_CHARS: usize = 50;

/// Identifier of a conversation within one session
pub type ConversationId = String;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The person at the keyboard
    User,
    /// The model (including error replies)
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }
}

/// One turn of a conversation
///
/// Fields are private so a message cannot change after it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    role: Role,
    content: String,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    /// Creates a message stamped with the current local time
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }

    /// Creates a user message
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::session::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("hi");
    /// assert_eq!(msg.role(), Role::User);
    /// assert_eq!(msg.content(), "hi");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Role of the author
    pub fn role(&self) -> Role {
        self.role
    }

    /// Message text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the message was appended
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Prompt form of this message for the completion API
    pub fn to_prompt_message(&self) -> Message {
        Message::new(self.role.into(), self.content.clone())
    }
}

/// A named, ordered thread of messages
#[derive(Debug, Clone)]
pub struct Conversation {
    id: ConversationId,
    sequence: u64,
    created_at: DateTime<Local>,
    title: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Creates an empty conversation
    ///
    /// `sequence` is the session counter value the id was built from; the
    /// provisional title is `New Chat <sequence>`.
    pub fn new(id: impl Into<ConversationId>, sequence: u64, created_at: DateTime<Local>) -> Self {
        Self {
            id: id.into(),
            sequence,
            created_at,
            title: format!("{} {}", DEFAULT_TITLE, sequence),
            messages: Vec::new(),
        }
    }

    /// Conversation identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Counter value assigned at creation
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Messages in insertion order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether no message has been appended yet
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Appends a message and refreshes the title
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.refresh_title();
    }

    /// Recomputes the title from the messages if it is stale
    ///
    /// A conversation without messages keeps its provisional title.
    /// Returns `true` when the title changed.
    pub fn refresh_title(&mut self) -> bool {
        if self.messages.is_empty() {
            return false;
        }
        let derived = derive_title(&self.messages);
        if derived == self.title {
            return false;
        }
        tracing::debug!("Conversation {} retitled to {:?}", self.id, derived);
        self.title = derived;
        true
    }
}

/// Derive a title from the first user message
///
/// Keeps the first [`TITLE_MAX_CHARS`] characters and appends `...`
/// when the message was longer. Returns [`DEFAULT_TITLE`] when there is
/// no user message.
///
/// # Examples
///
/// ```
/// use threadchat::session::{derive_title, ChatMessage};
///
/// assert_eq!(derive_title(&[]), "New Chat");
/// assert_eq!(derive_title(&[ChatMessage::user("hi")]), "hi");
/// ```
pub fn derive_title(messages: &[ChatMessage]) -> String {
    let Some(first) = messages.iter().find(|m| m.role() == Role::User) else {
        return DEFAULT_TITLE.to_string();
    };
    let content = first.content();
    if content.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
