//! Session-scoped conversation store
//!
//! Holds every conversation of the running session in insertion order,
//! the pointer to the current conversation, and the counter used to
//! build identifiers. Mutation goes through the conversation manager
//! operations in [`super::manager`].

use super::conversation::{Conversation, ConversationId};
use indexmap::IndexMap;

/// In-memory store for one interactive session
///
/// The current id is always `None` or a key of `conversations`.
#[derive(Debug, Default)]
pub struct SessionStore {
    pub(super) conversations: IndexMap<ConversationId, Conversation>,
    pub(super) current: Option<ConversationId>,
    pub(super) counter: u64,
}

impl SessionStore {
    /// Creates an empty store
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::session::SessionStore;
    ///
    /// let store = SessionStore::new();
    /// assert!(store.is_empty());
    /// assert!(store.current_id().is_none());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the current conversation
    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The current conversation, if any
    pub fn current(&self) -> Option<&Conversation> {
        self.current
            .as_ref()
            .and_then(|id| self.conversations.get(id))
    }

    /// Looks up a conversation by id
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.get(id)
    }

    /// Whether `id` is in the store
    pub fn contains(&self, id: &str) -> bool {
        self.conversations.contains_key(id)
    }

    /// Conversations in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.values()
    }

    /// Number of conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the store holds no conversation
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Last counter value handed out
    pub fn counter(&self) -> u64 {
        self.counter
    }
}
