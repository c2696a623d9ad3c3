//! Conversation manager operations on the session store
//!
//! Create, select, delete, append to and list conversations. These are
//! the only operations that mutate a [`SessionStore`].

use super::conversation::{ChatMessage, Conversation, ConversationId};
use super::store::SessionStore;
use crate::error::{Result, ThreadchatError};
use chrono::{DateTime, Local};

/// Read-only view of one conversation for list rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    /// Conversation identifier
    pub id: ConversationId,
    /// Current title
    pub title: String,
    /// Creation time
    pub created_at: DateTime<Local>,
    /// Number of messages
    pub message_count: usize,
    /// Whether this is the current conversation
    pub is_current: bool,
}

impl SessionStore {
    /// Creates an empty conversation and makes it current
    ///
    /// The id is `chat_<counter>_<YYYYMMDD_HHMMSS>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::session::SessionStore;
    ///
    /// let mut store = SessionStore::new();
    /// let id = store.create();
    /// assert!(id.starts_with("chat_1_"));
    /// assert_eq!(store.current_id(), Some(id.as_str()));
    /// ```
    pub fn create(&mut self) -> ConversationId {
        self.create_at(Local::now())
    }

    fn create_at(&mut self, now: DateTime<Local>) -> ConversationId {
        self.counter += 1;
        let id = format!("chat_{}_{}", self.counter, now.format("%Y%m%d_%H%M%S"));
        self.conversations
            .insert(id.clone(), Conversation::new(id.clone(), self.counter, now));
        self.current = Some(id.clone());
        tracing::info!("Created conversation {}", id);
        id
    }

    /// Makes `id` the current conversation
    ///
    /// # Errors
    ///
    /// Returns [`ThreadchatError::ConversationNotFound`] if `id` is unknown;
    /// the current conversation is left unchanged
    pub fn select(&mut self, id: &str) -> Result<()> {
        if !self.conversations.contains_key(id) {
            tracing::warn!("Cannot select unknown conversation {}", id);
            return Err(ThreadchatError::ConversationNotFound(id.to_string()).into());
        }
        self.current = Some(id.to_string());
        tracing::debug!("Selected conversation {}", id);
        Ok(())
    }

    /// Removes `id` and returns the removed conversation
    ///
    /// If it was current, the first remaining conversation in insertion
    /// order becomes current, or none if the store is now empty.
    ///
    /// # Errors
    ///
    /// Returns [`ThreadchatError::ConversationNotFound`] if `id` is unknown
    pub fn delete(&mut self, id: &str) -> Result<Conversation> {
        let removed = self
            .conversations
            .shift_remove(id)
            .ok_or_else(|| ThreadchatError::ConversationNotFound(id.to_string()))?;

        if self.current.as_deref() == Some(id) {
            self.current = self.conversations.keys().next().cloned();
            tracing::debug!("Current conversation is now {:?}", self.current);
        }

        tracing::info!("Deleted conversation {}", id);
        Ok(removed)
    }

    /// Returns the current conversation id, creating a conversation first
    /// when there is none
    pub fn ensure_current(&mut self) -> ConversationId {
        match &self.current {
            Some(id) => id.clone(),
            None => self.create(),
        }
    }

    /// Appends a message to `id` and refreshes its title
    ///
    /// # Errors
    ///
    /// Returns [`ThreadchatError::ConversationNotFound`] if `id` is unknown
    pub fn append(&mut self, id: &str, message: ChatMessage) -> Result<()> {
        let conversation = self
            .conversations
            .get_mut(id)
            .ok_or_else(|| ThreadchatError::ConversationNotFound(id.to_string()))?;
        conversation.push(message);
        Ok(())
    }

    /// Recomputes stale titles of every conversation
    ///
    /// Returns the number of titles that changed.
    pub fn refresh_titles(&mut self) -> usize {
        self.conversations
            .values_mut()
            .map(|c| c.refresh_title())
            .filter(|changed| *changed)
            .count()
    }

    /// Summaries of all conversations, newest first
    ///
    /// Conversations created within the same second are ordered by their
    /// counter value, newest first.
    pub fn list(&self) -> Vec<ConversationSummary> {
        let mut conversations: Vec<&Conversation> = self.conversations.values().collect();
        conversations.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.sequence().cmp(&a.sequence()))
        });

        conversations
            .into_iter()
            .map(|c| ConversationSummary {
                id: c.id().to_string(),
                title: c.title().to_string(),
                created_at: c.created_at(),
                message_count: c.len(),
                is_current: self.current.as_deref() == Some(c.id()),
            })
            .collect()
    }

    /// Resolves a 1-based position in [`SessionStore::list`] or a literal id
    ///
    /// # Errors
    ///
    /// Returns [`ThreadchatError::ConversationNotFound`] if neither matches
    pub fn resolve(&self, reference: &str) -> Result<ConversationId> {
        if self.conversations.contains_key(reference) {
            return Ok(reference.to_string());
        }
        if let Ok(position) = reference.parse::<usize>() {
            if let Some(summary) = position
                .checked_sub(1)
                .and_then(|index| self.list().into_iter().nth(index))
            {
                return Ok(summary.id);
            }
        }
        Err(ThreadchatError::ConversationNotFound(reference.to_string()).into())
    }
}
