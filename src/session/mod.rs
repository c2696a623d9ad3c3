//! Session state for the chat shell
//!
//! - `conversation`: conversation and message records, title derivation
//! - `store`: the in-memory store of one session
//! - `manager`: create/select/delete/list operations on the store

pub mod conversation;
pub mod manager;
pub mod store;

pub use conversation::{
    derive_title, ChatMessage, Conversation, ConversationId, Role, DEFAULT_TITLE, TITLE_MAX_CHARS,
};
pub use manager::ConversationSummary;
pub use store::SessionStore;
