//! Threadchat - terminal chat client library
//!
//! This library provides the pieces behind the `threadchat` binary: an
//! in-memory store of conversation threads, a completion gateway that
//! builds prompts from bounded history, and an OpenAI-compatible provider.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Conversations, messages and the session store
//! - `gateway`: Prompt construction and error-as-reply handling
//! - `providers`: Provider abstraction and the OpenAI implementation
//! - `chat_session`: Shell-independent send flow and model parameters
//! - `commands`: Chat shell, one-shot and model listing handlers
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use threadchat::{ChatSession, CompletionGateway, CompletionParams, Config, SendOutcome};
//! use threadchat::config::ApiKeySource;
//! use threadchat::providers::create_provider;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.yaml", &Default::default())?;
//!     config.validate()?;
//!
//!     let provider = create_provider(&config.provider)?;
//!     let mut session = ChatSession::new(
//!         CompletionGateway::new(provider),
//!         CompletionParams::from(&config.chat),
//!     );
//!     session.set_api_key("sk-...", ApiKeySource::Prompt);
//!
//!     if let SendOutcome::Replied { reply, .. } = session.send("What is 2+2?").await? {
//!         println!("{}", reply);
//!     }
//!     Ok(())
//! }
//! ```

pub mod chat_session;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use chat_session::{ChatSession, SendOutcome};
pub use config::Config;
pub use error::{Result, ThreadchatError};
pub use gateway::{CompletionGateway, CompletionParams};
pub use session::{ChatMessage, Conversation, ConversationId, Role, SessionStore};
