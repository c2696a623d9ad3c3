//! Chat session state shared by the interactive shell and one-shot mode
//!
//! A [`ChatSession`] owns the conversation store, the completion
//! gateway, the current model parameters and the API key. The shell
//! passes it by `&mut` to each handler; there is no global state.

use crate::config::{self, ApiKeySource};
use crate::error::Result;
use crate::gateway::{CompletionGateway, CompletionParams};
use crate::session::{ChatMessage, ConversationId, SessionStore};

/// Result of sending one line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank; nothing happened
    Ignored,
    /// No API key is known; nothing was appended or sent
    MissingApiKey,
    /// The question and the reply were appended to the conversation
    Replied {
        /// Conversation the exchange was appended to
        conversation_id: ConversationId,
        /// Assistant reply (may be an `Error: ` reply)
        reply: String,
    },
}

/// State of one interactive session
pub struct ChatSession {
    store: SessionStore,
    gateway: CompletionGateway,
    params: CompletionParams,
    api_key: Option<(String, ApiKeySource)>,
}

impl ChatSession {
    /// Creates a session with an empty store and no API key
    pub fn new(gateway: CompletionGateway, params: CompletionParams) -> Self {
        Self {
            store: SessionStore::new(),
            gateway,
            params,
            api_key: None,
        }
    }

    /// Conversation store (read-only, for rendering)
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Conversation store (for create/select/delete)
    pub fn store_mut(&mut self) -> &mut SessionStore {
        &mut self.store
    }

    /// Current model parameters
    pub fn params(&self) -> &CompletionParams {
        &self.params
    }

    /// Sets the API key used for subsequent messages
    ///
    /// A blank key clears it.
    pub fn set_api_key(&mut self, key: impl Into<String>, source: ApiKeySource) {
        let key = key.into();
        if key.trim().is_empty() {
            self.api_key = None;
        } else {
            tracing::info!("API key set from {}", source);
            self.api_key = Some((key.trim().to_string(), source));
        }
    }

    /// Where the API key came from, if one is set
    pub fn api_key_source(&self) -> Option<&ApiKeySource> {
        self.api_key.as_ref().map(|(_, source)| source)
    }

    /// Switches the model
    ///
    /// # Errors
    ///
    /// Returns error if `model` is not in the allow-list
    pub fn set_model(&mut self, model: &str) -> Result<()> {
        config::validate_model(model)?;
        tracing::info!("Model switched from {} to {}", self.params.model, model);
        self.params.model = model.to_string();
        Ok(())
    }

    /// Changes the sampling temperature
    ///
    /// # Errors
    ///
    /// Returns error if `temperature` is outside 0.0..=1.0
    pub fn set_temperature(&mut self, temperature: f32) -> Result<()> {
        config::validate_temperature(temperature)?;
        self.params.temperature = temperature;
        Ok(())
    }

    /// Changes the response length cap
    ///
    /// # Errors
    ///
    /// Returns error if `max_tokens` is outside 50..=2000
    pub fn set_max_tokens(&mut self, max_tokens: u32) -> Result<()> {
        config::validate_max_tokens(max_tokens)?;
        self.params.max_tokens = max_tokens;
        Ok(())
    }

    /// Sends one line of user input to the current conversation
    ///
    /// Creates a conversation first if there is none. The previous
    /// messages of the conversation are passed as history. A failed
    /// completion still produces a reply (starting with `Error: `) that
    /// is appended like any other.
    pub async fn send(&mut self, input: &str) -> Result<SendOutcome> {
        let question = input.trim();
        if question.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        let Some((api_key, _)) = self.api_key.as_ref() else {
            tracing::warn!("Message not sent: no API key available");
            return Ok(SendOutcome::MissingApiKey);
        };

        let conversation_id = self.store.ensure_current();
        self.store
            .append(&conversation_id, ChatMessage::user(question))?;

        let messages = self
            .store
            .get(&conversation_id)
            .map(|c| c.messages())
            .unwrap_or_default();
        let history = match messages.len() {
            0 | 1 => None,
            n => Some(&messages[..n - 1]),
        };

        let reply = self
            .gateway
            .respond(question, api_key, &self.params, history)
            .await;

        self.store
            .append(&conversation_id, ChatMessage::assistant(reply.clone()))?;

        Ok(SendOutcome::Replied {
            conversation_id,
            reply,
        })
    }
}
