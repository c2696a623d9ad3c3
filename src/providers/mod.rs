//! Provider module for Threadchat
//!
//! This module contains the completion provider abstraction and the
//! OpenAI-compatible implementation.

pub mod base;
pub mod openai;

pub use base::{CompletionRequest, Message, MessageRole, Provider};
pub use openai::OpenAiProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, ThreadchatError};

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
///
/// # Examples
///
/// ```
/// use threadchat::config::ProviderConfig;
/// use threadchat::providers::create_provider;
///
/// let provider = create_provider(&ProviderConfig::default()).unwrap();
/// assert_eq!(provider.name(), "openai");
/// ```
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    match config.provider_type.as_str() {
        "openai" => Ok(Box::new(OpenAiProvider::new(config.openai.clone())?)),
        other => Err(ThreadchatError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_provider_openai() {
        let provider = create_provider(&ProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_create_provider_unknown_type() {
        let config = ProviderConfig {
            provider_type: "azure".to_string(),
            ..Default::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("Unknown provider type: azure"));
    }
}
