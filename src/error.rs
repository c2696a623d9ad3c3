//! Error types for Threadchat
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Threadchat operations
///
/// Covers configuration loading, provider calls, session bookkeeping
/// and terminal input. Completion failures never reach the user through
/// this type directly: the gateway folds them into an `Error: ` reply.
#[derive(Error, Debug)]
pub enum ThreadchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (bad status, malformed body, unknown provider)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Authentication errors (401/403 from the completion API)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// No API key could be resolved
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// The requested conversation is not in the session store
    #[error("Conversation not found: {0}")]
    ConversationNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Terminal input errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Threadchat operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`ThreadchatError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ThreadchatError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_provider_error_display() {
        let error = ThreadchatError::Provider("API timeout".to_string());
        assert_eq!(error.to_string(), "Provider error: API timeout");
    }

    #[test]
    fn test_authentication_error_display() {
        let error = ThreadchatError::Authentication("invalid api key".to_string());
        assert_eq!(error.to_string(), "Authentication error: invalid api key");
    }

    #[test]
    fn test_missing_credentials_error_display() {
        let error = ThreadchatError::MissingCredentials("OPENAI_API_KEY".to_string());
        assert_eq!(error.to_string(), "Missing credentials: OPENAI_API_KEY");
    }

    #[test]
    fn test_conversation_not_found_display() {
        let error = ThreadchatError::ConversationNotFound("chat_9".to_string());
        assert_eq!(error.to_string(), "Conversation not found: chat_9");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: ThreadchatError = io_error.into();
        assert!(matches!(error, ThreadchatError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: ThreadchatError = json_error.into();
        assert!(matches!(error, ThreadchatError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: ThreadchatError = yaml_error.into();
        assert!(matches!(error, ThreadchatError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ThreadchatError>();
    }
}
