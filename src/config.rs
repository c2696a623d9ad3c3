//! Configuration management for Threadchat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! It also resolves the API key from the process environment.

use crate::error::{Result, ThreadchatError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Models the chat shell can be pointed at
pub const ALLOWED_MODELS: [&str; 4] = ["gpt-4o", "gpt-4-turbo", "gpt-4", "gpt-3.5-turbo"];

/// Lowest accepted sampling temperature
pub const MIN_TEMPERATURE: f32 = 0.0;
/// Highest accepted sampling temperature
pub const MAX_TEMPERATURE: f32 = 1.0;
/// Smallest accepted response length cap
pub const MIN_MAX_TOKENS: u32 = 50;
/// Largest accepted response length cap
pub const MAX_MAX_TOKENS: u32 = 2000;

/// Main configuration structure for Threadchat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat parameters sent with every completion
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Provider configuration
///
/// Specifies which completion backend to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// OpenAI-compatible endpoint configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "openai".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the API; `/chat/completions` is appended
    ///
    /// Point this at a mock server in tests.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Chat parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Model name, one of [`ALLOWED_MODELS`]
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0.0-1.0); lower is more focused
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum response length in tokens (50-2000)
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            tracing::error!("Failed to read config file {}: {}", path, e);
            ThreadchatError::Io(e)
        })?;
        let config = serde_yaml::from_str(&contents).map_err(|e| {
            tracing::error!("Failed to parse config file {}: {}", path, e);
            ThreadchatError::Yaml(e)
        })?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(model) = std::env::var("THREADCHAT_MODEL") {
            self.chat.model = model;
        }

        if let Ok(api_base) = std::env::var("THREADCHAT_API_BASE") {
            self.provider.openai.api_base = api_base;
        }

        if let Ok(temperature) = std::env::var("THREADCHAT_TEMPERATURE") {
            match temperature.parse::<f32>() {
                Ok(t) => self.chat.temperature = t,
                Err(_) => tracing::warn!(
                    "Ignoring THREADCHAT_TEMPERATURE={}: not a number",
                    temperature
                ),
            }
        }

        if let Ok(max_tokens) = std::env::var("THREADCHAT_MAX_TOKENS") {
            match max_tokens.parse::<u32>() {
                Ok(n) => self.chat.max_tokens = n,
                Err(_) => tracing::warn!(
                    "Ignoring THREADCHAT_MAX_TOKENS={}: not an integer",
                    max_tokens
                ),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(model) = &cli.model {
            self.chat.model = model.clone();
        }
        if let Some(temperature) = cli.temperature {
            self.chat.temperature = temperature;
        }
        if let Some(max_tokens) = cli.max_tokens {
            self.chat.max_tokens = max_tokens;
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown, the model is not in
    /// [`ALLOWED_MODELS`], or a numeric parameter is out of range
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "openai" {
            return Err(ThreadchatError::Config(format!(
                "Invalid provider type: {}. Must be 'openai'",
                self.provider.provider_type
            ))
            .into());
        }

        if self.provider.openai.api_base.trim().is_empty() {
            return Err(ThreadchatError::Config("api_base cannot be empty".to_string()).into());
        }

        if self.provider.openai.timeout_seconds == 0 {
            return Err(
                ThreadchatError::Config("timeout_seconds must be greater than 0".to_string())
                    .into(),
            );
        }

        validate_model(&self.chat.model)?;
        validate_temperature(self.chat.temperature)?;
        validate_max_tokens(self.chat.max_tokens)?;

        Ok(())
    }
}

/// Check that `model` is one of [`ALLOWED_MODELS`]
pub fn validate_model(model: &str) -> Result<()> {
    if ALLOWED_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(ThreadchatError::Config(format!(
            "Unsupported model: {}. Choose one of: {}",
            model,
            ALLOWED_MODELS.join(", ")
        ))
        .into())
    }
}

/// Check that `temperature` lies in 0.0..=1.0
pub fn validate_temperature(temperature: f32) -> Result<()> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&temperature) {
        Ok(())
    } else {
        Err(ThreadchatError::Config(format!(
            "temperature must be between {:.1} and {:.1}, got {}",
            MIN_TEMPERATURE, MAX_TEMPERATURE, temperature
        ))
        .into())
    }
}

/// Check that `max_tokens` lies in 50..=2000
pub fn validate_max_tokens(max_tokens: u32) -> Result<()> {
    if (MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
        Ok(())
    } else {
        Err(ThreadchatError::Config(format!(
            "max_tokens must be between {} and {}, got {}",
            MIN_MAX_TOKENS, MAX_MAX_TOKENS, max_tokens
        ))
        .into())
    }
}

/// Where the session's API key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeySource {
    /// Read from the named environment variable (or `.env` file)
    Environment(String),
    /// Typed in at the chat prompt
    Prompt,
}

impl std::fmt::Display for ApiKeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Environment(var) => write!(f, "environment ({})", var),
            Self::Prompt => write!(f, "entered at prompt"),
        }
    }
}

/// Look up the API key in the environment variable named by `config`
///
/// Blank values count as absent.
pub fn api_key_from_env(config: &OpenAiConfig) -> Option<(String, ApiKeySource)> {
    match std::env::var(&config.api_key_env) {
        Ok(key) if !key.trim().is_empty() => {
            tracing::debug!(
                "Using API key from environment variable {}",
                config.api_key_env
            );
            Some((
                key.trim().to_string(),
                ApiKeySource::Environment(config.api_key_env.clone()),
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "openai");
        assert_eq!(config.provider.openai.api_base, "https://api.openai.com/v1");
        assert_eq!(config.provider.openai.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.chat.model, "gpt-4o");
        assert_eq!(config.chat.temperature, 0.7);
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    fn test_config_validation_success() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "azure".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_unknown_model() {
        let mut config = Config::default();
        config.chat.model = "gpt-2".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unsupported model: gpt-2"));
    }

    #[test]
    fn test_config_validation_temperature_bounds() {
        let mut config = Config::default();
        config.chat.temperature = 0.0;
        assert!(config.validate().is_ok());
        config.chat.temperature = 1.0;
        assert!(config.validate().is_ok());
        config.chat.temperature = 1.01;
        assert!(config.validate().is_err());
        config.chat.temperature = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_max_tokens_bounds() {
        let mut config = Config::default();
        config.chat.max_tokens = 50;
        assert!(config.validate().is_ok());
        config.chat.max_tokens = 2000;
        assert!(config.validate().is_ok());
        config.chat.max_tokens = 49;
        assert!(config.validate().is_err());
        config.chat.max_tokens = 2001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = Config::default();
        config.provider.openai.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
provider:
  type: openai
  openai:
    api_base: http://localhost:8080/v1
    api_key_env: MY_KEY
chat:
  model: gpt-4-turbo
  temperature: 0.3
  max_tokens: 1200
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.openai.api_base, "http://localhost:8080/v1");
        assert_eq!(config.provider.openai.api_key_env, "MY_KEY");
        assert_eq!(config.provider.openai.timeout_seconds, 120);
        assert_eq!(config.chat.model, "gpt-4-turbo");
        assert_eq!(config.chat.temperature, 0.3);
        assert_eq!(config.chat.max_tokens, 1200);
    }

    #[test]
    fn test_config_from_partial_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("chat:\n  model: gpt-4\n").unwrap();
        assert_eq!(config.provider.provider_type, "openai");
        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_uses_defaults() {
        let config = Config::load("nonexistent.yaml", &crate::cli::Cli::default()).unwrap();
        assert_eq!(config.provider.provider_type, "openai");
    }

    #[test]
    #[serial]
    fn test_cli_overrides_take_precedence() {
        let cli = crate::cli::Cli {
            model: Some("gpt-3.5-turbo".to_string()),
            temperature: Some(0.1),
            max_tokens: Some(64),
            ..Default::default()
        };
        let config = Config::load("nonexistent.yaml", &cli).unwrap();
        assert_eq!(config.chat.model, "gpt-3.5-turbo");
        assert_eq!(config.chat.temperature, 0.1);
        assert_eq!(config.chat.max_tokens, 64);
    }

    #[test]
    #[serial]
    fn test_env_vars_override_defaults() {
        std::env::set_var("THREADCHAT_MODEL", "gpt-4");
        std::env::set_var("THREADCHAT_MAX_TOKENS", "not-a-number");
        let config = Config::load("nonexistent.yaml", &crate::cli::Cli::default()).unwrap();
        std::env::remove_var("THREADCHAT_MODEL");
        std::env::remove_var("THREADCHAT_MAX_TOKENS");

        assert_eq!(config.chat.model, "gpt-4");
        assert_eq!(config.chat.max_tokens, 500);
    }

    #[test]
    #[serial]
    fn test_api_key_from_env() {
        let config = OpenAiConfig {
            api_key_env: "THREADCHAT_TEST_KEY".to_string(),
            ..Default::default()
        };

        std::env::remove_var("THREADCHAT_TEST_KEY");
        assert!(api_key_from_env(&config).is_none());

        std::env::set_var("THREADCHAT_TEST_KEY", "   ");
        assert!(api_key_from_env(&config).is_none());

        std::env::set_var("THREADCHAT_TEST_KEY", "sk-test ");
        let (key, source) = api_key_from_env(&config).unwrap();
        std::env::remove_var("THREADCHAT_TEST_KEY");

        assert_eq!(key, "sk-test");
        assert_eq!(
            source,
            ApiKeySource::Environment("THREADCHAT_TEST_KEY".to_string())
        );
    }

    #[test]
    fn test_api_key_source_display() {
        assert_eq!(
            ApiKeySource::Environment("OPENAI_API_KEY".to_string()).to_string(),
            "environment (OPENAI_API_KEY)"
        );
        assert_eq!(ApiKeySource::Prompt.to_string(), "entered at prompt");
    }
}
