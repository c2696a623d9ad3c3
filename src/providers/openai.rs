//! OpenAI provider implementation for Threadchat
//!
//! Calls the `/chat/completions` endpoint of an OpenAI-compatible API
//! without streaming and returns the first choice's text.

use crate::config::OpenAiConfig;
use crate::error::{Result, ThreadchatError};
use crate::providers::{CompletionRequest, Message, Provider};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI chat completions provider
///
/// # Examples
///
/// ```no_run
/// use threadchat::config::OpenAiConfig;
/// use threadchat::providers::{CompletionRequest, Message, OpenAiProvider, Provider};
///
/// # async fn example() -> threadchat::error::Result<()> {
/// let provider = OpenAiProvider::new(OpenAiConfig::default())?;
/// let request = CompletionRequest {
///     model: "gpt-4o".to_string(),
///     messages: vec![Message::user("Hello!")],
///     temperature: 0.7,
///     max_tokens: 500,
/// };
/// let reply = provider.complete("sk-...", &request).await?;
/// # Ok(())
/// # }
/// ```
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

/// Request body for `/chat/completions`
#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Response body from `/chat/completions`
#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

/// Error envelope returned by the API on failure
#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::config::OpenAiConfig;
    /// use threadchat::providers::OpenAiProvider;
    ///
    /// let provider = OpenAiProvider::new(OpenAiConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("threadchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ThreadchatError::Http)?;

        tracing::info!("Initialized OpenAI provider: api_base={}", config.api_base);

        Ok(Self { client, config })
    }

    /// Full URL of the chat completions endpoint
    ///
    /// # Examples
    ///
    /// ```
    /// use threadchat::config::OpenAiConfig;
    /// use threadchat::providers::OpenAiProvider;
    ///
    /// let config = OpenAiConfig {
    ///     api_base: "http://localhost:8080/v1/".to_string(),
    ///     ..Default::default()
    /// };
    /// let provider = OpenAiProvider::new(config).unwrap();
    /// assert_eq!(provider.completions_url(), "http://localhost:8080/v1/chat/completions");
    /// ```
    pub fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }
}

/// Parse a successful completion body
fn parse_response(body: &str) -> Result<OpenAiResponse> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse OpenAI response: {}", e);
        ThreadchatError::Serialization(e).into()
    })
}

/// Pull a readable message out of an error response body
fn describe_error_body(body: &str) -> String {
    match serde_json::from_str::<OpenAiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(&self, api_key: &str, request: &CompletionRequest) -> Result<String> {
        let url = self.completions_url();
        let body = OpenAiRequest {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        tracing::debug!(
            "Sending OpenAI request: model={}, {} messages, temperature={}, max_tokens={}",
            request.model,
            request.messages.len(),
            request.temperature,
            request.max_tokens
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenAI request failed: {}", e);
                ThreadchatError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = describe_error_body(&error_text);
            tracing::error!("OpenAI returned error {}: {}", status, detail);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ThreadchatError::Authentication(format!("{} {}", status, detail))
                }
                _ => ThreadchatError::Provider(format!("OpenAI returned error {}: {}", status, detail)),
            }
            .into());
        }

        let text = response.text().await.map_err(ThreadchatError::Http)?;
        let parsed = parse_response(&text)?;

        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                "OpenAI usage: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ThreadchatError::Provider("OpenAI response contained no message content".to_string())
                    .into()
            })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_creation() {
        assert!(OpenAiProvider::new(OpenAiConfig::default()).is_ok());
    }

    #[test]
    fn test_completions_url_default() {
        let provider = OpenAiProvider::new(OpenAiConfig::default()).unwrap();
        assert_eq!(
            provider.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let body = OpenAiRequest {
            model: "gpt-4",
            messages: &messages,
            temperature: 0.5,
            max_tokens: 100,
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 100);
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "4"}}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 1, "total_tokens": 21}
        }"#;
        let parsed: OpenAiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices.len(), 1);
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("4"));
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 20);
    }

    #[test]
    fn test_parse_response_rejects_malformed_body() {
        let err = parse_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThreadchatError>(),
            Some(ThreadchatError::Serialization(_))
        ));
    }

    #[test]
    fn test_describe_error_body_extracts_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(describe_error_body(body), "Incorrect API key provided");
    }

    #[test]
    fn test_describe_error_body_falls_back_to_raw_text() {
        assert_eq!(describe_error_body("bad gateway\n"), "bad gateway");
        assert_eq!(describe_error_body(""), "no response body");
    }
}
