use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use threadchat::config::OpenAiConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Provider configuration pointing at `server`
#[allow(dead_code)]
pub fn openai_config_for(server: &MockServer) -> OpenAiConfig {
    OpenAiConfig {
        api_base: format!("{}/v1", server.uri()),
        timeout_seconds: 5,
        ..Default::default()
    }
}

/// Chat completion body with a single choice
#[allow(dead_code)]
pub fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 20, "completion_tokens": 1, "total_tokens": 21 }
    })
}

/// Answer every completion request on `server` with `content`
#[allow(dead_code)]
pub async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(server)
        .await;
}
