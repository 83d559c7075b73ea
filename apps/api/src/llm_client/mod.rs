//! LLM Client: the single point of entry for text-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the completion API directly.
//! Callers depend on the `CompletionService` trait; `LlmClient` is the HTTP
//! implementation against an OpenAI-compatible `/completions` endpoint
//! (Cerebras by default).
//!
//! No retries, no backoff: a failed call is reported once and the caller
//! decides what to show.
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("completion response contained no choices")]
    EmptyContent,
}

/// Connection and generation settings for the completion service.
/// Constructed once at startup from the environment, immutable afterwards.
#[derive(Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl CompletionConfig {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

// Keeps the credential out of logs.
impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Bounded output length and sampling temperature for one completion call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
struct CompletionRequestBody<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl CompletionResponse {
    /// Text of the first choice; later choices are ignored.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// Error bodies come in two shapes depending on the provider:
/// `{"error": {"message": ..}}` or a flat `{"message": ..}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Nested { error: ApiErrorMessage },
    Flat { message: String },
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

impl ApiErrorBody {
    fn into_message(self) -> String {
        match self {
            ApiErrorBody::Nested { error } => error.message,
            ApiErrorBody::Flat { message } => message,
        }
    }
}

/// The completion collaborator. Implement this to swap backends (or stub the
/// service in tests) without touching the analyzer or the handlers.
///
/// Carried in `AppState` inside the analyzer as `Arc<dyn CompletionService>`.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<CompletionResponse, LlmError>;
}

/// HTTP client for the hosted completion endpoint.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: CompletionConfig,
}

impl LlmClient {
    pub fn new(config: CompletionConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!("{}/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionService for LlmClient {
    async fn complete(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<CompletionResponse, LlmError> {
        let request_body = CompletionRequestBody {
            model: &self.config.model,
            prompt,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(ApiErrorBody::into_message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn test_config(base_url: String) -> CompletionConfig {
        CompletionConfig {
            api_key: "test-key".to_string(),
            base_url,
            model: "llama-3.3-70b".to_string(),
            max_tokens: 1500,
            temperature: 0.4,
            timeout_secs: 5,
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            max_tokens: 1500,
            temperature: 0.4,
        }
    }

    #[tokio::test]
    async fn test_complete_sends_request_shape_and_parses_choices() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/completions")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "llama-3.3-70b",
                "prompt": "hello",
                "max_tokens": 1500,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"text": "  first  "}, {"text": "second"}],
                    "usage": {"prompt_tokens": 3, "completion_tokens": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = LlmClient::new(test_config(server.url())).unwrap();
        let response = client.complete("hello", params()).await.unwrap();

        assert_eq!(response.first_text(), Some("  first  "));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/completions")
            .with_status(401)
            .with_body(r#"{"message": "Wrong API Key", "type": "invalid_request_error"}"#)
            .create_async()
            .await;

        let client = LlmClient::new(test_config(server.url())).unwrap();
        let err = client.complete("hello", params()).await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Wrong API Key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_keeps_raw_body_when_error_is_not_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/completions")
            .with_status(429)
            .with_body("quota exceeded")
            .create_async()
            .await;

        let client = LlmClient::new(test_config(format!("{}/", server.url()))).unwrap();
        let err = client.complete("hello", params()).await.unwrap_err();

        assert_eq!(err.to_string(), "API error (status 429): quota exceeded");
    }

    #[tokio::test]
    async fn test_complete_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/completions")
            .with_status(200)
            .with_body("<html>gateway</html>")
            .create_async()
            .await;

        let client = LlmClient::new(test_config(server.url())).unwrap();
        let err = client.complete("hello", params()).await.unwrap_err();

        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[tokio::test]
    async fn test_complete_unreachable_endpoint_is_http_error() {
        let client = LlmClient::new(test_config("http://127.0.0.1:1".to_string())).unwrap();
        let err = client.complete("hello", params()).await.unwrap_err();

        assert!(matches!(err, LlmError::Http(_)), "got {err:?}");
    }

    #[test]
    fn test_nested_error_body() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error": {"message": "model not found"}}"#).unwrap();
        assert_eq!(body.into_message(), "model not found");
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let rendered = format!("{:?}", test_config("http://localhost".to_string()));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
