//! Text-generation providers.
//!
//! This module defines the trait every hosted model backend implements and
//! the request/response types shared between them. Backends talk HTTP only
//! when their cargo feature is enabled.

use crate::credentials::CredentialError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

mod anthropic;
mod factory;
mod openai;

pub use anthropic::{AnthropicProvider, AnthropicProviderFactory, ANTHROPIC_API_KEY_ENV};
pub use factory::{ProviderFactory, ProviderRegistry};
pub use openai::{OpenAiProvider, OpenAiProviderFactory, OPENAI_API_KEY_ENV};

/// Errors from text-generation providers.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit or quota exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid provider config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Settings for one completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    /// Model to use
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            max_tokens: 2048,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

impl CompletionConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Overlay values from a JSON provider config.
    ///
    /// Recognized keys: `model`, `max_tokens`, `temperature`, and `timeout`
    /// as a human duration ("45s", "2m").
    pub fn from_json(base: Self, config: &JsonValue) -> Result<Self, ProviderError> {
        let mut out = base;

        if let Some(model) = config["model"].as_str() {
            out.model = model.to_string();
        }
        if let Some(max_tokens) = config["max_tokens"].as_u64() {
            out.max_tokens = u32::try_from(max_tokens)
                .map_err(|_| ProviderError::InvalidConfig("max_tokens out of range".into()))?;
        }
        if let Some(temperature) = config["temperature"].as_f64() {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ProviderError::InvalidConfig(format!(
                    "temperature {} outside 0.0-2.0",
                    temperature
                )));
            }
            out.temperature = temperature as f32;
        }
        if let Some(timeout) = config["timeout"].as_str() {
            out.timeout = humantime::parse_duration(timeout)
                .map_err(|e| ProviderError::InvalidConfig(format!("timeout: {}", e)))?;
        }

        Ok(out)
    }
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,

    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone, Default)]
pub struct CompletionResponse {
    /// Generated text
    pub content: String,

    pub usage: TokenUsage,

    /// Model that answered
    pub model: String,

    pub stop_reason: Option<String>,
}

/// Token usage from a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A hosted model that turns a prompt into text.
///
/// Implementations make exactly one request per call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Execute a chat completion.
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Settings used by [`generate`](Self::generate).
    fn completion_defaults(&self) -> CompletionConfig {
        CompletionConfig::default()
    }

    /// Generate text for a single prompt at the given temperature.
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        let config = self.completion_defaults().with_temperature(temperature);
        let response = self
            .complete(vec![ChatMessage::user(prompt)], &config)
            .await?;
        Ok(response.content)
    }
}

/// Validate a `base_url` value from provider config.
pub(crate) fn validate_base_url(config: &JsonValue) -> Result<(), ProviderError> {
    if let Some(url) = config["base_url"].as_str() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ProviderError::InvalidConfig(
                "base_url must start with http:// or https://".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn complete(
            &self,
            messages: Vec<ChatMessage>,
            config: &CompletionConfig,
        ) -> Result<CompletionResponse, ProviderError> {
            Ok(CompletionResponse {
                content: format!("{}@{}", messages[0].content, config.temperature),
                model: config.model.clone(),
                ..Default::default()
            })
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_chat_message_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
        assert_eq!(ChatMessage::assistant("a").role, "assistant");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }

    #[test]
    fn test_completion_config_from_json() {
        let config = CompletionConfig::from_json(
            CompletionConfig::default(),
            &serde_json::json!({
                "model": "gpt-4o",
                "max_tokens": 900,
                "temperature": 0.2,
                "timeout": "45s"
            }),
        )
        .unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, 900);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_completion_config_rejects_bad_values() {
        let base = CompletionConfig::default();
        assert!(
            CompletionConfig::from_json(base.clone(), &serde_json::json!({"timeout": "soon"}))
                .is_err()
        );
        assert!(
            CompletionConfig::from_json(base, &serde_json::json!({"temperature": 3.5})).is_err()
        );
    }

    #[tokio::test]
    async fn test_generate_uses_temperature() {
        let text = Echo.generate("hello", 0.7).await.unwrap();
        assert_eq!(text, "hello@0.7");
    }

    #[test]
    fn test_validate_base_url() {
        assert!(validate_base_url(&serde_json::json!({"base_url": "ftp://x"})).is_err());
        assert!(validate_base_url(&serde_json::json!({"base_url": "https://x"})).is_ok());
        assert!(validate_base_url(&serde_json::json!({})).is_ok());
    }
}
