//! Anthropic messages-API provider.

use super::{
    factory::ProviderFactory, validate_base_url, ChatMessage, CompletionConfig,
    CompletionResponse, ProviderError, TextGenerator,
};
use crate::credentials::ApiCredential;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Environment variable name for the Anthropic API key.
pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const API_VERSION: &str = "2023-06-01";

/// Anthropic provider.
///
/// The key stays inside an [`ApiCredential`] and is exposed only when the
/// request header is built.
pub struct AnthropicProvider {
    credential: ApiCredential,
    base_url: String,
    defaults: CompletionConfig,
    #[cfg(feature = "anthropic")]
    client: reqwest::Client,
}

impl std::fmt::Debug for AnthropicProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url)
            .field("model", &self.defaults.model)
            .finish()
    }
}

impl AnthropicProvider {
    pub fn new(credential: ApiCredential) -> Result<Self, ProviderError> {
        Ok(Self {
            credential,
            base_url: DEFAULT_BASE_URL.to_string(),
            defaults: CompletionConfig::new(DEFAULT_MODEL),
            #[cfg(feature = "anthropic")]
            client: reqwest::Client::builder()
                .build()
                .map_err(|e| ProviderError::HttpError(e.to_string()))?,
        })
    }

    pub fn from_config(config: &JsonValue, credential: ApiCredential) -> Result<Self, ProviderError> {
        let mut provider = Self::new(credential)?;
        provider.defaults = completion_from_json(provider.defaults.clone(), config)?;
        if let Some(url) = config["base_url"].as_str() {
            provider.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(provider)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// The messages API takes temperatures in 0.0-1.0, narrower than the shared range.
fn completion_from_json(
    base: CompletionConfig,
    config: &JsonValue,
) -> Result<CompletionConfig, ProviderError> {
    let completion = CompletionConfig::from_json(base, config)?;
    if completion.temperature > 1.0 {
        return Err(ProviderError::InvalidConfig(format!(
            "temperature {} outside 0.0-1.0",
            completion.temperature
        )));
    }
    Ok(completion)
}

/// System messages travel in a separate field; everything else stays in order.
#[cfg_attr(not(feature = "anthropic"), allow(dead_code))]
fn split_system(messages: Vec<ChatMessage>) -> (Option<String>, Vec<ChatMessage>) {
    let mut system: Vec<String> = Vec::new();
    let mut others = Vec::with_capacity(messages.len());

    for msg in messages {
        if msg.role == "system" {
            system.push(msg.content);
        } else {
            others.push(msg);
        }
    }

    let system = if system.is_empty() {
        None
    } else {
        Some(system.join("\n\n"))
    };
    (system, others)
}

#[cfg(feature = "anthropic")]
mod wire {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct MessagesRequest<'a> {
        pub model: &'a str,
        pub max_tokens: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub system: Option<String>,
        pub messages: Vec<super::ChatMessage>,
        pub temperature: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct MessagesResponse {
        pub content: Vec<ContentBlock>,
        pub model: String,
        pub stop_reason: Option<String>,
        pub usage: Usage,
    }

    #[derive(Debug, Deserialize)]
    pub struct ContentBlock {
        pub text: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Usage {
        pub input_tokens: u32,
        pub output_tokens: u32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        pub error: ErrorDetail,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorDetail {
        pub message: String,
    }
}

#[async_trait]
impl TextGenerator for AnthropicProvider {
    #[cfg(feature = "anthropic")]
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        use super::TokenUsage;
        use std::time::Duration;

        let (system, messages) = split_system(messages);
        let request = wire::MessagesRequest {
            model: &config.model,
            max_tokens: config.max_tokens,
            system,
            messages,
            temperature: config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.credential.expose())
            .header("anthropic-version", API_VERSION)
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(config.timeout)
                } else {
                    ProviderError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthError);
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ProviderError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<wire::ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: wire::MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let content = body
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect::<String>();

        Ok(CompletionResponse {
            content,
            usage: TokenUsage {
                prompt_tokens: body.usage.input_tokens,
                completion_tokens: body.usage.output_tokens,
            },
            model: body.model,
            stop_reason: body.stop_reason,
        })
    }

    #[cfg(not(feature = "anthropic"))]
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "Anthropic provider requires 'anthropic' feature".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn completion_defaults(&self) -> CompletionConfig {
        self.defaults.clone()
    }
}

/// Factory for Anthropic providers.
///
/// Accepts `api_key`, `base_url`, `model`, `max_tokens`, `temperature`
/// (0.0-1.0) and `timeout`.
pub struct AnthropicProviderFactory;

impl ProviderFactory for AnthropicProviderFactory {
    fn provider_type(&self) -> &'static str {
        "anthropic"
    }

    fn api_key_env(&self) -> &'static str {
        ANTHROPIC_API_KEY_ENV
    }

    fn create(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn TextGenerator>, ProviderError> {
        Ok(Arc::new(AnthropicProvider::from_config(config, credential)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        validate_base_url(config)?;
        completion_from_json(CompletionConfig::new(DEFAULT_MODEL), config)?;
        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({
            "model": DEFAULT_MODEL,
            "temperature": 0.7,
            "timeout": "60s"
        })
    }

    fn description(&self) -> &'static str {
        "Anthropic messages API"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::CredentialSource;

    fn key(value: &str) -> ApiCredential {
        ApiCredential::new(value, CredentialSource::Programmatic)
    }

    #[test]
    fn test_split_system() {
        let (system, rest) = split_system(vec![
            ChatMessage::system("Be terse."),
            ChatMessage::user("Hi"),
            ChatMessage::system("No greetings."),
        ]);
        assert_eq!(system.as_deref(), Some("Be terse.\n\nNo greetings."));
        assert_eq!(rest, vec![ChatMessage::user("Hi")]);

        let (system, rest) = split_system(vec![ChatMessage::user("Hi")]);
        assert!(system.is_none());
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_defaults_use_anthropic_model() {
        let provider = AnthropicProvider::new(key("sk-ant-test")).unwrap();
        assert_eq!(provider.completion_defaults().model, DEFAULT_MODEL);
        assert_eq!(provider.name(), "anthropic");
    }

    #[test]
    fn test_from_config() {
        let config = serde_json::json!({
            "base_url": "https://custom.api.com/v1",
            "max_tokens": 1024
        });
        let provider = AnthropicProvider::from_config(&config, key("sk-ant-test")).unwrap();
        assert_eq!(provider.base_url, "https://custom.api.com/v1");
        assert_eq!(provider.completion_defaults().max_tokens, 1024);
        assert_eq!(provider.completion_defaults().model, DEFAULT_MODEL);
    }

    #[test]
    fn test_api_key_not_in_debug_output() {
        let secret = "sk-ant-REDACTED";
        let provider = AnthropicProvider::new(key(secret)).unwrap();
        let debug = format!("{:?}", provider);
        assert!(!debug.contains(secret));
    }

    #[test]
    fn test_factory() {
        let factory = AnthropicProviderFactory;
        assert_eq!(factory.api_key_env(), "ANTHROPIC_API_KEY");
        assert!(factory.validate_config(&factory.default_config()).is_ok());
        assert!(factory
            .validate_config(&serde_json::json!({"base_url": "invalid-url"}))
            .is_err());
        assert!(factory.description().contains("Anthropic"));
    }

    #[test]
    fn test_temperature_above_one_rejected() {
        let factory = AnthropicProviderFactory;
        let result = factory.validate_config(&serde_json::json!({"temperature": 1.5}));
        assert!(matches!(result, Err(ProviderError::InvalidConfig(_))));
        assert!(factory
            .validate_config(&serde_json::json!({"temperature": 1.0}))
            .is_ok());

        let result = AnthropicProvider::from_config(
            &serde_json::json!({"temperature": 1.2}),
            key("sk-ant-test"),
        );
        assert!(matches!(result, Err(ProviderError::InvalidConfig(_))));
    }

    #[cfg(not(feature = "anthropic"))]
    #[tokio::test]
    async fn test_complete_without_feature() {
        let provider = AnthropicProvider::new(key("sk-ant-test")).unwrap();
        let result = provider.generate("hello", 0.7).await;
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }

    #[cfg(feature = "anthropic")]
    #[test]
    fn test_response_parsing() {
        let body: wire::MessagesResponse = serde_json::from_str(
            r#"{
                "content": [{"type": "text", "text": "Hello"}, {"type": "text", "text": " there"}],
                "model": "claude-sonnet-4-5",
                "stop_reason": "end_turn",
                "usage": {"input_tokens": 10, "output_tokens": 2}
            }"#,
        )
        .unwrap();
        let text: String = body.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(text, "Hello there");
        assert_eq!(body.usage.input_tokens, 10);
    }
}
