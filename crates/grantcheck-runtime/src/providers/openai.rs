//! OpenAI-compatible chat-completions provider.
//!
//! Works against api.openai.com or any server that speaks the same
//! `/chat/completions` protocol (set `base_url`). HTTP is compiled in only
//! with the `openai` feature.

use super::{
    factory::ProviderFactory, validate_base_url, ChatMessage, CompletionConfig,
    CompletionResponse, ProviderError, TextGenerator,
};
use crate::credentials::{ApiCredential, CredentialChain, CredentialSource};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Environment variable name for the OpenAI API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Environment variable name for the optional OpenAI project identifier.
pub const OPENAI_PROJECT_ENV: &str = "OPENAI_PROJECT_ID";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions provider.
pub struct OpenAiProvider {
    credential: ApiCredential,
    project: Option<ApiCredential>,
    base_url: String,
    defaults: CompletionConfig,
    #[cfg(feature = "openai")]
    client: reqwest::Client,
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("credential", &self.credential)
            .field("project", &self.project)
            .field("base_url", &self.base_url)
            .field("model", &self.defaults.model)
            .finish()
    }
}

impl OpenAiProvider {
    pub fn new(credential: ApiCredential) -> Result<Self, ProviderError> {
        Ok(Self {
            credential,
            project: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            defaults: CompletionConfig::default(),
            #[cfg(feature = "openai")]
            client: reqwest::Client::builder()
                .build()
                .map_err(|e| ProviderError::HttpError(e.to_string()))?,
        })
    }

    /// Build from JSON config with an already-resolved key.
    pub fn from_config(config: &JsonValue, credential: ApiCredential) -> Result<Self, ProviderError> {
        let project = match config["project"].as_str() {
            Some(p) => Some(ApiCredential::new(p, CredentialSource::Config)),
            None => CredentialChain::standard("OpenAI project", OPENAI_PROJECT_ENV)
                .resolve()
                .ok(),
        };

        let mut provider = Self::new(credential)?;
        provider.project = project.filter(|p| !p.is_empty());
        provider.defaults = CompletionConfig::from_json(CompletionConfig::default(), config)?;
        if let Some(url) = config["base_url"].as_str() {
            provider.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(provider)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_project(mut self, project: ApiCredential) -> Self {
        self.project = Some(project);
        self
    }
}

#[cfg(feature = "openai")]
mod wire {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize)]
    pub struct ChatRequest<'a> {
        pub model: &'a str,
        pub messages: &'a [super::ChatMessage],
        pub max_tokens: u32,
        pub temperature: f32,
    }

    #[derive(Debug, Deserialize)]
    pub struct ChatResponse {
        pub choices: Vec<Choice>,
        #[serde(default)]
        pub model: String,
        pub usage: Option<Usage>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Choice {
        pub message: Message,
        pub finish_reason: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Message {
        pub content: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Usage {
        pub prompt_tokens: u32,
        pub completion_tokens: u32,
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
impl TextGenerator for OpenAiProvider {
    #[cfg(feature = "openai")]
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        use super::TokenUsage;
        use std::time::Duration;

        let request = wire::ChatRequest {
            model: &config.model,
            messages: &messages,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.credential.expose())
            .timeout(config.timeout)
            .json(&request);
        if let Some(project) = &self.project {
            builder = builder.header("OpenAI-Project", project.expose());
        }

        let response = builder.send().await.map_err(|e| {
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

        let body: wire::ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("response has no choices".to_string()))?;

        let usage = body
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            usage,
            model: if body.model.is_empty() {
                config.model.clone()
            } else {
                body.model
            },
            stop_reason: choice.finish_reason,
        })
    }

    #[cfg(not(feature = "openai"))]
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        _config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        Err(ProviderError::NotConfigured(
            "OpenAI provider requires 'openai' feature".to_string(),
        ))
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn completion_defaults(&self) -> CompletionConfig {
        self.defaults.clone()
    }
}

/// Factory for OpenAI-compatible providers.
///
/// ## Configuration Format
/// ```json
/// {
///   "api_key": "sk-...",          // Optional, else secrets file, else OPENAI_API_KEY
///   "project": "proj_...",        // Optional, else OPENAI_PROJECT_ID
///   "base_url": "https://...",    // Optional
///   "model": "gpt-4",
///   "temperature": 0.7,
///   "timeout": "60s"
/// }
/// ```
pub struct OpenAiProviderFactory;

impl ProviderFactory for OpenAiProviderFactory {
    fn provider_type(&self) -> &'static str {
        "openai"
    }

    fn api_key_env(&self) -> &'static str {
        OPENAI_API_KEY_ENV
    }

    fn create(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn TextGenerator>, ProviderError> {
        Ok(Arc::new(OpenAiProvider::from_config(config, credential)?))
    }

    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError> {
        validate_base_url(config)?;
        CompletionConfig::from_json(CompletionConfig::default(), config)?;
        Ok(())
    }

    fn default_config(&self) -> JsonValue {
        serde_json::json!({
            "model": "gpt-4",
            "temperature": 0.7,
            "timeout": "60s"
        })
    }

    fn description(&self) -> &'static str {
        "OpenAI-compatible chat completions"
    }
}
