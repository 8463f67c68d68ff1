//! Provider factories and the registry that selects one by name.
//!
//! ```ignore
//! let registry = ProviderRegistry::with_defaults();
//! let generator = registry.create("openai", &serde_json::json!({"model": "gpt-4"}))?;
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{ProviderError, TextGenerator};
use crate::credentials::{
    ApiCredential, CredentialChain, CredentialSource, EnvProvider, SecretsFileProvider,
    StaticProvider, DEFAULT_SECRETS_FILE,
};

/// Builds a [`TextGenerator`] from JSON configuration and a resolved key.
pub trait ProviderFactory: Send + Sync {
    /// Unique identifier, e.g. "openai" or "anthropic".
    fn provider_type(&self) -> &'static str;

    /// Environment variable (and secrets-file key) holding the API key.
    fn api_key_env(&self) -> &'static str;

    /// Where to look for the API key, in order.
    ///
    /// `api_key` in the config wins, then the secrets file (`secrets_file`
    /// overrides its path), then the environment.
    fn credential_chain(&self, config: &JsonValue) -> CredentialChain {
        let key = self.api_key_env();
        let secrets = config["secrets_file"]
            .as_str()
            .unwrap_or(DEFAULT_SECRETS_FILE);

        CredentialChain::new(format!("{} API key", self.provider_type()))
            .with(StaticProvider::new(
                config["api_key"].as_str().map(str::to_string),
                CredentialSource::Config,
            ))
            .with(SecretsFileProvider::new(secrets, key))
            .with(EnvProvider::new(key))
    }

    /// Create a provider instance.
    fn create(
        &self,
        config: &JsonValue,
        credential: ApiCredential,
    ) -> Result<Arc<dyn TextGenerator>, ProviderError>;

    /// Check configuration shape without touching credentials.
    fn validate_config(&self, config: &JsonValue) -> Result<(), ProviderError>;

    fn default_config(&self) -> JsonValue {
        serde_json::json!({})
    }

    fn description(&self) -> &'static str {
        "Text generation provider"
    }
}

/// Registry of provider factories keyed by type name.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any with the same type.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories
            .insert(factory.provider_type().to_string(), factory);
    }

    /// Validate config, resolve the credential chain, then build the provider.
    pub fn create(
        &self,
        provider_type: &str,
        config: &JsonValue,
    ) -> Result<Arc<dyn TextGenerator>, ProviderError> {
        let factory = self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })?;

        factory.validate_config(config)?;
        let credential = factory.credential_chain(config).resolve()?;
        tracing::info!(
            provider = provider_type,
            source = %credential.source(),
            "Creating text generator"
        );
        factory.create(config, credential)
    }

    pub fn available_types(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    pub fn has_provider(&self, provider_type: &str) -> bool {
        self.factories.contains_key(provider_type)
    }

    pub fn default_config(&self, provider_type: &str) -> Option<JsonValue> {
        self.factories
            .get(provider_type)
            .map(|f| f.default_config())
    }

    /// Registry with the built-in OpenAI and Anthropic factories.
    ///
    /// Both are registered regardless of features; without the matching
    /// feature their providers answer `NotConfigured`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(super::OpenAiProviderFactory));
        registry.register(Arc::new(super::AnthropicProviderFactory));
        registry
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}
