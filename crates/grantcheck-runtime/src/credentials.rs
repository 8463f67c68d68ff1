//! Credential resolution for text-generation providers.
//!
//! Credentials come from an ordered chain of providers: the first provider
//! that yields a value wins, and running out of providers is a configuration
//! error. The resolved [`ApiCredential`] is handed to the provider that needs
//! it; nothing is stored in process-wide state.
//!
//! ## Usage
//!
//! ```ignore
//! let credential = CredentialChain::new("OpenAI API key")
//!     .with(SecretsFileProvider::new(".streamlit/secrets.toml", "OPENAI_API_KEY"))
//!     .with(EnvProvider::new("OPENAI_API_KEY"))
//!     .resolve()?;
//!
//! // Use in HTTP header (explicit exposure)
//! request.bearer_auth(credential.expose());
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Default location of the hosted-app secrets file.
pub const DEFAULT_SECRETS_FILE: &str = ".streamlit/secrets.toml";

/// Errors from credential resolution.
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read secrets file {path}: {message}")]
    SecretsFile { path: String, message: String },

    #[error("{name} not configured; tried {}", tried.join(", "))]
    Exhausted { name: String, tried: Vec<String> },
}

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Provider configuration (e.g. `api_key` in JSON)
    Config,
    /// Secrets file
    SecretsFile,
    /// Environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::SecretsFile => write!(f, "secrets file"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
///
/// `Debug` and `Display` never show the value; call [`expose`](Self::expose)
/// at the point of use.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
        }
    }

    /// Expose the credential value for use in an API call.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().trim().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl Clone for ApiCredential {
    fn clone(&self) -> Self {
        Self::new(self.expose(), self.source)
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "credential from {} [REDACTED]", self.source)
    }
}

/// One place a credential may come from.
pub trait CredentialProvider: Send + Sync {
    /// Human-readable description, e.g. "env OPENAI_API_KEY".
    fn describe(&self) -> String;

    /// `Ok(None)` when this source simply has no value.
    fn resolve(&self) -> Result<Option<ApiCredential>, CredentialError>;
}

/// Reads an environment variable. Empty values count as absent.
pub struct EnvProvider {
    var: String,
}

impl EnvProvider {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvProvider {
    fn describe(&self) -> String {
        format!("env {}", self.var)
    }

    fn resolve(&self) -> Result<Option<ApiCredential>, CredentialError> {
        Ok(std::env::var(&self.var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| ApiCredential::new(v.trim(), CredentialSource::Environment)))
    }
}

/// Reads a key from a TOML secrets file.
///
/// Dotted keys address nested tables (`openai.api_key`). A missing file is
/// not an error; an unreadable or malformed one is.
pub struct SecretsFileProvider {
    path: PathBuf,
    key: String,
}

impl SecretsFileProvider {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    fn lookup<'a>(table: &'a toml::Table, key: &str) -> Option<&'a str> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut value = table.get(first)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        value.as_str()
    }
}

impl CredentialProvider for SecretsFileProvider {
    fn describe(&self) -> String {
        format!("secrets file {} [{}]", self.path.display(), self.key)
    }

    fn resolve(&self) -> Result<Option<ApiCredential>, CredentialError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let to_error = |message: String| CredentialError::SecretsFile {
            path: self.path.display().to_string(),
            message,
        };

        let contents = fs::read_to_string(&self.path).map_err(|e| to_error(e.to_string()))?;
        let table: toml::Table =
            toml::from_str(&contents).map_err(|e| to_error(e.to_string()))?;

        Ok(Self::lookup(&table, &self.key)
            .filter(|v| !v.trim().is_empty())
            .map(|v| ApiCredential::new(v.trim(), CredentialSource::SecretsFile)))
    }
}

/// A value known up front (CLI flag, provider config).
pub struct StaticProvider {
    value: Option<SecretString>,
    source: CredentialSource,
}

impl StaticProvider {
    pub fn new(value: Option<String>, source: CredentialSource) -> Self {
        Self {
            value: value.map(SecretString::from),
            source,
        }
    }
}

impl CredentialProvider for StaticProvider {
    fn describe(&self) -> String {
        self.source.to_string()
    }

    fn resolve(&self) -> Result<Option<ApiCredential>, CredentialError> {
        Ok(self
            .value
            .as_ref()
            .map(|v| v.expose_secret())
            .filter(|v| !v.trim().is_empty())
            .map(|v| ApiCredential::new(v.trim(), self.source)))
    }
}

/// Ordered list of credential providers; first success wins.
pub struct CredentialChain {
    name: String,
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    /// Start an empty chain for the named credential.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            providers: Vec::new(),
        }
    }

    /// Append a provider.
    pub fn with(mut self, provider: impl CredentialProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// The usual chain for a hosted key: secrets file, then environment.
    pub fn standard(name: impl Into<String>, key: &str) -> Self {
        Self::new(name)
            .with(SecretsFileProvider::new(DEFAULT_SECRETS_FILE, key))
            .with(EnvProvider::new(key))
    }

    /// Try each provider in order.
    ///
    /// A provider that errors is logged and skipped, so a broken secrets
    /// file does not hide a valid environment variable.
    pub fn resolve(&self) -> Result<ApiCredential, CredentialError> {
        let mut tried = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            match provider.resolve() {
                Ok(Some(credential)) => {
                    tracing::debug!(
                        credential = %self.name,
                        source = %credential.source(),
                        "Resolved credential"
                    );
                    return Ok(credential);
                }
                Ok(None) => tried.push(provider.describe()),
                Err(e) => {
                    tracing::warn!(
                        credential = %self.name,
                        provider = %provider.describe(),
                        error = %e,
                        "Credential provider failed, trying next"
                    );
                    tried.push(provider.describe());
                }
            }
        }

        Err(CredentialError::Exhausted {
            name: self.name.clone(),
            tried,
        })
    }
}

impl fmt::Debug for CredentialChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialChain")
            .field("name", &self.name)
            .field(
                "providers",
                &self.providers.iter().map(|p| p.describe()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_secrets(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_credential_redacted_in_debug() {
        let secret = "sk-super-secret-key-12345";
        let cred = ApiCredential::new(secret, CredentialSource::Programmatic);

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(secret), "Secret exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_credential_redacted_in_display() {
        let secret = "sk-super-secret-key-12345";
        let cred = ApiCredential::new(secret, CredentialSource::SecretsFile);

        let display = format!("{}", cred);
        assert!(!display.contains(secret), "Secret exposed in Display!");
        assert!(display.contains("secrets file"));
    }

    #[test]
    fn test_first_provider_wins() {
        std::env::set_var("GRANTCHECK_TEST_KEY_ORDER", "env-key");

        let cred = CredentialChain::new("Test key")
            .with(StaticProvider::new(
                Some("config-key".to_string()),
                CredentialSource::Config,
            ))
            .with(EnvProvider::new("GRANTCHECK_TEST_KEY_ORDER"))
            .resolve()
            .unwrap();

        assert_eq!(cred.expose(), "config-key");
        assert_eq!(cred.source(), CredentialSource::Config);

        std::env::remove_var("GRANTCHECK_TEST_KEY_ORDER");
    }

    #[test]
    fn test_falls_back_to_env() {
        std::env::set_var("GRANTCHECK_TEST_KEY_FALLBACK", "  env-key \n");

        let cred = CredentialChain::new("Test key")
            .with(StaticProvider::new(None, CredentialSource::Config))
            .with(SecretsFileProvider::new("/nonexistent/secrets.toml", "KEY"))
            .with(EnvProvider::new("GRANTCHECK_TEST_KEY_FALLBACK"))
            .resolve()
            .unwrap();

        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);

        std::env::remove_var("GRANTCHECK_TEST_KEY_FALLBACK");
    }

    #[test]
    fn test_exhausted_lists_sources() {
        let err = CredentialChain::new("Test key")
            .with(EnvProvider::new("GRANTCHECK_NONEXISTENT_VAR_12345"))
            .resolve()
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("Test key"));
        assert!(message.contains("env GRANTCHECK_NONEXISTENT_VAR_12345"));
    }

    #[test]
    fn test_secrets_file_lookup() {
        let (_dir, path) = temp_secrets(
            "OPENAI_API_KEY = \"file-key\"\n\n[anthropic]\napi_key = \"nested-key\"\n",
        );

        let flat = SecretsFileProvider::new(&path, "OPENAI_API_KEY")
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(flat.expose(), "file-key");
        assert_eq!(flat.source(), CredentialSource::SecretsFile);

        let nested = SecretsFileProvider::new(&path, "anthropic.api_key")
            .resolve()
            .unwrap()
            .unwrap();
        assert_eq!(nested.expose(), "nested-key");

        let absent = SecretsFileProvider::new(&path, "MISSING").resolve().unwrap();
        assert!(absent.is_none());
    }

    #[test]
    fn test_broken_secrets_file_is_skipped() {
        let (_dir, path) = temp_secrets("this is = = not toml");
        std::env::set_var("GRANTCHECK_TEST_KEY_BROKEN", "env-key");

        assert!(SecretsFileProvider::new(&path, "KEY").resolve().is_err());

        let cred = CredentialChain::new("Test key")
            .with(SecretsFileProvider::new(&path, "KEY"))
            .with(EnvProvider::new("GRANTCHECK_TEST_KEY_BROKEN"))
            .resolve()
            .unwrap();
        assert_eq!(cred.expose(), "env-key");

        std::env::remove_var("GRANTCHECK_TEST_KEY_BROKEN");
    }
}
