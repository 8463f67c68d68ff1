//! The proposal request flow: render, generate once, check, sanitize.

use std::sync::Arc;
use std::time::Duration;

use grantcheck_core::{check, CheckConfig, Issue, ProposalInput, Sanitizer};
use serde::Serialize;

use crate::prompts::{PromptError, PromptTemplate, SYSTEM_PROMPT};
use crate::providers::{ChatMessage, CompletionConfig, ProviderError, TextGenerator, TokenUsage};
use crate::RuntimeError;

/// A generated and cleaned draft.
#[derive(Debug, Clone, Serialize)]
pub struct Draft {
    /// Text exactly as the model returned it.
    pub raw: String,
    /// Sanitized text.
    pub text: String,
    /// Issues found in the raw text.
    pub issues: Vec<Issue>,
    pub usage: TokenUsage,
    pub model: String,
}

/// Result of [`ProposalWriter::write`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Required input fields were empty; nothing was sent.
    Incomplete { missing: Vec<String> },
    Drafted(Draft),
}

/// Drives one generation request for a proposal input.
pub struct ProposalWriter {
    generator: Arc<dyn TextGenerator>,
    template: PromptTemplate,
    check_config: CheckConfig,
    completion: CompletionConfig,
    sanitizer: Sanitizer,
}

impl ProposalWriter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        template: PromptTemplate,
        check_config: CheckConfig,
        completion: CompletionConfig,
    ) -> Self {
        let sanitizer = Sanitizer::with_signoffs(&check_config.signoffs);
        Self {
            generator,
            template,
            check_config,
            completion,
            sanitizer,
        }
    }

    pub fn check_config(&self) -> &CheckConfig {
        &self.check_config
    }

    /// Render the prompt without calling the model.
    pub fn prompt(&self, input: &ProposalInput) -> Result<String, PromptError> {
        self.template.render(input, &self.check_config)
    }

    /// Generate a draft for `input`.
    ///
    /// Makes at most one model call. Provider failures and timeouts are
    /// returned as errors; checking never fails.
    pub async fn write(&self, input: &ProposalInput) -> Result<WriteOutcome, RuntimeError> {
        let prompt = match self.prompt(input) {
            Ok(prompt) => prompt,
            Err(PromptError::Incomplete { missing }) => {
                tracing::warn!(missing = ?missing, "Input incomplete, not generating");
                return Ok(WriteOutcome::Incomplete { missing });
            }
            Err(e) => return Err(e.into()),
        };

        let messages = vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let timeout = self.completion.timeout;

        tracing::debug!(
            provider = self.generator.name(),
            model = %self.completion.model,
            template = %self.template.name,
            "Requesting draft"
        );

        let response = tokio::time::timeout(timeout, self.generator.complete(messages, &self.completion))
            .await
            .map_err(|_| ProviderError::Timeout(timeout))?
            .map_err(|e| {
                tracing::warn!(provider = self.generator.name(), error = %e, "Generation failed");
                e
            })?;

        let issues = check(&response.content, input, &self.check_config);
        let text = self.sanitizer.sanitize(&response.content);

        tracing::info!(
            issues = issues.len(),
            tokens = response.usage.total(),
            "Draft generated"
        );

        Ok(WriteOutcome::Drafted(Draft {
            raw: response.content,
            text,
            issues,
            usage: response.usage,
            model: response.model,
        }))
    }
}
