//! # grantcheck-runtime
//!
//! Generation side of grantcheck: resolves an API key, renders a prompt from
//! the proposal input, asks a hosted model for a draft, then checks and
//! sanitizes the result with `grantcheck-core`.
//!
//! ```ignore
//! let generator = ProviderRegistry::with_defaults().create("openai", &json!({}))?;
//! let writer = ProposalWriter::new(
//!     generator,
//!     PromptTemplate::introduction(),
//!     CheckConfig::introduction(),
//!     CompletionConfig::default(),
//! );
//! match writer.write(&input).await? {
//!     WriteOutcome::Drafted(draft) => println!("{}", draft.text),
//!     WriteOutcome::Incomplete { missing } => eprintln!("fill in: {:?}", missing),
//! }
//! ```

pub mod credentials;
pub mod prompts;
pub mod providers;
pub mod writer;

use thiserror::Error;

pub use credentials::{
    ApiCredential, CredentialChain, CredentialError, CredentialProvider, CredentialSource,
    EnvProvider, SecretsFileProvider, StaticProvider,
};
pub use prompts::{PromptError, PromptTemplate};
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, ProviderError, ProviderFactory,
    ProviderRegistry, TextGenerator, TokenUsage,
};
pub use writer::{Draft, ProposalWriter, WriteOutcome};

/// Errors from the generation flow.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}
