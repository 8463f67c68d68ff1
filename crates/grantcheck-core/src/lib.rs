//! # grantcheck-core
//!
//! Deterministic quality checks and sanitizing for generated grant proposal
//! text.
//!
//! This crate answers two questions about a block of model output:
//! - What is wrong with it? ([`check`])
//! - What does it look like with the letter framing and placeholders removed?
//!   ([`sanitize`])
//!
//! ## Key Guarantees
//!
//! 1. **Total**: neither operation fails, for any string input
//! 2. **No I/O, no LLM calls**: both are pure functions of their arguments
//! 3. **Idempotent sanitizing**: `sanitize(sanitize(s)) == sanitize(s)`
//! 4. **Ordered issues**: issues come back in detection order
//!
//! ## Example
//!
//! ```rust
//! use grantcheck_core::{check, sanitize, CheckConfig, ProposalInput};
//!
//! let input = ProposalInput::new().with("project_title", "Wetland Restoration");
//! let config = CheckConfig::introduction();
//! let raw = "Dear Funder,\nThe Wetland Restoration project...\nSincerely,\nJane";
//!
//! for issue in check(raw, &input, &config) {
//!     eprintln!("warning: {}", issue);
//! }
//! assert_eq!(sanitize(raw), "The Wetland Restoration project...");
//! ```

pub mod checks;
pub mod config;
pub mod evidence;
pub mod export;
pub mod input;
pub mod issue;
pub mod report;
pub mod sanitizer;

// Re-export main types at crate root
pub use checks::{Check, CheckRequest, Checker};
pub use config::{CheckConfig, CheckProfile, ConfigError, HeadingSpec};
pub use evidence::{Evidence, EvidenceSource};
pub use export::{export, ExportError, ExportFormat, ExportedDocument, Exporter};
pub use input::{InputError, ProposalField, ProposalInput};
pub use issue::{Issue, IssueKind};
pub use report::CheckReport;
pub use sanitizer::Sanitizer;

/// Check generated text against the configured rules.
///
/// Runs every check in order and returns the issues found; an empty vector
/// means the text passed.
pub fn check(text: &str, input: &ProposalInput, config: &CheckConfig) -> Vec<Issue> {
    Checker::new().run(&CheckRequest::new(text, input, config))
}

/// Like [`check`], with word count and timestamp attached.
pub fn check_report(text: &str, input: &ProposalInput, config: &CheckConfig) -> CheckReport {
    let issues = check(text, input, config);
    CheckReport::new(text, issues, (config.min_words, config.max_words))
}

/// Remove greetings, sign-offs, bracket placeholders, and excess whitespace
/// using the default sign-off keywords.
pub fn sanitize(text: &str) -> String {
    Sanitizer::new().sanitize(text)
}
