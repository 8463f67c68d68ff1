//! Quality checks for generated proposal text.
//!
//! Each check answers one question about the text and reports at most one
//! issue. The [`Checker`] runs all of them, in a fixed order, every time:
//!
//! | # | Check | Issue kind |
//! |---|-------|------------|
//! | 1 | [`GreetingCheck`] | `Greeting` |
//! | 2 | [`SignOffCheck`] | `SignOff` |
//! | 3 | [`BracketCheck`] | `BracketPlaceholder` |
//! | 4 | [`HeadingCheck`] | `MissingHeadings` |
//! | 5 | [`WordCountCheck`] | `WordCount` |
//! | 6 | [`MissingMarkerCheck`] | `ExcessiveMissingMarker` |
//! | 7 | [`TitleEchoCheck`] | `TitleNotEchoed` |
//! | 8 | [`GroundingCheck`] | `Ungrounded` |
//!
//! Checks never fail. Empty text, empty input, or a check switched off in
//! the configuration all yield "no issue" or an ordinary issue.

mod artifacts;
mod grounding;
pub mod patterns;
mod structure;

pub use artifacts::{BracketCheck, GreetingCheck, SignOffCheck};
pub use grounding::{GroundingCheck, MissingMarkerCheck, TitleEchoCheck};
pub use structure::{HeadingCheck, WordCountCheck};

use crate::config::CheckConfig;
use crate::input::ProposalInput;
use crate::issue::{Issue, IssueKind};

/// Everything a check may look at.
#[derive(Debug, Clone, Copy)]
pub struct CheckRequest<'a> {
    pub text: &'a str,
    pub input: &'a ProposalInput,
    pub config: &'a CheckConfig,
}

impl<'a> CheckRequest<'a> {
    pub fn new(text: &'a str, input: &'a ProposalInput, config: &'a CheckConfig) -> Self {
        Self {
            text,
            input,
            config,
        }
    }
}

/// One independent quality rule.
pub trait Check: Send + Sync {
    /// The kind of issue this check reports.
    fn kind(&self) -> IssueKind;

    /// Inspect the request, returning an issue if the rule is broken.
    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue>;
}

/// Runs every check in order and collects their issues.
pub struct Checker {
    checks: Vec<Box<dyn Check>>,
}

impl Checker {
    /// The standard eight checks in detection order.
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(GreetingCheck),
                Box::new(SignOffCheck),
                Box::new(BracketCheck),
                Box::new(HeadingCheck),
                Box::new(WordCountCheck),
                Box::new(MissingMarkerCheck),
                Box::new(TitleEchoCheck),
                Box::new(GroundingCheck),
            ],
        }
    }

    /// Append a custom check after the standard ones.
    pub fn with_check(mut self, check: Box<dyn Check>) -> Self {
        self.checks.push(check);
        self
    }

    /// Run all checks. Never short-circuits.
    pub fn run(&self, request: &CheckRequest<'_>) -> Vec<Issue> {
        let issues: Vec<Issue> = self
            .checks
            .iter()
            .filter_map(|check| check.inspect(request))
            .collect();

        tracing::debug!(
            checks = self.checks.len(),
            issues = issues.len(),
            "Checked proposal text"
        );

        issues
    }
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}
