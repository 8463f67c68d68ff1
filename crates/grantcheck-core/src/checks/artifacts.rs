//! Letter artifacts: greetings, sign-offs, and bracket placeholders.
//!
//! A proposal section is not a letter. Generators still open with
//! "Dear ..." and close with "Sincerely," often enough that these are the
//! most common findings.

use crate::evidence::Evidence;
use crate::issue::{Issue, IssueKind};

use super::patterns::{signoff_pattern, DEFAULT_SIGNOFF, GREETING_START};
use super::{Check, CheckRequest};

/// Flags a line that starts with "Dear".
pub struct GreetingCheck;

impl Check for GreetingCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::Greeting
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let m = GREETING_START.find(request.text)?;
        Some(
            Issue::new(self.kind(), "contains a greeting")
                .with_evidence([Evidence::from_text("Greeting line", m.start(), m.end())]),
        )
    }
}

/// Flags a sign-off keyword anywhere in the text.
pub struct SignOffCheck;

impl Check for SignOffCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::SignOff
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let custom;
        let pattern = if request.config.signoffs.is_empty() {
            return None;
        } else if is_default_signoffs(&request.config.signoffs) {
            &*DEFAULT_SIGNOFF
        } else {
            custom = signoff_pattern(&request.config.signoffs)?;
            &custom
        };

        let m = pattern.find(request.text)?;
        Some(
            Issue::new(self.kind(), "contains a sign-off").with_evidence([Evidence::from_text(
                format!("Sign-off '{}'", m.as_str()),
                m.start(),
                m.end(),
            )]),
        )
    }
}

fn is_default_signoffs(signoffs: &[String]) -> bool {
    signoffs.len() == crate::config::DEFAULT_SIGNOFFS.len()
        && signoffs
            .iter()
            .zip(crate::config::DEFAULT_SIGNOFFS)
            .all(|(a, b)| a == b)
}

/// Flags any `[` or `]` left in the text.
pub struct BracketCheck;

impl Check for BracketCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::BracketPlaceholder
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let start = request.text.find(['[', ']'])?;
        Some(
            Issue::new(self.kind(), "contains bracket placeholders")
                .with_evidence([Evidence::from_text("Bracket", start, start + 1)]),
        )
    }
}
