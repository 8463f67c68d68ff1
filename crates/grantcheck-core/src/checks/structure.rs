//! Structural checks: required headings and length bounds.

use crate::evidence::Evidence;
use crate::issue::{Issue, IssueKind};

use super::patterns::{heading_pattern, word_count};
use super::{Check, CheckRequest};

/// Reports required headings that do not appear alone on a line.
pub struct HeadingCheck;

impl Check for HeadingCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::MissingHeadings
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let spec = request.config.required_headings.as_ref()?;

        let missing: Vec<(usize, &str)> = spec
            .iter()
            .enumerate()
            .filter(|(_, heading)| {
                heading_pattern(heading)
                    .map(|p| !p.is_match(request.text))
                    .unwrap_or(false)
            })
            .collect();

        if missing.is_empty() {
            return None;
        }

        let names: Vec<&str> = missing.iter().map(|(_, h)| *h).collect();
        let evidence = missing.iter().map(|(i, h)| {
            Evidence::from_config(format!("Heading '{}' not found", h), format!("required_headings[{}]", i))
        });

        Some(
            Issue::new(
                self.kind(),
                format!("missing required headings: {}", names.join(", ")),
            )
            .with_evidence(evidence),
        )
    }
}

/// Reports text shorter than `min_words` or longer than `max_words`.
pub struct WordCountCheck;

impl Check for WordCountCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::WordCount
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let config = request.config;
        let count = word_count(request.text);

        let problem = if count < config.min_words {
            "too short"
        } else if count > config.max_words {
            "too long"
        } else {
            return None;
        };

        Some(Issue::new(
            self.kind(),
            format!(
                "{}: {} words (expected {}-{})",
                problem, count, config.min_words, config.max_words
            ),
        ))
    }
}
