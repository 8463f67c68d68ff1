//! Check report: issues plus the context they were found in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::checks::patterns::word_count;
use crate::issue::{Issue, IssueKind};

/// Result of one checker run, ready to serialize or display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// Issues in detection order
    pub issues: Vec<Issue>,

    /// Word tokens in the checked text
    pub word_count: usize,

    /// Inclusive word bounds that applied
    pub expected_words: (usize, usize),

    /// When the check ran
    pub checked_at: DateTime<Utc>,
}

impl CheckReport {
    pub(crate) fn new(text: &str, issues: Vec<Issue>, expected_words: (usize, usize)) -> Self {
        Self {
            issues,
            word_count: word_count(text),
            expected_words,
            checked_at: Utc::now(),
        }
    }

    /// No issues were found.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Whether an issue of the given kind was reported.
    pub fn has(&self, kind: IssueKind) -> bool {
        self.issues.iter().any(|i| i.kind == kind)
    }

    /// Issue messages in order.
    pub fn messages(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.message.as_str()).collect()
    }

    /// One line per issue, prefixed with its kind.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return format!("no issues ({} words)", self.word_count);
        }
        self.issues
            .iter()
            .map(|i| format!("[{}] {}", i.kind, i.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_report() {
        let report = CheckReport::new("three short words", vec![], (1, 10));
        assert!(report.is_clean());
        assert_eq!(report.word_count, 3);
        assert_eq!(report.summary(), "no issues (3 words)");
    }

    #[test]
    fn test_summary_lists_kinds() {
        let report = CheckReport::new(
            "Dear all",
            vec![
                Issue::new(IssueKind::Greeting, "contains a greeting"),
                Issue::new(IssueKind::WordCount, "too short: 2 words (expected 5-9)"),
            ],
            (5, 9),
        );
        assert!(report.has(IssueKind::Greeting));
        assert!(!report.has(IssueKind::SignOff));
        assert_eq!(
            report.summary(),
            "[greeting] contains a greeting\n[length] too short: 2 words (expected 5-9)"
        );
    }
}
