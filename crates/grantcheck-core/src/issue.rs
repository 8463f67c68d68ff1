//! Issues reported by the checker.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::evidence::Evidence;

/// Which check produced an issue.
///
/// Variants are listed in the order the checker runs them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Greeting,
    SignOff,
    BracketPlaceholder,
    MissingHeadings,
    WordCount,
    ExcessiveMissingMarker,
    TitleNotEchoed,
    Ungrounded,
}

impl IssueKind {
    /// Short label used in CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Greeting => "greeting",
            IssueKind::SignOff => "sign-off",
            IssueKind::BracketPlaceholder => "brackets",
            IssueKind::MissingHeadings => "headings",
            IssueKind::WordCount => "length",
            IssueKind::ExcessiveMissingMarker => "missing-marker",
            IssueKind::TitleNotEchoed => "title",
            IssueKind::Ungrounded => "grounding",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected quality problem.
///
/// `Display` yields the human-readable message only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<Evidence>,
}

impl Issue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            evidence: Vec::new(),
        }
    }

    /// Attach evidence.
    pub fn with_evidence(mut self, evidence: impl IntoIterator<Item = Evidence>) -> Self {
        self.evidence.extend(evidence);
        self
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let issue = Issue::new(IssueKind::Greeting, "contains a greeting")
            .with_evidence([Evidence::from_text("Greeting", 0, 11)]);
        assert_eq!(issue.to_string(), "contains a greeting");
        assert_eq!(issue.evidence.len(), 1);
    }

    #[test]
    fn test_serialization_skips_empty_evidence() {
        let issue = Issue::new(IssueKind::WordCount, "too short");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["kind"], "word_count");
        assert!(json.get("evidence").is_none());
    }
}
