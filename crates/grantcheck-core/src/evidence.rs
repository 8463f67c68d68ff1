//! Evidence attached to issues.
//!
//! An issue message is meant for a person. Evidence tells tooling where the
//! problem sits: a byte range of the checked text, an input field, or a
//! configuration entry.

use serde::{Deserialize, Serialize};

/// Where a piece of evidence points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    /// The generated text being checked
    Text,
    /// A field of the proposal input
    Input,
    /// The check configuration
    Config,
}

/// A piece of evidence supporting an issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    /// What this evidence shows
    pub claim: String,

    /// Where the evidence comes from
    pub source: EvidenceSource,

    /// Pointer to the location (e.g., "text[12:31]", "input.project_title")
    pub pointer: String,
}

impl Evidence {
    /// Evidence for a byte range of the checked text.
    pub fn from_text(claim: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            claim: claim.into(),
            source: EvidenceSource::Text,
            pointer: format!("text[{}:{}]", start, end),
        }
    }

    /// Evidence for an input field.
    pub fn from_input(claim: impl Into<String>, field: impl AsRef<str>) -> Self {
        Self {
            claim: claim.into(),
            source: EvidenceSource::Input,
            pointer: format!("input.{}", field.as_ref()),
        }
    }

    /// Evidence for a configuration entry.
    pub fn from_config(claim: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            claim: claim.into(),
            source: EvidenceSource::Config,
            pointer: path.into(),
        }
    }

    /// Byte range of a text pointer, if this evidence points into the text.
    pub fn text_range(&self) -> Option<(usize, usize)> {
        if self.source != EvidenceSource::Text {
            return None;
        }
        let inner = self.pointer.strip_prefix("text[")?.strip_suffix(']')?;
        let (start, end) = inner.split_once(':')?;
        Some((start.parse().ok()?, end.parse().ok()?))
    }
}
