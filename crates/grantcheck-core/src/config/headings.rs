//! Required section headings for full proposals.

use serde::{Deserialize, Serialize};

/// Ordered list of section headings a proposal must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HeadingSpec(Vec<String>);

impl HeadingSpec {
    pub fn new<I, S>(headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(headings.into_iter().map(Into::into).collect())
    }

    /// Sections of a full grant proposal, in document order.
    pub fn full_proposal() -> Self {
        Self::new([
            "Executive Summary",
            "Needs Statement",
            "Goals and Objectives",
            "Methods and Approach",
            "Evaluation Plan",
            "Budget Overview",
            "Sustainability",
            "Conclusion",
        ])
    }

    pub fn headings(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HeadingSpec {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_proposal_order() {
        let spec = HeadingSpec::full_proposal();
        assert_eq!(spec.len(), 8);
        assert_eq!(spec.headings().first().map(String::as_str), Some("Executive Summary"));
        assert_eq!(spec.headings().last().map(String::as_str), Some("Conclusion"));
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let spec = HeadingSpec::new(["Executive Summary", "Conclusion"]);
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json, serde_json::json!(["Executive Summary", "Conclusion"]));
    }
}
