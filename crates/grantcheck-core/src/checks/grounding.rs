//! Grounding checks: does the text use what the user supplied?
//!
//! Three signals, from coarse to fine:
//! - the missing-value marker shows up too often (input was too thin)
//! - the project title is not repeated anywhere
//! - none of the descriptive fields left a trace in the text

use crate::evidence::Evidence;
use crate::issue::{Issue, IssueKind};

use super::patterns::{key_terms, marker_matches};
use super::{Check, CheckRequest};

/// Key terms are words longer than this many characters.
const KEY_TERM_MIN_LEN: usize = 3;

/// Key terms taken from each grounding field.
const KEY_TERMS_PER_FIELD: usize = 3;

/// Reports heavy use of the missing-value marker.
pub struct MissingMarkerCheck;

impl Check for MissingMarkerCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::ExcessiveMissingMarker
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let config = request.config;
        if config.missing_marker.trim().is_empty() {
            return None;
        }

        let matches = marker_matches(request.text, &config.missing_marker);
        if matches.len() < config.missing_marker_threshold {
            return None;
        }

        let evidence = matches.iter().map(|m| {
            Evidence::from_text(
                format!("Marker '{}'", config.missing_marker),
                m.start,
                m.end,
            )
        });

        Some(
            Issue::new(
                self.kind(),
                format!(
                    "uses '{}' {} times; supply more detail in the input",
                    config.missing_marker,
                    matches.len()
                ),
            )
            .with_evidence(evidence),
        )
    }
}

/// Reports a non-empty title that the text never repeats.
pub struct TitleEchoCheck;

impl Check for TitleEchoCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::TitleNotEchoed
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let title = request.input.title();
        if title.is_empty() || request.text.to_lowercase().contains(&title.to_lowercase()) {
            return None;
        }

        Some(
            Issue::new(
                self.kind(),
                format!("project title '{}' is not mentioned", title),
            )
            .with_evidence([Evidence::from_input("Title not found in text", "project_title")]),
        )
    }
}

/// Reports text that references none of the configured input fields.
///
/// A field is touched when any of its first three words longer than three
/// characters appears in the text. Empty fields, and fields with no such
/// words, are never touched. The issue fires when no configured field is;
/// an empty field list turns the check off.
pub struct GroundingCheck;

impl Check for GroundingCheck {
    fn kind(&self) -> IssueKind {
        IssueKind::Ungrounded
    }

    fn inspect(&self, request: &CheckRequest<'_>) -> Option<Issue> {
        let fields = request.config.grounding_fields.as_ref()?;
        if fields.is_empty() {
            return None;
        }
        let text = request.text.to_lowercase();

        let touched = fields.iter().any(|field| {
            key_terms(request.input.get(field), KEY_TERM_MIN_LEN, KEY_TERMS_PER_FIELD)
                .iter()
                .any(|t| text.contains(t.as_str()))
        });
        if touched {
            return None;
        }

        let evidence = fields
            .iter()
            .map(|f| Evidence::from_input("No key term referenced", f));

        Some(
            Issue::new(
                self.kind(),
                "text appears generic: none of the supplied project or funder details are referenced",
            )
            .with_evidence(evidence),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckConfig;
    use crate::input::ProposalInput;

    fn inspect(
        check: &dyn Check,
        text: &str,
        input: &ProposalInput,
        config: &CheckConfig,
    ) -> Option<Issue> {
        check.inspect(&CheckRequest::new(text, input, config))
    }

    #[test]
    fn test_marker_threshold() {
        let config = CheckConfig::default();
        let input = ProposalInput::new();

        let four = "Budget: TBD. Staff: TBD. Dates: TBD. Partners: TBD.";
        let issue = inspect(&MissingMarkerCheck, four, &input, &config).unwrap();
        assert!(issue.message.contains("4 times"));
        assert_eq!(issue.evidence.len(), 4);

        let three = "TBD TBD TBD";
        assert!(inspect(&MissingMarkerCheck, three, &input, &config).is_some());

        let two = "Budget: TBD. Staff: TBD.";
        assert!(inspect(&MissingMarkerCheck, two, &input, &config).is_none());
    }

    #[test]
    fn test_custom_marker() {
        let config = CheckConfig::default().with_missing_marker("N/A", 2);
        let input = ProposalInput::new();
        assert!(inspect(&MissingMarkerCheck, "N/A and N/A", &input, &config).is_some());
    }

    #[test]
    fn test_title_echo() {
        let config = CheckConfig::default();
        let input = ProposalInput::new().with("project_title", "Wetland Restoration");

        assert!(inspect(&TitleEchoCheck, "We plant reeds.", &input, &config).is_some());
        assert!(inspect(
            &TitleEchoCheck,
            "THE WETLAND RESTORATION PROJECT",
            &input,
            &config
        )
        .is_none());
    }

    #[test]
    fn test_title_echo_skipped_without_title() {
        let config = CheckConfig::default();
        let input = ProposalInput::new();
        assert!(inspect(&TitleEchoCheck, "Anything", &input, &config).is_none());
    }

    #[test]
    fn test_grounding_touched() {
        let config = CheckConfig::introduction();
        let input = ProposalInput::new()
            .with("project_description", "restore coastal marshes near Tampa")
            .with("funder_mission", "protect biodiversity");

        let text = "Our work will protect the marshes.";
        assert!(inspect(&GroundingCheck, text, &input, &config).is_none());
    }

    #[test]
    fn test_grounding_generic_text() {
        let config = CheckConfig::introduction();
        let input = ProposalInput::new()
            .with("project_description", "restore coastal marshes near Tampa")
            .with("funder_mission", "protect biodiversity");

        let issue = inspect(
            &GroundingCheck,
            "This project will make a difference in the community.",
            &input,
            &config,
        )
        .unwrap();
        assert!(issue.message.contains("generic"));
        assert_eq!(issue.evidence.len(), 5);
    }

    #[test]
    fn test_grounding_only_first_three_terms() {
        let config = CheckConfig::introduction();
        let input = ProposalInput::new().with(
            "project_description",
            "restore coastal marshes through volunteer planting",
        );

        // "volunteer" is the fourth key term and does not count
        let issue = inspect(&GroundingCheck, "Volunteer days.", &input, &config);
        assert!(issue.is_some());
    }

    #[test]
    fn test_grounding_skipped_when_disabled() {
        let input = ProposalInput::new().with("project_description", "restore marshes");
        let full = CheckConfig::full_proposal();
        assert!(inspect(&GroundingCheck, "", &input, &full).is_none());

        let none = CheckConfig::introduction().with_grounding_fields(Vec::<String>::new());
        assert!(inspect(&GroundingCheck, "", &input, &none).is_none());
    }

    #[test]
    fn test_grounding_short_words_never_touch() {
        let config = CheckConfig::introduction();
        let input = ProposalInput::new()
            .with("project_description", "fix the bay")
            .with("funder_mission", "aid");

        let issue = inspect(
            &GroundingCheck,
            "Generic words about the community.",
            &input,
            &config,
        )
        .unwrap();
        assert_eq!(issue.kind, IssueKind::Ungrounded);
    }

    #[test]
    fn test_grounding_empty_input_is_ungrounded() {
        let config = CheckConfig::introduction();
        let issue = inspect(&GroundingCheck, "Any text at all.", &ProposalInput::new(), &config)
            .unwrap();
        assert_eq!(issue.evidence.len(), 5);
    }

    #[test]
    fn test_marker_threshold_zero_always_fires() {
        let config = CheckConfig::default().with_missing_marker("TBD", 0);
        let issue = inspect(&MissingMarkerCheck, "Nothing missing here.", &ProposalInput::new(), &config)
            .unwrap();
        assert!(issue.message.contains("0 times"));
        assert!(issue.evidence.is_empty());
    }

    #[test]
    fn test_punctuation_marker() {
        let config = CheckConfig::default().with_missing_marker("???", 3);
        let input = ProposalInput::new();

        let text = "Budget ??? staff ??? dates ??? partners ???";
        let issue = inspect(&MissingMarkerCheck, text, &input, &config).unwrap();
        assert!(issue.message.contains("4 times"));

        // A longer run of question marks is not the marker
        assert!(inspect(&MissingMarkerCheck, "What???? Why???? How????", &input, &config).is_none());
    }
}
