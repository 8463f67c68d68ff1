use grantcheck_core::checks::patterns::{DEFAULT_SIGNOFF, GREETING_START};
use grantcheck_core::{check, sanitize, CheckConfig, HeadingSpec, IssueKind, ProposalInput};
use proptest::prelude::*;

fn kinds(text: &str, input: &ProposalInput, config: &CheckConfig) -> Vec<IssueKind> {
    check(text, input, config).into_iter().map(|i| i.kind).collect()
}

fn non_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Text shaped like model output: words, punctuation, brackets, line breaks.
fn proposal_like() -> impl Strategy<Value = String> {
    let token = prop::sample::select(vec![
        "Dear", "dear", "Sincerely", "Best", "regards", "Regards", "[", "]", "TBD", "\n", "\r\n",
        " ", "\t", "#",
    ])
    .prop_map(str::to_string);
    let piece = prop_oneof![token, "[a-zA-Z]{1,8}", "[.,;:!?]"];
    prop::collection::vec(piece, 0..60).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn sanitize_is_idempotent(text in proposal_like()) {
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_is_idempotent_on_arbitrary_strings(text in any::<String>()) {
        let once = sanitize(&text);
        prop_assert_eq!(sanitize(&once), once);
    }

    #[test]
    fn sanitize_output_has_no_artifacts(text in proposal_like()) {
        let out = sanitize(&text);
        prop_assert!(!GREETING_START.is_match(&out));
        prop_assert!(!DEFAULT_SIGNOFF.is_match(&out));
        prop_assert!(!out.contains("\n\n\n"));
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.trim(), out.as_str());
    }

    #[test]
    fn sanitize_changes_only_whitespace_on_clean_text(text in "[a-zA-Z0-9.,;:!? \t\n]{0,200}") {
        prop_assume!(!GREETING_START.is_match(&text));
        prop_assume!(!DEFAULT_SIGNOFF.is_match(&text));

        let out = sanitize(&text);
        prop_assert_eq!(non_whitespace(&out), non_whitespace(&text));
    }

    #[test]
    fn check_never_panics(text in any::<String>(), title in any::<String>()) {
        let input = ProposalInput::new()
            .with("project_title", &title)
            .with("project_description", &title);
        let _ = check(&text, &input, &CheckConfig::introduction());
        let _ = check(&text, &input, &CheckConfig::full_proposal());
    }
}

#[test]
fn empty_text_and_input_fail_length_and_grounding() {
    let input = ProposalInput::new();
    let found = kinds("", &input, &CheckConfig::introduction());

    assert_eq!(found, vec![IssueKind::WordCount, IssueKind::Ungrounded]);

    let issues = check("", &input, &CheckConfig::introduction());
    assert!(issues[0].message.contains("0 words"));
}

#[test]
fn fields_without_key_terms_leave_text_ungrounded() {
    let config = CheckConfig::introduction().with_word_range(0, 1000);
    let input = ProposalInput::new()
        .with("project_description", "fix the bay")
        .with("funder_mission", "aid");

    let found = kinds("Generic words about the community.", &input, &config);
    assert_eq!(found, vec![IssueKind::Ungrounded]);
}

#[test]
fn punctuation_marker_is_counted() {
    let config = CheckConfig::introduction()
        .with_word_range(0, 1000)
        .with_grounding_fields(Vec::<String>::new())
        .with_missing_marker("???", 3);
    let found = kinds(
        "Budget ??? staff ??? dates ??? partners ???",
        &ProposalInput::new(),
        &config,
    );
    assert!(found.contains(&IssueKind::ExcessiveMissingMarker));
}

#[test]
fn letter_framing_is_stripped() {
    assert_eq!(
        sanitize("Dear Funder,\nWe are pleased...\nSincerely,\nJane"),
        "We are pleased..."
    );
}

#[test]
fn reports_only_missing_headings() {
    let config = CheckConfig::introduction()
        .with_word_range(0, 1000)
        .with_headings(HeadingSpec::new(["Executive Summary", "Conclusion"]));
    let text = "Executive Summary\nWe restore wetlands along the river.";

    let issues = check(text, &ProposalInput::new(), &config);
    let headings: Vec<_> = issues
        .iter()
        .filter(|i| i.kind == IssueKind::MissingHeadings)
        .collect();

    assert_eq!(headings.len(), 1);
    assert_eq!(headings[0].message, "missing required headings: Conclusion");
}

#[test]
fn missing_marker_threshold() {
    let config = CheckConfig::introduction().with_word_range(0, 1000);
    let input = ProposalInput::new();

    let four = "Budget TBD. Staff TBD. Start date TBD. Partners TBD.";
    assert!(kinds(four, &input, &config).contains(&IssueKind::ExcessiveMissingMarker));

    let two = "Budget TBD. Staff TBD.";
    assert!(!kinds(two, &input, &config).contains(&IssueKind::ExcessiveMissingMarker));
}

#[test]
fn title_echo_is_case_insensitive() {
    let config = CheckConfig::introduction().with_word_range(0, 1000);
    let input = ProposalInput::new().with("project_title", "Wetland Restoration");

    let missing = kinds("We will plant native reeds.", &input, &config);
    assert!(missing.contains(&IssueKind::TitleNotEchoed));

    let echoed = kinds("WETLAND RESTORATION begins in May.", &input, &config);
    assert!(!echoed.contains(&IssueKind::TitleNotEchoed));
}

#[test]
fn word_count_boundary() {
    let config = CheckConfig::introduction().with_word_range(10, 20);
    let input = ProposalInput::new();
    let words = |n: usize| vec!["word"; n].join(" ");

    assert!(!kinds(&words(10), &input, &config).contains(&IssueKind::WordCount));
    assert!(!kinds(&words(20), &input, &config).contains(&IssueKind::WordCount));

    let short = check(&words(9), &input, &config);
    assert!(short.iter().any(|i| i.message.starts_with("too short: 9 words")));

    let long = check(&words(21), &input, &config);
    assert!(long.iter().any(|i| i.message.starts_with("too long: 21 words")));
}

#[test]
fn sanitized_text_passes_artifact_checks() {
    let raw = "Dear Review Committee,\n\n\n\
               The  [Organization Name] requests support for Wetland Restoration.\n\n\
               Best regards,\n[Your Name]";
    let input = ProposalInput::new()
        .with("project_title", "Wetland Restoration")
        .with("project_description", "restore wetland habitat along the river");
    let config = CheckConfig::introduction().with_word_range(0, 1000);

    let before = kinds(raw, &input, &config);
    assert!(before.contains(&IssueKind::Greeting));
    assert!(before.contains(&IssueKind::SignOff));
    assert!(before.contains(&IssueKind::BracketPlaceholder));

    let clean = sanitize(raw);
    assert_eq!(clean, "The requests support for Wetland Restoration.");
    assert!(kinds(&clean, &input, &config).is_empty());
}
