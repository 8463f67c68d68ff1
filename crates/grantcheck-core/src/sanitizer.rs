//! Sanitizer: rewrites generated text into something that can be shown and
//! exported as a proposal section.
//!
//! Steps, in order:
//! 1. Drop every line whose first word is "Dear"
//! 2. Cut the text at the first sign-off keyword
//! 3. Remove `[...]` placeholders
//! 4. Collapse 3+ line breaks into one blank line
//! 5. Collapse runs of spaces/tabs into one space
//! 6. Trim
//!
//! A removal can occasionally form a new match for an earlier step
//! ("Sin[x]cerely" becomes "Sincerely"), so the pass repeats until the text
//! stops changing. Every step only deletes or shortens, which bounds the
//! loop by the input length.

use std::borrow::Cow;

use regex::Regex;

use crate::checks::patterns::{
    signoff_pattern, BRACKET_SPAN, DEFAULT_SIGNOFF, EXCESS_LINE_BREAKS, GREETING_LINE,
    HORIZONTAL_RUN,
};

/// Removes greetings, sign-offs, placeholders, and excess whitespace.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    signoff: Option<Regex>,
}

impl Sanitizer {
    /// Sanitizer using the default sign-off keywords.
    pub fn new() -> Self {
        Self {
            signoff: Some(DEFAULT_SIGNOFF.clone()),
        }
    }

    /// Sanitizer with a custom sign-off list; an empty list disables truncation.
    pub fn with_signoffs<I, S>(signoffs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            signoff: signoff_pattern(signoffs),
        }
    }

    /// Sanitize text. Never fails; the result is a fixed point.
    pub fn sanitize(&self, text: &str) -> String {
        let mut current = text.to_string();
        let mut passes = 0usize;

        loop {
            let next = self.pass(&current);
            passes += 1;
            if next == current {
                break;
            }
            current = next;
        }

        tracing::debug!(
            input_len = text.len(),
            output_len = current.len(),
            passes,
            "Sanitized proposal text"
        );

        current
    }

    /// One application of the six steps.
    fn pass(&self, text: &str) -> String {
        let text = GREETING_LINE.replace_all(text, "");
        let text = self.truncate_at_signoff(text);
        let text = BRACKET_SPAN.replace_all(&text, "");
        let text = EXCESS_LINE_BREAKS.replace_all(&text, "\n\n");
        let text = HORIZONTAL_RUN.replace_all(&text, " ");
        text.trim().to_string()
    }

    fn truncate_at_signoff<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> {
        let Some(pattern) = &self.signoff else {
            return text;
        };
        match pattern.find(&text) {
            Some(m) => Cow::Owned(text[..m.start()].to_string()),
            None => text,
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(text: &str) -> String {
        Sanitizer::new().sanitize(text)
    }

    #[test]
    fn test_letter_frame_removed() {
        assert_eq!(
            clean("Dear Funder,\nWe are pleased...\nSincerely,\nJane"),
            "We are pleased..."
        );
    }

    #[test]
    fn test_indented_greeting_line_removed() {
        assert_eq!(clean("Title\n   dear committee,\nBody"), "Title\nBody");
    }

    #[test]
    fn test_greeting_word_inside_line_kept() {
        assert_eq!(clean("Our dear partners help."), "Our dear partners help.");
    }

    #[test]
    fn test_truncates_at_first_signoff() {
        assert_eq!(
            clean("Body text.\n\nBest regards,\nThe Team\nSincerely"),
            "Body text."
        );
    }

    #[test]
    fn test_brackets_removed_non_greedy() {
        assert_eq!(
            clean("Funded by [Funder Name] in [Year]."),
            "Funded by in ."
        );
    }

    #[test]
    fn test_nested_brackets_leave_tail() {
        assert_eq!(clean("a [b [c] d] e"), "a d] e");
    }

    #[test]
    fn test_whitespace_normalized() {
        assert_eq!(
            clean("  First\tparagraph   here.\n\n\n\nSecond  one.  "),
            "First\tparagraph here.\n\nSecond one."
        );
    }

    #[test]
    fn test_bracket_removal_revealing_signoff() {
        let once = clean("Body.\nSin[x]cerely, Jane");
        assert_eq!(once, "Body.");
        assert_eq!(clean(&once), once);
    }

    #[test]
    fn test_custom_signoffs() {
        let sanitizer = Sanitizer::with_signoffs(["Sincerely"]);
        assert_eq!(
            sanitizer.sanitize("With regards to scope.\nSincerely"),
            "With regards to scope."
        );

        let disabled = Sanitizer::with_signoffs(Vec::<String>::new());
        assert_eq!(disabled.sanitize("Body\nSincerely"), "Body\nSincerely");
    }

    #[test]
    fn test_empty_and_blank() {
        assert_eq!(clean(""), "");
        assert_eq!(clean(" \n\n\t "), "");
    }
}
