//! Shared text patterns for the checker and the sanitizer.
//!
//! Both components must agree on what a greeting, a sign-off, or a bracket
//! placeholder is, so the patterns live here and nowhere else.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::DEFAULT_SIGNOFFS;

/// Horizontal whitespace: any whitespace except line breaks.
const HSPACE: &str = r"[^\S\r\n]";

lazy_static! {
    /// A line whose first word is "Dear" (start of match only).
    pub static ref GREETING_START: Regex = Regex::new(
        &format!(r"(?im)^{HSPACE}*dear\b")
    ).unwrap();

    /// A whole "Dear ..." line including its trailing line break.
    pub static ref GREETING_LINE: Regex = Regex::new(
        &format!(r"(?im)^{HSPACE}*dear\b.*(?:\r?\n|$)")
    ).unwrap();

    /// Default sign-off keywords as one pattern.
    pub static ref DEFAULT_SIGNOFF: Regex = signoff_pattern(DEFAULT_SIGNOFFS)
        .expect("default sign-off keywords are non-empty");

    /// `[` up to the next `]`, non-nested.
    pub static ref BRACKET_SPAN: Regex = Regex::new(r"\[[^\]]*\]").unwrap();

    /// Three or more consecutive line breaks.
    pub static ref EXCESS_LINE_BREAKS: Regex = Regex::new(r"(?:\r?\n){3,}").unwrap();

    /// Two or more spaces or tabs.
    pub static ref HORIZONTAL_RUN: Regex = Regex::new(r"[ \t]{2,}").unwrap();

    /// A word token: a run of letters, digits, or underscores.
    pub static ref WORD: Regex = Regex::new(r"\w+").unwrap();
}

/// Compile a case-insensitive whole-word pattern for sign-off keywords.
///
/// Spaces inside a keyword match any run of horizontal whitespace, so
/// "Best regards" also matches "Best  regards". Returns `None` for an empty
/// keyword list.
pub fn signoff_pattern<I, S>(keywords: I) -> Option<Regex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let alternatives: Vec<String> = keywords
        .into_iter()
        .map(|k| {
            k.as_ref()
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(&format!("{HSPACE}+"))
        })
        .filter(|k| !k.is_empty())
        .collect();

    if alternatives.is_empty() {
        return None;
    }

    Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
}

/// Compile a pattern for a heading alone on its line.
///
/// Up to three leading `#` markers and surrounding horizontal whitespace are
/// allowed; matching is case-insensitive.
pub fn heading_pattern(heading: &str) -> Option<Regex> {
    let body = heading
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(&format!("{HSPACE}+"));

    if body.is_empty() {
        return None;
    }

    Regex::new(&format!(
        r"(?im)^{HSPACE}*(?:#{{1,3}}{HSPACE}*)?{body}{HSPACE}*\r?$"
    ))
    .ok()
}

/// Byte ranges of the missing-value marker in `text`, case-sensitive.
///
/// A match must stand alone: the character on each side may be neither a
/// word character nor a repeat of the marker's edge character. So "TBD"
/// does not match inside "TBDs", and "???" does not match inside "????".
pub fn marker_matches(text: &str, marker: &str) -> Vec<Range<usize>> {
    let marker = marker.trim();
    let (Some(first), Some(last)) = (marker.chars().next(), marker.chars().next_back()) else {
        return Vec::new();
    };

    let standalone = |neighbor: Option<char>, edge: char| match neighbor {
        None => true,
        Some(c) => !is_word_char(c) && c != edge,
    };

    text.match_indices(marker)
        .map(|(start, m)| start..start + m.len())
        .filter(|r| {
            standalone(text[..r.start].chars().next_back(), first)
                && standalone(text[r.end..].chars().next(), last)
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Count word tokens.
pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// The first `limit` word tokens longer than `min_len` characters, lowercased.
pub fn key_terms(text: &str, min_len: usize, limit: usize) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() > min_len)
        .take(limit)
        .map(str::to_lowercase)
        .collect()
}
