//! Prompt templates for proposal generation.
//!
//! Templates use `{field}` placeholders. A placeholder names either a
//! proposal input field or one of the reserved variables filled from the
//! check configuration:
//!
//! - `missing_marker`: the token the model should write for unknown facts
//! - `min_words` / `max_words`: the target length
//! - `required_headings`: comma-separated heading list
//!
//! Keeping length, headings and the marker in the prompt means the
//! generated text is asked for under the same rules it is checked against.

use grantcheck_core::{CheckConfig, ProposalInput};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use thiserror::Error;

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([a-z_][a-z0-9_]*)\}").unwrap();
}

const RESERVED: [&str; 4] = ["missing_marker", "min_words", "max_words", "required_headings"];

/// System message sent ahead of every rendered prompt.
pub const SYSTEM_PROMPT: &str = "You are an experienced grant writer for environmental \
conservation projects. You write persuasive, specific proposal text grounded only in the \
details you are given. You never invent names, figures, dates or partners.";

const INTRODUCTION_TEMPLATE: &str = "Write a compelling grant proposal introduction for a \
project titled '{project_title}'. The project aims to {project_description}. Key objectives \
of the project include: {project_objectives}. The funder has the following mission: \
{funder_mission}, with focus areas in {funder_focus_areas}. Proposals must align with these \
requirements: {funder_requirements}. Ensure the introduction highlights how the project \
aligns with the funder's priorities and demonstrates measurable impacts.

Write between {min_words} and {max_words} words of plain prose. Mention the project title. \
Do not open with a greeting such as \"Dear\" and do not close with a sign-off or signature. \
Do not use square-bracket placeholders. Where a fact is unknown, write {missing_marker} \
instead of inventing it.";

const FULL_PROPOSAL_TEMPLATE: &str = "Write a complete grant proposal for the project \
'{project_title}'.

Project description: {project_description}
Objectives: {project_objectives}
Target audience: {target_audience}
Methods: {methods}
Expected outcomes: {outcomes}
Evaluation: {evaluation}
Budget: {budget}
Timeline: {timeline}
Sustainability: {sustainability}
Organization overview: {org_overview}
Risks: {risks}

Funder mission: {funder_mission}
Funder focus areas: {funder_focus_areas}
Funder requirements: {funder_requirements}

Use exactly these section headings, each on its own line and in this order: \
{required_headings}. Write between {min_words} and {max_words} words in total. \
Do not open with a greeting or close with a sign-off. Do not use square-bracket \
placeholders. Where a fact is unknown, write {missing_marker} instead of inventing it.";

/// Errors from rendering prompts.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    #[error("missing required fields: {}", .missing.join(", "))]
    Incomplete { missing: Vec<String> },

    #[error("unknown template '{0}' (expected intro or full)")]
    UnknownTemplate(String),
}

/// A named prompt with `{field}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    pub template: String,
    /// Refuse to render when any input variable is empty.
    pub require_all: bool,
}

impl PromptTemplate {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            require_all: false,
        }
    }

    pub fn requiring_all(mut self) -> Self {
        self.require_all = true;
        self
    }

    /// The six-field grant introduction prompt. All fields are required.
    pub fn introduction() -> Self {
        Self::new("introduction", INTRODUCTION_TEMPLATE).requiring_all()
    }

    /// Full proposal prompt; empty fields are rendered as the missing marker.
    pub fn full_proposal() -> Self {
        Self::new("full_proposal", FULL_PROPOSAL_TEMPLATE)
    }

    /// Look up a built-in template.
    pub fn by_name(name: &str) -> Result<Self, PromptError> {
        match name {
            "intro" | "introduction" => Ok(Self::introduction()),
            "full" | "full_proposal" | "full-proposal" => Ok(Self::full_proposal()),
            other => Err(PromptError::UnknownTemplate(other.to_string())),
        }
    }

    /// Input fields referenced by the template, in first-use order.
    pub fn input_variables(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.template) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !RESERVED.contains(&name) && !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }

    /// Fill placeholders from the input and check configuration.
    pub fn render(&self, input: &ProposalInput, config: &CheckConfig) -> Result<String, PromptError> {
        if self.require_all {
            let variables = self.input_variables();
            let missing = input.missing(&variables[..]);
            if !missing.is_empty() {
                return Err(PromptError::Incomplete {
                    missing: missing.into_iter().map(str::to_string).collect(),
                });
            }
        }

        let headings = config
            .required_headings
            .as_ref()
            .map(|spec| spec.headings().join(", "))
            .unwrap_or_default();

        let rendered = PLACEHOLDER.replace_all(&self.template, |caps: &Captures| {
            match &caps[1] {
                "missing_marker" => config.missing_marker.clone(),
                "min_words" => config.min_words.to_string(),
                "max_words" => config.max_words.to_string(),
                "required_headings" => headings.clone(),
                field => match input.get(field) {
                    "" => config.missing_marker.clone(),
                    value => value.to_string(),
                },
            }
        });

        Ok(rendered.into_owned())
    }
}
