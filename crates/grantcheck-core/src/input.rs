//! Proposal input: the form values a prompt is filled with.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading proposal input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported input file extension: {0}")]
    UnsupportedFormat(String),
}

/// Well-known proposal fields.
///
/// Any other field name is accepted by [`ProposalInput`]; these are the ones
/// prompts, presets, and the CLI know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProposalField {
    ProjectTitle,
    ProjectDescription,
    ProjectObjectives,
    FunderMission,
    FunderFocusAreas,
    FunderRequirements,
    TargetAudience,
    Methods,
    Outcomes,
    Evaluation,
    Budget,
    Timeline,
    Sustainability,
    OrgOverview,
    Risks,
}

impl ProposalField {
    /// Every well-known field, in form order.
    pub const ALL: [ProposalField; 15] = [
        ProposalField::ProjectTitle,
        ProposalField::ProjectDescription,
        ProposalField::ProjectObjectives,
        ProposalField::FunderMission,
        ProposalField::FunderFocusAreas,
        ProposalField::FunderRequirements,
        ProposalField::TargetAudience,
        ProposalField::Methods,
        ProposalField::Outcomes,
        ProposalField::Evaluation,
        ProposalField::Budget,
        ProposalField::Timeline,
        ProposalField::Sustainability,
        ProposalField::OrgOverview,
        ProposalField::Risks,
    ];

    /// The six fields of the introduction form.
    pub const INTRODUCTION: [ProposalField; 6] = [
        ProposalField::ProjectTitle,
        ProposalField::ProjectDescription,
        ProposalField::ProjectObjectives,
        ProposalField::FunderMission,
        ProposalField::FunderFocusAreas,
        ProposalField::FunderRequirements,
    ];

    /// Descriptive fields whose content should show up in generated text.
    pub const GROUNDING: [ProposalField; 5] = [
        ProposalField::ProjectDescription,
        ProposalField::ProjectObjectives,
        ProposalField::FunderMission,
        ProposalField::FunderFocusAreas,
        ProposalField::FunderRequirements,
    ];

    /// Key used in input maps and prompt placeholders.
    pub fn key(&self) -> &'static str {
        match self {
            ProposalField::ProjectTitle => "project_title",
            ProposalField::ProjectDescription => "project_description",
            ProposalField::ProjectObjectives => "project_objectives",
            ProposalField::FunderMission => "funder_mission",
            ProposalField::FunderFocusAreas => "funder_focus_areas",
            ProposalField::FunderRequirements => "funder_requirements",
            ProposalField::TargetAudience => "target_audience",
            ProposalField::Methods => "methods",
            ProposalField::Outcomes => "outcomes",
            ProposalField::Evaluation => "evaluation",
            ProposalField::Budget => "budget",
            ProposalField::Timeline => "timeline",
            ProposalField::Sustainability => "sustainability",
            ProposalField::OrgOverview => "org_overview",
            ProposalField::Risks => "risks",
        }
    }

    /// Question shown when collecting this field from a person.
    pub fn prompt(&self) -> &'static str {
        match self {
            ProposalField::ProjectTitle => "Enter the project title",
            ProposalField::ProjectDescription => "Provide a brief description of the project",
            ProposalField::ProjectObjectives => {
                "List the key objectives of the project (separate by commas)"
            }
            ProposalField::FunderMission => "What is the mission of the funder?",
            ProposalField::FunderFocusAreas => "What are the focus areas of the funder?",
            ProposalField::FunderRequirements => "What are the requirements of the funder?",
            ProposalField::TargetAudience => "Who is the target audience?",
            ProposalField::Methods => "Describe the methods and approach",
            ProposalField::Outcomes => "What outcomes do you expect?",
            ProposalField::Evaluation => "How will success be evaluated?",
            ProposalField::Budget => "Summarize the budget",
            ProposalField::Timeline => "Outline the timeline",
            ProposalField::Sustainability => "How will the project be sustained?",
            ProposalField::OrgOverview => "Give a short overview of your organization",
            ProposalField::Risks => "What are the main risks and mitigations?",
        }
    }

    /// Look up a well-known field by key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }
}

impl fmt::Display for ProposalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Form values keyed by field name.
///
/// Values are trimmed on insertion. A missing key and an empty value mean
/// the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct ProposalInput {
    fields: BTreeMap<String, String>,
}

impl ProposalInput {
    /// Create an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.set(field, value);
        self
    }

    /// Set a field value.
    pub fn set(&mut self, field: impl AsRef<str>, value: impl AsRef<str>) {
        self.fields
            .insert(field.as_ref().to_string(), value.as_ref().trim().to_string());
    }

    /// Value of a field, empty when absent.
    pub fn get(&self, field: impl AsRef<str>) -> &str {
        self.fields
            .get(field.as_ref())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Value of a well-known field.
    pub fn field(&self, field: ProposalField) -> &str {
        self.get(field.key())
    }

    /// The project title, empty when not supplied.
    pub fn title(&self) -> &str {
        self.field(ProposalField::ProjectTitle)
    }

    /// Whether a field has a non-empty value.
    pub fn has(&self, field: impl AsRef<str>) -> bool {
        !self.get(field).is_empty()
    }

    /// Fields from `required` that are empty, in the order given.
    pub fn missing<'a, S: AsRef<str>>(&self, required: &'a [S]) -> Vec<&'a str> {
        required
            .iter()
            .map(AsRef::as_ref)
            .filter(|f| !self.has(f))
            .collect()
    }

    /// Iterate over all non-empty fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether every field is empty.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Parse input from a YAML mapping.
    pub fn from_yaml(yaml: &str) -> Result<Self, InputError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse input from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load input from a `.yaml`, `.yml` or `.json` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            Some("json") => Self::from_json(&contents),
            other => Err(InputError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl From<BTreeMap<String, String>> for ProposalInput {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut input = ProposalInput::new();
        for (k, v) in map {
            input.set(k, v);
        }
        input
    }
}

impl From<ProposalInput> for BTreeMap<String, String> {
    fn from(input: ProposalInput) -> Self {
        input.fields
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ProposalInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = ProposalInput::new();
        for (k, v) in iter {
            input.set(k, v);
        }
        input
    }
}
