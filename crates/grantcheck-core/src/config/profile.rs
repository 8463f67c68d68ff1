//! Check configuration and profile parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::headings::HeadingSpec;
use super::schema::validate_profile_schema;
use crate::input::ProposalField;

/// Default missing-value marker.
pub const DEFAULT_MISSING_MARKER: &str = "TBD";

/// Default number of marker occurrences that triggers an issue.
pub const DEFAULT_MISSING_MARKER_THRESHOLD: usize = 3;

/// Default sign-off keywords.
pub const DEFAULT_SIGNOFFS: [&str; 3] = ["Sincerely", "Best regards", "Regards"];

/// Errors that can occur when loading a check profile.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read profile file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Profile does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Profile validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown profile: {0}")]
    UnknownProfile(String),
}

fn default_marker() -> String {
    DEFAULT_MISSING_MARKER.to_string()
}

fn default_threshold() -> usize {
    DEFAULT_MISSING_MARKER_THRESHOLD
}

fn default_signoffs() -> Vec<String> {
    DEFAULT_SIGNOFFS.iter().map(|s| s.to_string()).collect()
}

/// Settings for one checker run.
///
/// Per-variant differences (length bounds, heading checks, grounding) live
/// here rather than in separate code paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Headings that must appear alone on a line; `None` skips the check
    #[serde(default)]
    pub required_headings: Option<HeadingSpec>,

    /// Inclusive lower word bound
    pub min_words: usize,

    /// Inclusive upper word bound
    pub max_words: usize,

    /// Token the generator uses for unknown facts
    #[serde(default = "default_marker")]
    pub missing_marker: String,

    /// Marker count at which an issue is raised
    #[serde(default = "default_threshold")]
    pub missing_marker_threshold: usize,

    /// Input fields whose content must be referenced; `None` skips the check
    #[serde(default)]
    pub grounding_fields: Option<Vec<String>>,

    /// Sign-off keywords, matched case-insensitively as whole words
    #[serde(default = "default_signoffs")]
    pub signoffs: Vec<String>,
}

impl CheckConfig {
    /// Bounds for a short grant introduction, with grounding enabled.
    pub fn introduction() -> Self {
        Self {
            required_headings: None,
            min_words: 140,
            max_words: 260,
            missing_marker: default_marker(),
            missing_marker_threshold: default_threshold(),
            grounding_fields: Some(
                ProposalField::GROUNDING
                    .iter()
                    .map(|f| f.key().to_string())
                    .collect(),
            ),
            signoffs: default_signoffs(),
        }
    }

    /// Bounds and headings for a full proposal.
    pub fn full_proposal() -> Self {
        Self {
            required_headings: Some(HeadingSpec::full_proposal()),
            min_words: 600,
            max_words: 1200,
            missing_marker: default_marker(),
            missing_marker_threshold: default_threshold(),
            grounding_fields: None,
            signoffs: default_signoffs(),
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "intro" | "introduction" => Ok(Self::introduction()),
            "full" | "full_proposal" | "full-proposal" => Ok(Self::full_proposal()),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }

    pub fn with_word_range(mut self, min_words: usize, max_words: usize) -> Self {
        self.min_words = min_words;
        self.max_words = max_words;
        self
    }

    pub fn with_headings(mut self, headings: HeadingSpec) -> Self {
        self.required_headings = Some(headings);
        self
    }

    pub fn with_grounding_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grounding_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_missing_marker(mut self, marker: impl Into<String>, threshold: usize) -> Self {
        self.missing_marker = marker.into();
        self.missing_marker_threshold = threshold;
        self
    }

    pub fn with_signoffs<I, S>(mut self, signoffs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signoffs = signoffs.into_iter().map(Into::into).collect();
        self
    }

    /// Semantic checks the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_words > self.max_words {
            return Err(ConfigError::ValidationError(format!(
                "min_words ({}) exceeds max_words ({})",
                self.min_words, self.max_words
            )));
        }

        if self.missing_marker_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "missing_marker_threshold must be at least 1".to_string(),
            ));
        }

        if let Some(headings) = &self.required_headings {
            if headings.iter().any(|h| h.trim().is_empty()) {
                return Err(ConfigError::ValidationError(
                    "required_headings contains a blank heading".to_string(),
                ));
            }
        }

        if self.signoffs.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "signoffs contains a blank keyword".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self::introduction()
    }
}

/// A named check configuration as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub check: CheckConfig,
}

impl CheckProfile {
    /// Wrap a configuration with a name.
    pub fn named(name: impl Into<String>, check: CheckConfig) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
            check,
        }
    }

    /// Parse a profile from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a profile from JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load a profile file, choosing the parser by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        validate_profile_schema(&value).map_err(ConfigError::SchemaError)?;
        let profile: CheckProfile = serde_json::from_value(value)?;
        profile.check.validate()?;
        Ok(profile)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
