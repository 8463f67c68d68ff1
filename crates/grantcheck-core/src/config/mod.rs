//! Check configuration.
//!
//! A `CheckConfig` captures what differs between proposal variants: word
//! bounds, required headings, grounding fields, and the missing-value marker.
//! Configurations come from built-in presets or from profile files validated
//! against a JSON Schema.

mod headings;
mod profile;
mod schema;

pub use headings::HeadingSpec;
pub use profile::{
    CheckConfig, CheckProfile, ConfigError, DEFAULT_MISSING_MARKER,
    DEFAULT_MISSING_MARKER_THRESHOLD, DEFAULT_SIGNOFFS,
};
pub use schema::{validate_profile_schema, SchemaError};
