//! Command-line definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use grantcheck_core::ExportFormat;

#[derive(Parser, Debug)]
#[command(
    name = "grantcheck",
    version,
    about = "Check, clean up and generate grant proposal text"
)]
pub struct Cli {
    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report quality issues in generated text (exit code 1 when any are found)
    Check {
        /// Preset name (intro, full) or path to a profile file
        #[arg(long, default_value = "intro")]
        profile: String,

        /// Proposal input file (YAML or JSON) used for title and grounding checks
        #[arg(long)]
        input: Option<PathBuf>,

        /// Text file to check, or "-" for stdin
        text: Option<PathBuf>,
    },

    /// Strip greetings, sign-offs, placeholders and excess whitespace
    Sanitize {
        /// Preset or profile file supplying the sign-off keywords
        #[arg(long, default_value = "intro")]
        profile: String,

        /// Text file to clean, or "-" for stdin
        text: Option<PathBuf>,
    },

    /// Render a generation prompt without calling a model
    Prompt {
        /// Built-in template: intro or full
        #[arg(long, default_value = "intro")]
        template: String,

        /// Proposal input file (YAML or JSON)
        #[arg(long)]
        input: PathBuf,

        /// Preset or profile file; defaults to the template's preset
        #[arg(long)]
        profile: Option<String>,
    },

    /// Generate a draft with a hosted model, then check and sanitize it
    Generate {
        #[arg(long, default_value = "intro")]
        template: String,

        /// Proposal input file; prompts on stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,

        #[arg(long)]
        profile: Option<String>,

        /// Provider type (openai, anthropic)
        #[arg(long, default_value = "openai")]
        provider: String,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        temperature: Option<f32>,

        /// Request timeout, e.g. "45s" or "2m"
        #[arg(long)]
        timeout: Option<String>,

        /// Also export the sanitized draft in this format
        #[arg(long, requires = "out")]
        export: Option<ExportFormat>,

        /// Directory for the exported file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write text as a Markdown or plain-text document
    Export {
        #[arg(long, default_value = "markdown")]
        format: ExportFormat,

        /// Document title, also used for the filename
        #[arg(long, default_value = "")]
        title: String,

        /// Preset or profile file supplying the sign-off keywords
        #[arg(long, default_value = "intro")]
        profile: String,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,

        /// Text file to export, or "-" for stdin
        text: Option<PathBuf>,
    },

    /// Inspect check profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print a preset as YAML
    Show {
        /// Preset name: intro or full
        name: String,
    },
}
