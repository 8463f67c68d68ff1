//! Document export for sanitized proposal text.
//!
//! Text is split into paragraphs on blank lines and written out by an
//! [`Exporter`]. Markdown and plain text ship here; other formats (DOCX,
//! PDF) plug in behind the same trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Filename stem used when the title is empty.
pub const DEFAULT_FILENAME_STEM: &str = "proposal";

/// Errors from exporting.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

/// Supported download formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown; charset=utf-8",
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }

    /// The exporter for this format.
    pub fn exporter(&self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Markdown => Box::new(MarkdownExporter),
            ExportFormat::Text => Box::new(TextExporter),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Renders a titled list of paragraphs into a byte stream.
pub trait Exporter: Send + Sync {
    fn format(&self) -> ExportFormat;

    fn render(&self, title: &str, paragraphs: &[&str]) -> Vec<u8>;
}

/// Markdown: title as a level-one heading, paragraphs separated by blank lines.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn render(&self, title: &str, paragraphs: &[&str]) -> Vec<u8> {
        let mut out = String::new();
        let title = title.trim();
        if !title.is_empty() {
            out.push_str("# ");
            out.push_str(title);
            out.push_str("\n\n");
        }
        out.push_str(&paragraphs.join("\n\n"));
        out.push('\n');
        out.into_bytes()
    }
}

/// Plain text: title line, then paragraphs separated by blank lines.
pub struct TextExporter;

impl Exporter for TextExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Text
    }

    fn render(&self, title: &str, paragraphs: &[&str]) -> Vec<u8> {
        let mut blocks: Vec<&str> = Vec::with_capacity(paragraphs.len() + 1);
        let title = title.trim();
        if !title.is_empty() {
            blocks.push(title);
        }
        blocks.extend_from_slice(paragraphs);

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out.into_bytes()
    }
}

/// An exported document ready for download or writing to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    /// Write into `dir` under the document's filename.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Exported proposal");
        Ok(path)
    }
}

/// Split text into paragraphs on blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(text[s..end].trim());
            }
        } else {
            start.get_or_insert(line_start);
            end = offset;
        }
    }
    if let Some(s) = start {
        out.push(text[s..end].trim());
    }

    out
}

/// Filename for a title: whitespace becomes `_`, empty titles use "proposal".
pub fn export_filename(title: &str, extension: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect();

    let stem = if stem.is_empty() {
        DEFAULT_FILENAME_STEM
    } else {
        stem.as_str()
    };

    format!("{}.{}", stem, extension)
}

/// Export sanitized text in the given format.
pub fn export(text: &str, title: &str, format: ExportFormat) -> ExportedDocument {
    let paragraphs = paragraphs(text);
    let bytes = format.exporter().render(title, &paragraphs);

    ExportedDocument {
        filename: export_filename(title, format.extension()),
        content_type: format.content_type(),
        bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_split_on_blank_lines() {
        let text = "First line\ncontinues.\n\n  \nSecond.\n\n\nThird.";
        assert_eq!(
            paragraphs(text),
            vec!["First line\ncontinues.", "Second.", "Third."]
        );
        assert!(paragraphs("").is_empty());
        assert!(paragraphs("\n \n").is_empty());
    }

    #[test]
    fn test_filename_from_title() {
        assert_eq!(export_filename("Wetland Restoration", "md"), "Wetland_Restoration.md");
        assert_eq!(export_filename("  A\tB  ", "txt"), "A_B.txt");
        assert_eq!(export_filename("", "md"), "proposal.md");
        assert_eq!(export_filename("   ", "md"), "proposal.md");
        assert_eq!(export_filename("Air/Water", "md"), "Air_Water.md");
    }

    #[test]
    fn test_markdown_export() {
        let doc = export("One.\n\nTwo.", "River Guardians", ExportFormat::Markdown);
        assert_eq!(doc.filename, "River_Guardians.md");
        assert_eq!(
            String::from_utf8(doc.bytes).unwrap(),
            "# River Guardians\n\nOne.\n\nTwo.\n"
        );
    }

    #[test]
    fn test_text_export_without_title() {
        let doc = export("One.\n\nTwo.", "", ExportFormat::Text);
        assert_eq!(doc.filename, "proposal.txt");
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
        assert_eq!(String::from_utf8(doc.bytes).unwrap(), "One.\n\nTwo.\n");
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("MD".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_write_to_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let doc = export("Body.", "Test Export", ExportFormat::Text);
        let path = doc.write_to(dir.path().join("drafts")).unwrap();
        assert_eq!(path, dir.path().join("drafts").join("Test_Export.txt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Test Export\n\nBody.\n");
    }
}
