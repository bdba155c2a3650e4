//! Configuration module for pdfcombine.
//!
//! Holds the per-file transform types, the document-level options handed to
//! the assembly planner, and the run configuration the CLI validates before
//! merging. The option types are `serde`-enabled so a whole job can be
//! described in a JSON manifest.

use std::{fmt, path::PathBuf, str::FromStr};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::PdfCombineError;

/// Clockwise page rotation in degrees.
///
/// Serialized as plain integer degrees (`0`, `90`, `180`, `270`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// No rotation.
    #[default]
    None,
    /// Rotate 90 degrees clockwise.
    Clockwise90,
    /// Rotate 180 degrees.
    Rotate180,
    /// Rotate 270 degrees clockwise (90 counter-clockwise).
    Clockwise270,
}

impl Rotation {
    /// Parse rotation from degrees.
    ///
    /// # Arguments
    ///
    /// * `degrees` - Rotation in degrees: 0, 90, 180, or 270
    ///
    /// # Errors
    ///
    /// Returns an error if the degrees value is not a quarter turn.
    pub fn from_degrees(degrees: u16) -> crate::Result<Self> {
        match degrees {
            0 => Ok(Self::None),
            90 => Ok(Self::Clockwise90),
            180 => Ok(Self::Rotate180),
            270 => Ok(Self::Clockwise270),
            _ => Err(PdfCombineError::invalid_config(format!(
                "Invalid rotation: {degrees}. Must be 0, 90, 180, or 270"
            ))),
        }
    }

    /// Get rotation as degrees.
    pub fn as_degrees(&self) -> u16 {
        match self {
            Self::None => 0,
            Self::Clockwise90 => 90,
            Self::Rotate180 => 180,
            Self::Clockwise270 => 270,
        }
    }

    /// The next quarter turn clockwise, wrapping 270 back to 0.
    pub fn rotate_clockwise(self) -> Self {
        match self {
            Self::None => Self::Clockwise90,
            Self::Clockwise90 => Self::Rotate180,
            Self::Rotate180 => Self::Clockwise270,
            Self::Clockwise270 => Self::None,
        }
    }

    /// Add this rotation to a page's stored `/Rotate` value, mod 360.
    ///
    /// The stored value comes straight from a source document and may be
    /// negative or larger than a full turn.
    pub fn compose(self, existing: i64) -> i64 {
        (existing + i64::from(self.as_degrees())).rem_euclid(360)
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PdfCombineError;

    fn try_from(degrees: u16) -> crate::Result<Self> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.as_degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.as_degrees())
    }
}

/// PDF metadata to set on the output document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.subject.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    ///
    /// Empty and whitespace-only values mean "do not set" and become `None`.
    pub fn new(title: Option<String>, author: Option<String>, subject: Option<String>) -> Self {
        Self {
            title: non_blank(title),
            author: non_blank(author),
            subject: non_blank(subject),
        }
    }

    /// Re-apply the blank filtering of [`Metadata::new`].
    ///
    /// Deserialized metadata bypasses the constructor, so manifests can carry
    /// `""` for a field the user left empty.
    pub fn normalized(self) -> Self {
        Self::new(self.title, self.author, self.subject)
    }

    /// Overlay `other` on top of `self`, field by field.
    pub fn merged_with(self, other: Metadata) -> Self {
        Self {
            title: other.title.or(self.title),
            author: other.author.or(self.author),
            subject: other.subject.or(self.subject),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
}

/// Rule for inserting empty pages into the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlankPagePolicy {
    /// Never insert blank pages.
    #[default]
    None,
    /// One blank page after each PDF input.
    AfterEveryFile,
    /// One blank page after each PDF input that contributed an odd number of
    /// pages, so the next file starts on a right-hand page when printed
    /// duplex.
    AfterFilesWithOddPageCount,
    /// A blank page after each of these 1-based output page numbers. `0`
    /// puts a blank page in front of the first page.
    AfterOutputPages(Vec<usize>),
}

/// Horizontal placement of page-number stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPosition {
    /// Bottom-left corner.
    Left,
    /// Bottom, horizontally centred.
    #[default]
    Center,
    /// Bottom-right corner.
    Right,
}

impl FromStr for NumberPosition {
    type Err = PdfCombineError;

    /// Parse a position from `"left"`, `"center"` or `"right"`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(PdfCombineError::InvalidConfig {
                message: format!("Invalid number position: {s}. Must be one of: left, center, right"),
            }),
        }
    }
}

/// Page-number stamp settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageNumbering {
    /// Where the stamp sits along the bottom edge.
    pub position: NumberPosition,
    /// Text template. `{n}` is the 1-based page number and `{total}` the
    /// final page count.
    pub format: String,
}

impl PageNumbering {
    /// Default stamp template.
    pub const DEFAULT_FORMAT: &'static str = "Page {n} of {total}";
}

impl Default for PageNumbering {
    fn default() -> Self {
        Self {
            position: NumberPosition::default(),
            format: Self::DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Document-level options for one merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentOptions {
    /// Info dictionary fields.
    pub metadata: Metadata,
    /// Blank page insertion rule.
    pub blank_pages: BlankPagePolicy,
    /// Page-number stamps, if enabled.
    pub page_numbering: Option<PageNumbering>,
    /// Base name of the output file.
    pub output_filename: String,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            metadata: Metadata::default(),
            blank_pages: BlankPagePolicy::default(),
            page_numbering: None,
            output_filename: Self::DEFAULT_FILENAME.to_string(),
        }
    }
}

impl DocumentOptions {
    /// Output base name used when none is given.
    pub const DEFAULT_FILENAME: &'static str = "merged";

    /// File name to save the merged document under.
    ///
    /// ```
    /// use pdfcombine::config::DocumentOptions;
    ///
    /// let mut options = DocumentOptions::default();
    /// assert_eq!(options.output_file_name(), "merged.pdf");
    /// options.output_filename = "Report.PDF".into();
    /// assert_eq!(options.output_file_name(), "Report.PDF");
    /// ```
    pub fn output_file_name(&self) -> String {
        let name = self.output_filename.trim();
        let name = if name.is_empty() {
            Self::DEFAULT_FILENAME
        } else {
            name
        };

        if name.to_lowercase().ends_with(".pdf") {
            name.to_string()
        } else {
            format!("{name}.pdf")
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Run configuration for a command-line merge.
///
/// Per-file settings live on the queued descriptors and document settings in
/// [`DocumentOptions`]; this only covers where the result goes and how the
/// run reports.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output PDF file path.
    pub output: PathBuf,

    /// Dry run mode - print the build plan without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,
}

impl Config {
    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if self.inputs.iter().any(|input| input == &self.output) {
            bail!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            );
        }

        Ok(())
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
