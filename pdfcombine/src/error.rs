//! Error types for pdfcombine.
//!
//! Range parsing, the page-set editor and the assembly planner never fail:
//! malformed input degrades to fewer pages. Errors only come from the edges
//! of the system, i.e. reading inputs, realizing a plan with the PDF backend
//! and writing the result.
//!
//! # Error Categories
//!
//! - **I/O Errors**: File not found, permission denied, etc.
//! - **Intake Errors**: Inputs that are neither PDFs nor images
//! - **Backend Errors**: Source documents or images the writer rejects
//! - **Configuration Errors**: Invalid manifests or argument combinations

use std::io;
use std::path::PathBuf;

use crate::queue::FileId;

/// Result type alias for pdfcombine operations.
pub type Result<T> = std::result::Result<T, PdfCombineError>;

/// Main error type for pdfcombine operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfCombineError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Input is neither a PDF nor an image.
    #[error(
        "Unsupported file type: {name}\n  \
         Hint: only PDF documents and PNG/JPEG images can be combined"
    )]
    UnsupportedFile {
        /// Display name of the rejected input.
        name: String,
    },

    /// No files were provided for merging.
    #[error("No input files specified for merging")]
    NoFilesToMerge,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to read a job manifest.
    #[error("Failed to read manifest: {}\n  Reason: {source}", .path.display())]
    FailedToReadManifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Job manifest is not valid JSON or has unexpected fields.
    #[error("Invalid manifest: {}\n  Details: {details}", .path.display())]
    InvalidManifest {
        /// Path to the manifest file.
        path: PathBuf,
        /// What the parser rejected.
        details: String,
    },

    /// The backend could not parse a source document while realizing a plan.
    #[error("Failed to load source document: {name}\n  Reason: {reason}")]
    SourceLoadFailed {
        /// Display name of the source.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A plan references a source that is not in the file list.
    #[error("Build plan references unknown source {id}")]
    UnknownSource {
        /// Identifier found in the plan.
        id: FileId,
    },

    /// A plan references a page the source document does not have.
    #[error("Source {name} has no page {}", .page_index + 1)]
    SourcePageMissing {
        /// Display name of the source.
        name: String,
        /// Zero-based page index that was requested.
        page_index: usize,
    },

    /// Image could not be decoded or embedded.
    #[error("Failed to embed image: {name}\n  Reason: {reason}")]
    ImageEmbedFailed {
        /// Display name of the image source.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// Stamp text contains characters the standard font cannot encode.
    #[error("Cannot encode page number text with the standard font: {text:?}")]
    UnencodableText {
        /// Text that was rejected.
        text: String,
    },

    /// The PDF backend failed while assembling the output.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Metadata operation failed.
    #[error("Failed to set metadata: {reason}")]
    MetadataFailed {
        /// Details about the failure.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for PdfCombineError {
    fn from(err: lopdf::Error) -> Self {
        Self::merge_failed(err.to_string())
    }
}

impl From<image::ImageError> for PdfCombineError {
    fn from(err: image::ImageError) -> Self {
        Self::image_embed_failed("image", err.to_string())
    }
}

impl From<serde_json::Error> for PdfCombineError {
    fn from(err: serde_json::Error) -> Self {
        Self::other(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for PdfCombineError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(err.to_string())
    }
}

impl PdfCombineError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an UnsupportedFile error.
    pub fn unsupported_file(name: impl Into<String>) -> Self {
        Self::UnsupportedFile { name: name.into() }
    }

    /// Create a SourceLoadFailed error.
    pub fn source_load_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceLoadFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an ImageEmbedFailed error.
    pub fn image_embed_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImageEmbedFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::FailedToReadManifest { .. } => 2,
            Self::UnsupportedFile { .. } => 3,
            Self::SourceLoadFailed { .. } => 3,
            Self::ImageEmbedFailed { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::InvalidManifest { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::UnencodableText { .. } => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::UnknownSource { .. } => 6,
            Self::SourcePageMissing { .. } => 6,
            Self::MergeFailed { .. } => 6,
            Self::MetadataFailed { .. } => 6,
            Self::Cancelled => 130,
            Self::Other { .. } => 1,
        }
    }
}
