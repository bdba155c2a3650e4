//! pdfcombine - Combine PDFs and images into a single document.
//!
//! This library builds one PDF out of an ordered queue of PDF and image
//! files. It supports:
//!
//! - Per-file page ranges, rotation and image scaling
//! - Blank page insertion for duplex printing
//! - Page-number stamps
//! - Document metadata
//! - JSON job manifests
//!
//! Work happens in two stages. [`plan::build_plan`] turns the queue and the
//! [`config::DocumentOptions`] into a [`plan::BuildPlan`], a pure and
//! serializable description of every output page. [`merge::Merger`] then
//! realizes that plan with `lopdf`.
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use pdfcombine::config::{BlankPagePolicy, DocumentOptions, PageNumbering};
//! use pdfcombine::io::{PdfWriter, SourceReader};
//! use pdfcombine::merge::Merger;
//! use std::path::{Path, PathBuf};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut files = SourceReader::new()
//!     .load_paths(&[PathBuf::from("a.pdf"), PathBuf::from("scan.jpg")])
//!     .await?;
//! files[0].page_range = "1-3".to_string();
//!
//! let options = DocumentOptions {
//!     blank_pages: BlankPagePolicy::AfterFilesWithOddPageCount,
//!     page_numbering: Some(PageNumbering::default()),
//!     ..Default::default()
//! };
//!
//! let result = Merger::new().merge(&files, &options).await?;
//! PdfWriter::new()
//!     .save(result.bytes, Path::new(&options.output_file_name()))
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing Page Ranges
//!
//! ```
//! use pdfcombine::editor::PageSetEditor;
//! use pdfcombine::range::parse_range;
//!
//! let mut editor = PageSetEditor::new();
//! let range = editor.remove("1-5", 5, 1).unwrap();
//! assert_eq!(range, "1, 3, 4, 5");
//! assert_eq!(parse_range(&range, 5), vec![0, 2, 3, 4]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod editor;
pub mod error;
pub mod io;
pub mod manifest;
pub mod merge;
pub mod plan;
pub mod queue;
pub mod range;

// Re-export commonly used types
pub use config::{Config, DocumentOptions};
pub use error::{PdfCombineError, Result};
pub use manifest::JobManifest;
pub use merge::Merger;
pub use plan::{BuildPlan, PageOp, build_plan};
pub use queue::{FileDescriptor, FileId, FileQueue};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
