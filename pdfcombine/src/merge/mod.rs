//! PDF merging operations.
//!
//! This module turns a [`BuildPlan`](crate::plan::BuildPlan) into a document:
//! - [`assembler`]: page tree construction and page copying
//! - [`pages`]: inherited attributes and reference copying
//! - [`images`]: image pages
//! - [`numbering`]: page-number stamps
//! - [`metadata`]: the Info dictionary
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::config::DocumentOptions;
//! use pdfcombine::io::SourceReader;
//! use pdfcombine::merge::Merger;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = SourceReader::new()
//!     .load_paths(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
//!     .await?;
//!
//! let result = Merger::new().merge(&files, &DocumentOptions::default()).await?;
//! println!("Merged {} pages", result.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod images;
pub mod merger;
pub mod metadata;
pub mod numbering;
pub mod pages;

pub use assembler::Assembler;
pub use merger::{MergeResult, MergeStatistics, Merger};
pub use metadata::MetadataManager;

use crate::config::DocumentOptions;
use crate::error::Result;
use crate::queue::FileDescriptor;

/// Merge `files` and return the serialized document with its statistics.
///
/// Convenience function that creates a merger and performs the merge.
///
/// # Errors
///
/// Returns an error if any merge step fails.
pub async fn merge_files(
    files: &[FileDescriptor],
    options: &DocumentOptions,
) -> Result<(Vec<u8>, MergeStatistics)> {
    let result = Merger::new().merge(files, options).await?;
    Ok((result.bytes, result.statistics))
}
