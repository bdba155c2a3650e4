//! Merge entry point.
//!
//! [`Merger`] plans the output for a file queue and realizes the plan on a
//! blocking task, returning the serialized document together with the plan
//! it followed.

use std::time::{Duration, Instant};

use tokio::task;

use crate::config::DocumentOptions;
use crate::error::{PdfCombineError, Result};
use crate::io::format_file_size;
use crate::merge::assembler::Assembler;
use crate::plan::{BuildPlan, build_plan};
use crate::queue::FileDescriptor;

/// Statistics about a merge operation.
#[derive(Debug, Clone)]
pub struct MergeStatistics {
    /// Number of queued files that contributed pages.
    pub files_merged: usize,

    /// Total number of pages in merged document.
    pub total_pages: usize,

    /// Inserted blank pages.
    pub blank_pages: usize,

    /// Pages rendered from images.
    pub image_pages: usize,

    /// Total time taken for merge.
    pub merge_time: Duration,

    /// Size of the serialized output in bytes.
    pub output_size: u64,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug)]
pub struct MergeResult {
    /// The merged PDF, serialized.
    pub bytes: Vec<u8>,

    /// Plan the document was built from.
    pub plan: BuildPlan,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Combines queued files into one document.
#[derive(Debug, Clone, Default)]
pub struct Merger;

impl Merger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merge `files` in order under `options`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::NoFilesToMerge`] for an empty queue. Any
    /// failure while building the document aborts the merge; no partial
    /// output is returned.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfcombine::merge::Merger;
    /// # use pdfcombine::config::DocumentOptions;
    /// # use pdfcombine::queue::FileDescriptor;
    /// # async fn example(files: Vec<FileDescriptor>) -> Result<(), Box<dyn std::error::Error>> {
    /// let result = Merger::new().merge(&files, &DocumentOptions::default()).await?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge(
        &self,
        files: &[FileDescriptor],
        options: &DocumentOptions,
    ) -> Result<MergeResult> {
        if files.is_empty() {
            return Err(PdfCombineError::NoFilesToMerge);
        }

        let start = Instant::now();
        let plan = build_plan(files, options);
        tracing::info!(
            files = files.len(),
            pages = plan.page_count(),
            blank = plan.blank_pages(),
            images = plan.image_pages(),
            numbered = plan.post.page_numbering.is_some(),
            "Planned merge"
        );

        let bytes = {
            let plan = plan.clone();
            let files = files.to_vec();
            task::spawn_blocking(move || Assembler::realize(&plan, &files))
                .await
                .map_err(|e| PdfCombineError::merge_failed(format!("Merge task failed: {e}")))??
        };

        let statistics = MergeStatistics {
            files_merged: plan.sources().len(),
            total_pages: plan.page_count(),
            blank_pages: plan.blank_pages(),
            image_pages: plan.image_pages(),
            merge_time: start.elapsed(),
            output_size: bytes.len() as u64,
        };
        tracing::debug!(
            bytes = statistics.output_size,
            elapsed_ms = statistics.merge_time.as_millis() as u64,
            "Merge finished"
        );

        Ok(MergeResult {
            bytes,
            plan,
            statistics,
        })
    }
}
