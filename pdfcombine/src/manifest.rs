//! JSON job manifests.
//!
//! A manifest describes a whole merge: the queued files with their per-file
//! settings, and the document options.
//!
//! ```json
//! {
//!   "files": [
//!     { "path": "cover.png", "scale": 0.5 },
//!     { "path": "report.pdf", "range": "1-3, 7", "rotation": 90 }
//!   ],
//!   "options": {
//!     "metadata": { "title": "Quarterly report" },
//!     "blank_pages": "after_files_with_odd_page_count",
//!     "page_numbering": { "position": "right" }
//!   }
//! }
//! ```
//!
//! Relative file paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{DocumentOptions, Rotation};
use crate::error::{PdfCombineError, Result};
use crate::io::SourceReader;
use crate::queue::FileQueue;

/// One queued file in a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFile {
    /// Input path.
    pub path: PathBuf,
    /// Page range string. Empty selects every page.
    #[serde(default)]
    pub range: String,
    /// Extra clockwise rotation in degrees.
    #[serde(default)]
    pub rotation: Rotation,
    /// Image scale factor.
    #[serde(default)]
    pub scale: Option<f32>,
}

/// A merge job read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobManifest {
    /// Files in merge order.
    #[serde(default)]
    pub files: Vec<ManifestFile>,
    /// Document options.
    #[serde(default)]
    pub options: DocumentOptions,
}

impl JobManifest {
    /// Read a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::FailedToReadManifest`] if the file cannot be
    /// read and [`PdfCombineError::InvalidManifest`] if it does not parse.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            PdfCombineError::FailedToReadManifest {
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        let mut manifest = Self::from_json(&text, path)?;
        if let Some(base) = path.parent() {
            manifest.resolve_paths(base);
        }

        tracing::debug!(
            path = %path.display(),
            files = manifest.files.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Parse manifest JSON. `origin` is only used in error messages.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| PdfCombineError::InvalidManifest {
            path: origin.to_path_buf(),
            details: e.to_string(),
        })
    }

    /// Make relative file paths relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        for file in &mut self.files {
            if file.path.is_relative() {
                file.path = base.join(&file.path);
            }
        }
    }

    /// Read every listed file and queue it with its settings.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be read or is not supported.
    pub async fn load_queue(&self, reader: &SourceReader) -> Result<FileQueue> {
        let mut queue = FileQueue::new();
        for entry in &self.files {
            let mut file = reader.load_path(&entry.path).await?;
            file.page_range = entry.range.clone();
            file.rotation = entry.rotation;
            if entry.scale.is_some() {
                file.scale = entry.scale;
            }
            queue.push(file);
        }
        Ok(queue)
    }
}
