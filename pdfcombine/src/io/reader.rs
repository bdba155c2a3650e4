//! Input intake.
//!
//! Reads files and classifies them into queue entries:
//! - PDFs are parsed once to learn their page count. A document that does
//!   not parse is still queued, with zero pages, so it contributes nothing.
//! - PNG and JPEG images are probed for their pixel size.
//! - Other images are queued without size information and skipped when
//!   planning.
//! - Anything else is rejected.
//!
//! # Examples
//!
//! ```no_run
//! use pdfcombine::io::reader::SourceReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = SourceReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("scan.png")];
//! let files = reader.load_paths(&paths).await?;
//! for file in &files {
//!     println!("{}: {} page(s)", file.name(), file.page_count);
//! }
//! # Ok(())
//! # }
//! ```

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use lopdf::Document;
use tokio::task;

use crate::error::{PdfCombineError, Result};
use crate::queue::{FileDescriptor, ImageFormat, ImageInfo, SourceFile};

/// How many leading bytes may precede the `%PDF-` header.
const PDF_HEADER_WINDOW: usize = 1024;

/// Extensions accepted as images even when the content is not PNG or JPEG.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff",
];

/// What the first bytes and the name say a file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sniffed {
    Pdf,
    Image(Option<ImageFormat>),
    Unsupported,
}

/// Reads input files into [`FileDescriptor`]s.
#[derive(Debug, Clone, Default)]
pub struct SourceReader;

impl SourceReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Classify in-memory file contents.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name; its extension is used when the content is
    ///   not recognised
    /// * `bytes` - File contents
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::UnsupportedFile`] if the input is neither a
    /// PDF nor an image.
    pub async fn probe(&self, name: impl Into<String>, bytes: Vec<u8>) -> Result<FileDescriptor> {
        let name = name.into();

        match sniff(&name, &bytes) {
            Sniffed::Pdf => {
                let source = Arc::new(SourceFile::new(name, bytes));
                let page_count = count_pages(Arc::clone(&source)).await?;
                Ok(FileDescriptor::pdf(source, page_count))
            }
            Sniffed::Image(format) => {
                let info = format.and_then(|format| image_info(&name, &bytes, format));
                let mut source = SourceFile::new(name, bytes);
                source.image = info;
                Ok(FileDescriptor::image(Arc::new(source)))
            }
            Sniffed::Unsupported => Err(PdfCombineError::unsupported_file(name)),
        }
    }

    /// Read and classify one file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not supported.
    pub async fn load_path(&self, path: &Path) -> Result<FileDescriptor> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PdfCombineError::file_not_found(path.to_path_buf()),
            _ => PdfCombineError::FileNotAccessible {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.probe(name, bytes).await
    }

    /// Read and classify files one after another, in order.
    ///
    /// Stops at the first file that cannot be read or is not supported.
    pub async fn load_paths(&self, paths: &[PathBuf]) -> Result<Vec<FileDescriptor>> {
        let start = Instant::now();
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            files.push(self.load_path(path).await?);
        }

        tracing::debug!(
            files = files.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded inputs"
        );
        Ok(files)
    }
}

/// Image signatures are checked first: they sit at offset 0, while the PDF
/// header may appear anywhere in the first bytes, image metadata included.
fn sniff(name: &str, bytes: &[u8]) -> Sniffed {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => return Sniffed::Image(Some(ImageFormat::Png)),
        Ok(image::ImageFormat::Jpeg) => return Sniffed::Image(Some(ImageFormat::Jpeg)),
        Ok(_) => return Sniffed::Image(None),
        Err(_) => {}
    }

    let head = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if head.windows(5).any(|window| window == b"%PDF-") {
        return Sniffed::Pdf;
    }

    let extension = Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match extension.as_deref() {
        Some("pdf") => Sniffed::Pdf,
        Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => Sniffed::Image(None),
        _ => Sniffed::Unsupported,
    }
}

/// Parse a PDF on a blocking task and count its pages.
///
/// A parse failure is not an error here: the file is kept with zero pages.
async fn count_pages(source: Arc<SourceFile>) -> Result<usize> {
    let outcome = task::spawn_blocking(move || {
        Document::load_mem(&source.bytes)
            .map(|doc| doc.get_pages().len())
            .map_err(|e| (source.name.clone(), e.to_string()))
    })
    .await
    .map_err(|e| PdfCombineError::other(format!("Load task failed: {e}")))?;

    match outcome {
        Ok(pages) => {
            tracing::debug!(pages, "Probed PDF");
            Ok(pages)
        }
        Err((name, reason)) => {
            tracing::warn!(file = %name, %reason, "Could not load PDF, it will contribute no pages");
            Ok(0)
        }
    }
}

fn image_info(name: &str, bytes: &[u8], format: ImageFormat) -> Option<ImageInfo> {
    let dimensions = image::ImageReader::with_format(Cursor::new(bytes), format.as_image_format())
        .into_dimensions();

    match dimensions {
        Ok((width, height)) => Some(ImageInfo {
            format,
            width,
            height,
        }),
        Err(e) => {
            tracing::warn!(file = %name, reason = %e, "Could not read image size, it will be skipped");
            None
        }
    }
}
