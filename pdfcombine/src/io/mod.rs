//! I/O operations for pdfcombine.
//!
//! - [`reader`]: reading inputs and probing them into queue entries
//! - [`writer`]: writing the merged document to disk

pub mod reader;
pub mod writer;

pub use reader::SourceReader;
pub use writer::{PdfWriter, WriteStatistics};

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
