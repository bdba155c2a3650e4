//! Reading inputs from disk into the queue.

use pdfcombine::PdfCombineError;
use pdfcombine::io::{PdfWriter, SourceReader};
use pdfcombine::merge::Merger;
use pdfcombine::queue::{FileKind, FileQueue};
use pdfcombine::DocumentOptions;
use tempfile::TempDir;

use crate::common::{Output, letter_pdf, png_bytes, write_file};

#[tokio::test]
async fn test_mixed_inputs_to_disk() {
    let dir = TempDir::new().unwrap();
    let paths = vec![
        write_file(dir.path(), "report.pdf", &letter_pdf(2)),
        write_file(dir.path(), "scan.png", &png_bytes(30, 60, [10, 10, 10, 200])),
        write_file(dir.path(), "broken.pdf", b"%PDF-1.4\nnot really"),
    ];

    let files = SourceReader::new().load_paths(&paths).await.unwrap();
    let kinds: Vec<FileKind> = files.iter().map(|f| f.kind).collect();
    assert_eq!(kinds, vec![FileKind::Pdf, FileKind::Image, FileKind::Pdf]);
    assert_eq!(files[2].page_count, 0);

    let queue: FileQueue = files.into_iter().collect();
    let result = Merger::new()
        .merge(queue.as_slice(), &DocumentOptions::default())
        .await
        .unwrap();
    assert_eq!(result.statistics.files_merged, 2);
    assert_eq!(result.statistics.image_pages, 1);

    let output_path = dir.path().join(DocumentOptions::default().output_file_name());
    let stats = PdfWriter::new()
        .save(result.bytes, &output_path)
        .await
        .unwrap();
    assert_eq!(stats.output_path, output_path);

    let output = Output::load(&std::fs::read(&output_path).unwrap());
    assert_eq!(output.pages.len(), 3);
    assert!(output.has_image(2));
}

#[tokio::test]
async fn test_unsupported_input_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "notes.txt", b"just text");

    let err = SourceReader::new().load_path(&path).await.unwrap_err();
    assert!(matches!(err, PdfCombineError::UnsupportedFile { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[tokio::test]
async fn test_missing_input() {
    let dir = TempDir::new().unwrap();
    let err = SourceReader::new()
        .load_path(&dir.path().join("absent.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, PdfCombineError::FileNotFound { .. }));
}
