//! Merges driven by a JSON job manifest.

use pdfcombine::io::SourceReader;
use pdfcombine::merge::Merger;
use pdfcombine::{JobManifest, PdfCombineError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common::{Output, pdf_bytes, png_bytes, write_file};

#[tokio::test]
async fn test_manifest_job() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "report.pdf", &pdf_bytes(&[100, 200, 300]));
    write_file(dir.path(), "logo.png", &png_bytes(8, 8, [255, 0, 0, 255]));
    let manifest_path = write_file(
        dir.path(),
        "job.json",
        br#"{
            "files": [
                { "path": "report.pdf", "range": "3,1", "rotation": 180 },
                { "path": "logo.png", "scale": 4 }
            ],
            "options": {
                "metadata": { "title": "From manifest", "subject": "Testing" },
                "blank_pages": "after_files_with_odd_page_count",
                "page_numbering": { "format": "- {n} -" }
            }
        }"#,
    );

    let manifest = JobManifest::load(&manifest_path).await.unwrap();
    let queue = manifest.load_queue(&SourceReader::new()).await.unwrap();
    let result = Merger::new()
        .merge(queue.as_slice(), &manifest.options)
        .await
        .unwrap();

    let output = Output::load(&result.bytes);
    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.width(0), 300.0);
    assert_eq!(output.width(1), 100.0);
    assert_eq!(output.rotation(0), 180);
    assert_eq!(output.width(2), 32.0);
    assert_eq!(output.texts(2), vec!["- 3 -"]);
    assert_eq!(output.info(b"Subject").as_deref(), Some("Testing"));
}

#[tokio::test]
async fn test_manifest_with_missing_input() {
    let dir = TempDir::new().unwrap();
    let manifest_path = write_file(
        dir.path(),
        "job.json",
        br#"{ "files": [{ "path": "absent.pdf" }] }"#,
    );

    let manifest = JobManifest::load(&manifest_path).await.unwrap();
    let err = manifest
        .load_queue(&SourceReader::new())
        .await
        .unwrap_err();
    assert!(matches!(err, PdfCombineError::FileNotFound { .. }));
}

#[tokio::test]
async fn test_malformed_manifest() {
    let dir = TempDir::new().unwrap();
    let manifest_path = write_file(dir.path(), "job.json", b"{ files: ");

    let err = JobManifest::load(&manifest_path).await.unwrap_err();
    assert!(matches!(err, PdfCombineError::InvalidManifest { .. }));
    assert_eq!(err.exit_code(), 1);
}
