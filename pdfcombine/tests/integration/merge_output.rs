//! End-to-end merges, checked by reloading the output.

use std::sync::Arc;

use lopdf::Object;
use pdfcombine::config::{
    BlankPagePolicy, DocumentOptions, Metadata, NumberPosition, PageNumbering, Rotation,
};
use pdfcombine::merge::Merger;
use pdfcombine::queue::{FileDescriptor, FileQueue, ImageFormat, ImageInfo, SourceFile};
use pdfcombine::PdfCombineError;
use pretty_assertions::assert_eq;

use crate::common::{Output, letter_pdf, pdf_bytes, png_bytes};

fn pdf(name: &str, bytes: Vec<u8>, pages: usize) -> FileDescriptor {
    FileDescriptor::pdf(Arc::new(SourceFile::new(name, bytes)), pages)
}

fn png(name: &str, width: u32, height: u32, pixel: [u8; 4]) -> FileDescriptor {
    let source = SourceFile::new(name, png_bytes(width, height, pixel)).with_image(ImageInfo {
        format: ImageFormat::Png,
        width,
        height,
    });
    FileDescriptor::image(Arc::new(source))
}

async fn merge(files: &[FileDescriptor], options: &DocumentOptions) -> Output {
    let result = Merger::new().merge(files, options).await.unwrap();
    assert_eq!(result.statistics.total_pages, result.plan.page_count());
    Output::load(&result.bytes)
}

#[tokio::test]
async fn test_ranges_select_and_order_pages() {
    let mut a = pdf("a.pdf", pdf_bytes(&[100, 200, 300, 400]), 4);
    a.page_range = "4, 1-2".to_string();
    let b = pdf("b.pdf", pdf_bytes(&[500]), 1);

    let output = merge(&[a, b], &DocumentOptions::default()).await;

    let widths: Vec<f32> = (0..output.pages.len()).map(|i| output.width(i)).collect();
    assert_eq!(widths, vec![400.0, 100.0, 200.0, 500.0]);
    assert_eq!(output.texts(0), vec!["source page 4"]);
}

#[tokio::test]
async fn test_inherited_resources_survive_copy() {
    let output = merge(&[pdf("a.pdf", pdf_bytes(&[612]), 1)], &DocumentOptions::default()).await;

    assert!(matches!(
        output.page(0).get(b"Resources"),
        Ok(Object::Reference(_))
    ));
    let resources = output.resources(0).unwrap();
    assert!(resources.has(b"Font"));
}

#[tokio::test]
async fn test_rotation_is_added_to_each_page() {
    let mut file = pdf("a.pdf", letter_pdf(2), 2);
    file.rotation = Rotation::Clockwise270;

    let output = merge(&[file], &DocumentOptions::default()).await;
    assert_eq!(output.rotation(0), 270);
    assert_eq!(output.rotation(1), 270);
}

#[tokio::test]
async fn test_blank_after_odd_files() {
    let files = vec![
        pdf("three.pdf", letter_pdf(3), 3),
        pdf("two.pdf", letter_pdf(2), 2),
        pdf("one.pdf", letter_pdf(1), 1),
    ];
    let options = DocumentOptions {
        blank_pages: BlankPagePolicy::AfterFilesWithOddPageCount,
        ..Default::default()
    };

    let output = merge(&files, &options).await;
    let blanks: Vec<bool> = (0..output.pages.len()).map(|i| output.is_blank(i)).collect();
    assert_eq!(
        blanks,
        vec![false, false, false, true, false, false, false, true]
    );
}

#[tokio::test]
async fn test_blank_after_specific_pages() {
    let options = DocumentOptions {
        blank_pages: BlankPagePolicy::AfterOutputPages(vec![2, 0, 9]),
        ..Default::default()
    };

    let output = merge(&[pdf("a.pdf", letter_pdf(3), 3)], &options).await;
    let blanks: Vec<bool> = (0..output.pages.len()).map(|i| output.is_blank(i)).collect();
    assert_eq!(blanks, vec![true, false, false, true, false]);
}

#[tokio::test]
async fn test_image_page() {
    let mut image = png("photo.png", 40, 20, [0, 128, 255, 255]);
    image.scale = Some(2.5);
    image.rotation = Rotation::Clockwise90;

    let output = merge(&[image], &DocumentOptions::default()).await;
    assert_eq!(output.pages.len(), 1);
    assert_eq!(output.width(0), 100.0);
    assert_eq!(output.rotation(0), 90);
    assert!(output.has_image(0));
}

#[tokio::test]
async fn test_invalid_scale_renders_at_native_size() {
    let mut image = png("photo.png", 40, 20, [0, 0, 0, 255]);
    image.scale = Some(-3.0);

    let output = merge(&[image], &DocumentOptions::default()).await;
    assert_eq!(output.width(0), 40.0);
}

#[tokio::test]
async fn test_metadata_written() {
    let options = DocumentOptions {
        metadata: Metadata::new(Some("  Bundle  ".into()), Some("Ops".into()), None),
        ..Default::default()
    };

    let output = merge(&[pdf("a.pdf", letter_pdf(1), 1)], &options).await;
    assert_eq!(output.info(b"Title").as_deref(), Some("Bundle"));
    assert_eq!(output.info(b"Author").as_deref(), Some("Ops"));
    assert_eq!(output.info(b"Subject"), None);
    assert!(output.info(b"Producer").unwrap().starts_with("pdfcombine"));
    assert!(output.info(b"CreationDate").unwrap().starts_with("D:"));
}

#[tokio::test]
async fn test_page_numbers_count_every_output_page() {
    let files = vec![
        pdf("a.pdf", letter_pdf(1), 1),
        png("b.png", 10, 10, [255, 255, 255, 255]),
    ];
    let options = DocumentOptions {
        blank_pages: BlankPagePolicy::AfterEveryFile,
        page_numbering: Some(PageNumbering {
            position: NumberPosition::Left,
            format: "{n}/{total}".to_string(),
        }),
        ..Default::default()
    };

    let output = merge(&files, &options).await;
    assert_eq!(output.pages.len(), 3);
    assert_eq!(output.texts(0), vec!["source page 1", "1/3"]);
    assert_eq!(output.texts(1), vec!["2/3"]);
    assert_eq!(output.texts(2), vec!["3/3"]);
}

#[tokio::test]
async fn test_non_ascii_stamp_fails_whole_merge() {
    let options = DocumentOptions {
        page_numbering: Some(PageNumbering {
            position: NumberPosition::Center,
            format: "Página {n}".to_string(),
        }),
        ..Default::default()
    };

    let err = Merger::new()
        .merge(&[pdf("a.pdf", letter_pdf(1), 1)], &options)
        .await
        .unwrap_err();
    assert!(matches!(err, PdfCombineError::UnencodableText { .. }));
}

#[tokio::test]
async fn test_duplicate_merges_independently() {
    let mut queue = FileQueue::new();
    let id = queue.push(pdf("a.pdf", pdf_bytes(&[100, 200]), 2));
    let copy = queue.duplicate(id).unwrap();
    queue.set_range(copy, "2");
    queue.rotate_clockwise(copy);

    let output = merge(queue.as_slice(), &DocumentOptions::default()).await;
    let widths: Vec<f32> = (0..output.pages.len()).map(|i| output.width(i)).collect();
    assert_eq!(widths, vec![100.0, 200.0, 200.0]);
    assert_eq!(output.rotation(1), 0);
    assert_eq!(output.rotation(2), 90);
}

#[tokio::test]
async fn test_empty_selection_means_all_pages() {
    let mut file = pdf("a.pdf", letter_pdf(3), 3);
    file.page_range = "  ".to_string();

    let output = merge(&[file], &DocumentOptions::default()).await;
    assert_eq!(output.pages.len(), 3);
}
