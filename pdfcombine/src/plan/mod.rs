//! Assembly planning.
//!
//! [`build_plan`] turns the file queue and the document options into a
//! [`BuildPlan`]: the exact sequence of output pages plus the post-pass
//! (metadata and page-number stamps). Planning is pure and never fails. Files
//! that cannot contribute pages (an unloadable PDF, an image of unknown
//! format) simply contribute none. The plan is then realized by
//! [`crate::merge::Assembler`].

pub mod stamp;

use serde::{Deserialize, Serialize};

use crate::config::{BlankPagePolicy, DocumentOptions, Metadata, PageNumbering, Rotation};
use crate::queue::{FileDescriptor, FileId, FileKind};

/// One page of the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PageOp {
    /// Copy a page from a source PDF.
    CopySourcePage {
        /// Queued file to copy from.
        source: FileId,
        /// Zero-based page of that file.
        page_index: usize,
        /// Rotation added to the page's own rotation.
        extra_rotation: Rotation,
    },
    /// Draw an image as a full page.
    RenderImagePage {
        /// Queued image file.
        source: FileId,
        /// Page width in points.
        width: f32,
        /// Page height in points.
        height: f32,
        /// Absolute page rotation.
        rotation: Rotation,
    },
    /// An empty page.
    BlankPage,
}

impl PageOp {
    /// Whether this op inserts a blank page.
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankPage)
    }

    /// Whether this op renders an image.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::RenderImagePage { .. })
    }

    /// Queued file this op reads from, if any.
    pub fn source(&self) -> Option<FileId> {
        match self {
            Self::CopySourcePage { source, .. } | Self::RenderImagePage { source, .. } => {
                Some(*source)
            }
            Self::BlankPage => None,
        }
    }
}

/// Document-wide work done after all pages exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostOps {
    /// Info fields to write; unset fields are left out.
    pub metadata: Metadata,
    /// Page-number stamps, if enabled.
    pub page_numbering: Option<PageNumbering>,
}

/// Everything needed to produce the output document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Output pages in order.
    pub ops: Vec<PageOp>,
    /// Post-pass applied to the finished page list.
    pub post: PostOps,
}

impl BuildPlan {
    /// Number of pages the output will have.
    pub fn page_count(&self) -> usize {
        self.ops.len()
    }

    /// Number of inserted blank pages.
    pub fn blank_pages(&self) -> usize {
        self.ops.iter().filter(|op| op.is_blank()).count()
    }

    /// Number of image pages.
    pub fn image_pages(&self) -> usize {
        self.ops.iter().filter(|op| op.is_image()).count()
    }

    /// Distinct source files referenced, in order of first use.
    pub fn sources(&self) -> Vec<FileId> {
        let mut sources = Vec::new();
        for id in self.ops.iter().filter_map(PageOp::source) {
            if !sources.contains(&id) {
                sources.push(id);
            }
        }
        sources
    }

    /// Stamp text for every output page, or nothing if numbering is off.
    pub fn stamp_texts(&self) -> Vec<String> {
        let Some(numbering) = &self.post.page_numbering else {
            return Vec::new();
        };
        let total = self.page_count();
        (0..total)
            .map(|index| stamp::stamp_text(&numbering.format, index, total))
            .collect()
    }
}

/// Plan the output document for `files` under `options`.
///
/// ```
/// use std::sync::Arc;
/// use pdfcombine::config::{BlankPagePolicy, DocumentOptions};
/// use pdfcombine::plan::{build_plan, PageOp};
/// use pdfcombine::queue::{FileDescriptor, SourceFile};
///
/// let file = FileDescriptor::pdf(Arc::new(SourceFile::new("a.pdf", Vec::new())), 2);
/// let options = DocumentOptions {
///     blank_pages: BlankPagePolicy::AfterEveryFile,
///     ..Default::default()
/// };
///
/// let plan = build_plan(&[file], &options);
/// assert_eq!(plan.page_count(), 3);
/// assert_eq!(plan.ops[2], PageOp::BlankPage);
/// ```
pub fn build_plan(files: &[FileDescriptor], options: &DocumentOptions) -> BuildPlan {
    let mut ops = Vec::new();

    for file in files {
        match file.kind {
            FileKind::Image => ops.extend(image_page(file)),
            FileKind::Pdf => {
                let pages = file.selected_pages();
                let odd = pages.len() % 2 == 1;

                ops.extend(pages.into_iter().map(|page_index| PageOp::CopySourcePage {
                    source: file.id,
                    page_index,
                    extra_rotation: file.rotation,
                }));

                match options.blank_pages {
                    BlankPagePolicy::AfterEveryFile => ops.push(PageOp::BlankPage),
                    BlankPagePolicy::AfterFilesWithOddPageCount if odd => {
                        ops.push(PageOp::BlankPage)
                    }
                    _ => {}
                }
            }
        }
    }

    if let BlankPagePolicy::AfterOutputPages(pages) = &options.blank_pages {
        insert_blank_pages(&mut ops, pages);
    }

    BuildPlan {
        ops,
        post: PostOps {
            metadata: options.metadata.clone().normalized(),
            page_numbering: options.page_numbering.clone(),
        },
    }
}

/// A scale large enough to push the page size past `f32::MAX` falls back to
/// the native size.
fn image_page(file: &FileDescriptor) -> Option<PageOp> {
    let info = file.source.image?;
    let (native_width, native_height) = (info.width as f32, info.height as f32);
    let scale = file.effective_scale();
    let (width, height) = (native_width * scale, native_height * scale);
    let (width, height) = if width.is_finite() && height.is_finite() {
        (width, height)
    } else {
        (native_width, native_height)
    };
    Some(PageOp::RenderImagePage {
        source: file.id,
        width,
        height,
        rotation: file.rotation,
    })
}

/// Insert a blank page after each 1-based page number in `after`.
///
/// Targets are handled from the highest down, so an insertion never shifts a
/// page that still has to be found. Page `0` inserts before the first page
/// and numbers past the end are ignored.
fn insert_blank_pages(ops: &mut Vec<PageOp>, after: &[usize]) {
    let mut targets = after.to_vec();
    targets.sort_unstable_by(|a, b| b.cmp(a));
    targets.dedup();

    for target in targets {
        if target <= ops.len() {
            ops.insert(target, PageOp::BlankPage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NumberPosition;
    use crate::queue::{ImageFormat, ImageInfo, SourceFile};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::Arc;

    fn pdf(pages: usize) -> FileDescriptor {
        FileDescriptor::pdf(Arc::new(SourceFile::new("doc.pdf", Vec::new())), pages)
    }

    fn image(width: u32, height: u32) -> FileDescriptor {
        let source = SourceFile::new("pic.png", Vec::new()).with_image(ImageInfo {
            format: ImageFormat::Png,
            width,
            height,
        });
        FileDescriptor::image(Arc::new(source))
    }

    fn with_policy(policy: BlankPagePolicy) -> DocumentOptions {
        DocumentOptions {
            blank_pages: policy,
            ..Default::default()
        }
    }

    fn copy(file: &FileDescriptor, page_index: usize) -> PageOp {
        PageOp::CopySourcePage {
            source: file.id,
            page_index,
            extra_rotation: file.rotation,
        }
    }

    /// `C` for a copied page, `I` for an image, `B` for a blank.
    fn shape(plan: &BuildPlan) -> String {
        plan.ops
            .iter()
            .map(|op| match op {
                PageOp::CopySourcePage { .. } => 'C',
                PageOp::RenderImagePage { .. } => 'I',
                PageOp::BlankPage => 'B',
            })
            .collect()
    }

    #[test]
    fn test_blank_after_every_file() {
        let file = pdf(2);
        let plan = build_plan(&[file.clone()], &with_policy(BlankPagePolicy::AfterEveryFile));
        assert_eq!(plan.ops, vec![copy(&file, 0), copy(&file, 1), PageOp::BlankPage]);
    }

    #[rstest]
    #[case(3, "CCCB")]
    #[case(4, "CCCC")]
    #[case(1, "CB")]
    #[case(0, "")]
    fn test_blank_after_odd_files(#[case] pages: usize, #[case] expected: &str) {
        let plan = build_plan(
            &[pdf(pages)],
            &with_policy(BlankPagePolicy::AfterFilesWithOddPageCount),
        );
        assert_eq!(shape(&plan), expected);
    }

    #[test]
    fn test_odd_count_uses_selected_pages() {
        let mut file = pdf(4);
        file.page_range = "1-3".to_string();
        let plan = build_plan(&[file], &with_policy(BlankPagePolicy::AfterFilesWithOddPageCount));
        assert_eq!(shape(&plan), "CCCB");
    }

    #[test]
    fn test_images_never_get_per_file_blanks() {
        let files = [image(10, 10), pdf(1)];
        let plan = build_plan(&files, &with_policy(BlankPagePolicy::AfterEveryFile));
        assert_eq!(shape(&plan), "ICB");
    }

    #[test]
    fn test_blank_after_specific_pages() {
        let plan = build_plan(
            &[pdf(4)],
            &with_policy(BlankPagePolicy::AfterOutputPages(vec![1, 3])),
        );
        // Blanks end up at 1-based positions 2 and 5.
        assert_eq!(shape(&plan), "CBCCBC");
        let sources: Vec<_> = plan
            .ops
            .iter()
            .filter_map(|op| match op {
                PageOp::CopySourcePage { page_index, .. } => Some(*page_index),
                _ => None,
            })
            .collect();
        assert_eq!(sources, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_blank_after_specific_pages_differs_from_ascending_insert() {
        let plan = build_plan(
            &[pdf(4)],
            &with_policy(BlankPagePolicy::AfterOutputPages(vec![3, 1, 3])),
        );

        let mut naive: Vec<char> = "CCCC".chars().collect();
        for k in [1, 3] {
            naive.insert(k, 'B');
        }
        let naive: String = naive.into_iter().collect();

        assert_eq!(shape(&plan), "CBCCBC");
        assert_ne!(shape(&plan), naive);
    }

    #[rstest]
    #[case(vec![0], "BCC")]
    #[case(vec![2], "CCB")]
    #[case(vec![3], "CC")]
    #[case(vec![0, 1, 2], "BCBCB")]
    fn test_blank_after_edges(#[case] pages: Vec<usize>, #[case] expected: &str) {
        let plan = build_plan(&[pdf(2)], &with_policy(BlankPagePolicy::AfterOutputPages(pages)));
        assert_eq!(shape(&plan), expected);
    }

    #[test]
    fn test_ranges_rotation_and_order() {
        let mut first = pdf(5);
        first.page_range = "5, 1-2".to_string();
        first.rotation = Rotation::Clockwise90;
        let second = pdf(1);

        let plan = build_plan(&[first.clone(), second.clone()], &DocumentOptions::default());
        assert_eq!(
            plan.ops,
            vec![copy(&first, 4), copy(&first, 0), copy(&first, 1), copy(&second, 0)]
        );
        assert_eq!(plan.sources(), vec![first.id, second.id]);
    }

    #[test]
    fn test_unloadable_pdf_contributes_nothing() {
        let plan = build_plan(&[pdf(0), pdf(1)], &DocumentOptions::default());
        assert_eq!(shape(&plan), "C");
    }

    #[rstest]
    #[case(Some(2.0), 200.0, 100.0)]
    #[case(Some(0.5), 50.0, 25.0)]
    #[case(None, 100.0, 50.0)]
    #[case(Some(0.0), 100.0, 50.0)]
    #[case(Some(f32::INFINITY), 100.0, 50.0)]
    #[case(Some(1e38), 100.0, 50.0)]
    fn test_image_page_size(#[case] scale: Option<f32>, #[case] width: f32, #[case] height: f32) {
        let mut file = image(100, 50);
        file.scale = scale;
        file.rotation = Rotation::Rotate180;

        let plan = build_plan(&[file.clone()], &DocumentOptions::default());
        assert_eq!(
            plan.ops,
            vec![PageOp::RenderImagePage {
                source: file.id,
                width,
                height,
                rotation: Rotation::Rotate180,
            }]
        );
    }

    #[test]
    fn test_unknown_image_is_skipped() {
        let file = FileDescriptor::image(Arc::new(SourceFile::new("pic.webp", Vec::new())));
        let plan = build_plan(&[file, pdf(1)], &DocumentOptions::default());
        assert_eq!(shape(&plan), "C");
    }

    #[test]
    fn test_post_ops() {
        let options = DocumentOptions {
            metadata: Metadata {
                title: Some("Report".into()),
                author: Some("  ".into()),
                subject: None,
            },
            page_numbering: Some(PageNumbering {
                position: NumberPosition::Left,
                format: "Page {n} of {total}".into(),
            }),
            ..Default::default()
        };
        let plan = build_plan(&[pdf(5)], &options);

        assert_eq!(plan.post.metadata.title.as_deref(), Some("Report"));
        assert_eq!(plan.post.metadata.author, None);
        assert_eq!(plan.stamp_texts()[2], "Page 3 of 5");
        assert_eq!(plan.stamp_texts().len(), 5);
    }

    #[test]
    fn test_stamp_total_counts_blank_pages() {
        let options = DocumentOptions {
            blank_pages: BlankPagePolicy::AfterEveryFile,
            page_numbering: Some(PageNumbering::default()),
            ..Default::default()
        };
        let plan = build_plan(&[pdf(1), pdf(1)], &options);
        assert_eq!(plan.stamp_texts().last().map(String::as_str), Some("Page 4 of 4"));
    }

    #[test]
    fn test_no_numbering_no_stamps() {
        assert!(build_plan(&[pdf(3)], &DocumentOptions::default()).stamp_texts().is_empty());
    }

    #[test]
    fn test_counts() {
        let files = [pdf(2), image(1, 1)];
        let plan = build_plan(&files, &with_policy(BlankPagePolicy::AfterEveryFile));
        assert_eq!(plan.page_count(), 4);
        assert_eq!(plan.blank_pages(), 1);
        assert_eq!(plan.image_pages(), 1);
    }

    #[test]
    fn test_plan_serializes_with_op_tags() {
        let plan = build_plan(&[pdf(1)], &with_policy(BlankPagePolicy::AfterEveryFile));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["ops"][0]["op"], "copy_source_page");
        assert_eq!(json["ops"][0]["extra_rotation"], 0);
        assert_eq!(json["ops"][1]["op"], "blank_page");
    }
}
