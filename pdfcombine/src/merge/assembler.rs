//! Document assembly.
//!
//! [`Assembler`] builds the output document page by page. Each source PDF is
//! parsed once, renumbered above the objects already in the output, and then
//! pages are copied out of it on demand. [`Assembler::realize`] drives the
//! whole thing from a [`BuildPlan`].

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::images::{IMAGE_KEY, embed_image, image_page_content};
use super::metadata::MetadataManager;
use super::numbering::stamp_page_numbers;
use super::pages::{A4, copy_references, flatten_page, page_rotation, rect};
use crate::config::{Metadata, PageNumbering, Rotation};
use crate::error::{PdfCombineError, Result};
use crate::plan::{BuildPlan, PageOp};
use crate::queue::{FileDescriptor, FileId, SourceFile};

/// A parsed source document and its pages in order.
struct LoadedSource {
    name: String,
    doc: Document,
    pages: Vec<ObjectId>,
}

/// Incrementally built output document.
pub struct Assembler {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
    sources: HashMap<FileId, LoadedSource>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Start an empty document.
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
            sources: HashMap::new(),
        }
    }

    /// Realize `plan` against the queued `files`.
    ///
    /// Runs synchronously; callers on an async runtime should move it to a
    /// blocking task.
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole document:
    /// - [`PdfCombineError::UnknownSource`] if an op names a file not in `files`
    /// - [`PdfCombineError::SourceLoadFailed`] if a source PDF does not parse
    /// - [`PdfCombineError::SourcePageMissing`] if a page index is out of range
    /// - [`PdfCombineError::ImageEmbedFailed`] if an image does not decode
    /// - [`PdfCombineError::UnencodableText`] if a page-number stamp cannot be drawn
    pub fn realize(plan: &BuildPlan, files: &[FileDescriptor]) -> Result<Vec<u8>> {
        let by_id: HashMap<FileId, &FileDescriptor> =
            files.iter().map(|file| (file.id, file)).collect();
        let lookup = |id: FileId| {
            by_id
                .get(&id)
                .copied()
                .ok_or(PdfCombineError::UnknownSource { id })
        };

        let mut assembler = Self::new();
        for op in &plan.ops {
            match op {
                PageOp::CopySourcePage {
                    source,
                    page_index,
                    extra_rotation,
                } => {
                    let file = lookup(*source)?;
                    assembler.load_source(file.id, &file.source)?;
                    assembler.copy_page(file.id, *page_index, *extra_rotation)?;
                }
                PageOp::RenderImagePage {
                    source,
                    width,
                    height,
                    rotation,
                } => {
                    let file = lookup(*source)?;
                    assembler.add_image_page(&file.source, *width, *height, *rotation)?;
                }
                PageOp::BlankPage => {
                    assembler.add_blank_page();
                }
            }
        }

        assembler.set_metadata(&plan.post.metadata)?;
        if let Some(numbering) = &plan.post.page_numbering {
            assembler.stamp_page_numbers(numbering)?;
        }
        assembler.finish()
    }

    /// Parse a source PDF unless it is already loaded under `id`.
    pub fn load_source(&mut self, id: FileId, source: &SourceFile) -> Result<()> {
        if self.sources.contains_key(&id) {
            return Ok(());
        }

        let mut doc = Document::load_mem(&source.bytes)
            .map_err(|e| PdfCombineError::source_load_failed(&source.name, e.to_string()))?;
        doc.renumber_objects_with(self.doc.max_id + 1);
        self.doc.max_id = doc.max_id;

        let pages = doc.get_pages().into_values().collect();
        tracing::debug!(file = %source.name, max_id = doc.max_id, "Loaded source document");

        self.sources.insert(
            id,
            LoadedSource {
                name: source.name.clone(),
                doc,
                pages,
            },
        );
        Ok(())
    }

    /// Append page `page_index` of a loaded source, turned by `extra_rotation`.
    pub fn copy_page(
        &mut self,
        id: FileId,
        page_index: usize,
        extra_rotation: Rotation,
    ) -> Result<ObjectId> {
        let loaded = self
            .sources
            .get(&id)
            .ok_or(PdfCombineError::UnknownSource { id })?;
        let page_id = *loaded
            .pages
            .get(page_index)
            .ok_or_else(|| PdfCombineError::SourcePageMissing {
                name: loaded.name.clone(),
                page_index,
            })?;

        let mut page = flatten_page(&loaded.doc, page_id)?;
        let taken = self.kids.contains(&page_id);
        copy_references(&mut self.doc, &loaded.doc, &Object::Dictionary(page.clone()));

        page.set("Rotate", extra_rotation.compose(page_rotation(&page)));
        page.set("Parent", self.pages_id);

        // A page reached through its own annotations was copied raw and is
        // replaced here. Only a page already in the tree needs a fresh id.
        let new_id = if taken {
            self.doc.new_object_id()
        } else {
            page_id
        };
        self.doc.objects.insert(new_id, Object::Dictionary(page));
        self.kids.push(new_id);
        Ok(new_id)
    }

    /// Append a page showing the image in `source` at `width` by `height` points.
    pub fn add_image_page(
        &mut self,
        source: &SourceFile,
        width: f32,
        height: f32,
        rotation: Rotation,
    ) -> Result<ObjectId> {
        let image_id = embed_image(&mut self.doc, source)?;
        let content_id = self.doc.add_object(Stream::new(
            Dictionary::new(),
            image_page_content(width, height)?,
        ));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => rect([0.0, 0.0, width, height]),
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_KEY => image_id },
            },
            "Contents" => content_id,
            "Rotate" => i64::from(rotation.as_degrees()),
        });
        self.kids.push(page_id);
        Ok(page_id)
    }

    /// Append an empty A4 page.
    pub fn add_blank_page(&mut self) -> ObjectId {
        let (width, height) = A4;
        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => rect([0.0, 0.0, width, height]),
            "Resources" => Dictionary::new(),
        });
        self.kids.push(page_id);
        page_id
    }

    /// Insert an empty A4 page so that it becomes page `index`.
    ///
    /// An index past the end appends.
    pub fn insert_blank_page(&mut self, index: usize) -> ObjectId {
        let page_id = self.add_blank_page();
        self.kids.pop();
        self.kids.insert(index.min(self.kids.len()), page_id);
        page_id
    }

    /// Number of pages so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Page objects in output order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.kids
    }

    /// Stored rotation of page `index`, in degrees.
    pub fn rotation(&self, index: usize) -> Option<i64> {
        let page_id = self.kids.get(index)?;
        self.doc.get_dictionary(*page_id).ok().map(page_rotation)
    }

    /// Overwrite the rotation of page `index`.
    pub fn set_rotation(&mut self, index: usize, rotation: Rotation) -> Result<()> {
        let page_id = *self
            .kids
            .get(index)
            .ok_or_else(|| PdfCombineError::merge_failed(format!("No output page {index}")))?;
        self.doc
            .get_dictionary_mut(page_id)
            .map_err(|e| PdfCombineError::merge_failed(format!("Failed to get page: {e}")))?
            .set("Rotate", i64::from(rotation.as_degrees()));
        Ok(())
    }

    /// Write the Info dictionary.
    pub fn set_metadata(&mut self, metadata: &Metadata) -> Result<()> {
        MetadataManager::new().set_metadata(&mut self.doc, metadata)
    }

    /// Stamp every page with its number.
    pub fn stamp_page_numbers(&mut self, numbering: &PageNumbering) -> Result<()> {
        stamp_page_numbers(&mut self.doc, &self.kids, numbering)
    }

    /// Close the page tree and serialize the document.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| Object::Reference(id)).collect();
        let count = kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| PdfCombineError::merge_failed(format!("Failed to serialize document: {e}")))?;
        Ok(bytes)
    }
}
