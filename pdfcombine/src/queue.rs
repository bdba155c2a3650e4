//! The merge queue: an ordered list of file descriptors.
//!
//! A front end edits the queue (adds files, reorders them, edits one file's
//! page range or transforms) and finally hands a snapshot of it to the
//! planner. Every edit addresses a single descriptor by its [`FileId`] and
//! leaves all other descriptors untouched.

use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Rotation;
use crate::range::parse_range;

/// Opaque, stable identifier of a queued file.
///
/// Generated once when a descriptor is created and never reused, so it stays
/// valid across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a queued file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// A PDF document; its pages are copied.
    Pdf,
    /// A raster image; it becomes one page.
    Image,
}

/// Image encodings that can be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG.
    Jpeg,
}

impl ImageFormat {
    /// The matching `image` crate format.
    pub fn as_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Probed properties of a supported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Encoding of the image bytes.
    pub format: ImageFormat,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
}

/// The content behind one or more descriptors.
///
/// Shared through an [`Arc`]: duplicating a descriptor never copies bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Display name, usually the file name.
    pub name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// Format and size for supported images, `None` otherwise.
    pub image: Option<ImageInfo>,
}

impl SourceFile {
    /// Wrap raw bytes with a display name.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            image: None,
        }
    }

    /// Attach probed image info.
    pub fn with_image(mut self, info: ImageInfo) -> Self {
        self.image = Some(info);
        self
    }
}

/// One item of the merge queue.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    /// Stable identifier.
    pub id: FileId,
    /// PDF or image.
    pub kind: FileKind,
    /// Source page count; 0 when a PDF could not be loaded, always 1 for
    /// images.
    pub page_count: usize,
    /// User-edited range string. Empty selects all pages.
    pub page_range: String,
    /// Image scale factor. `None` means the input was left empty.
    pub scale: Option<f32>,
    /// Clockwise rotation applied on top of the page's own rotation.
    pub rotation: Rotation,
    /// Shared file content.
    pub source: Arc<SourceFile>,
}

impl FileDescriptor {
    /// Describe a PDF with a known page count.
    pub fn pdf(source: Arc<SourceFile>, page_count: usize) -> Self {
        Self::with_kind(FileKind::Pdf, source, page_count)
    }

    /// Describe an image. Images always count as one page.
    pub fn image(source: Arc<SourceFile>) -> Self {
        let mut descriptor = Self::with_kind(FileKind::Image, source, 1);
        descriptor.scale = Some(1.0);
        descriptor
    }

    fn with_kind(kind: FileKind, source: Arc<SourceFile>, page_count: usize) -> Self {
        Self {
            id: FileId::new(),
            kind,
            page_count,
            page_range: String::new(),
            scale: None,
            rotation: Rotation::None,
            source,
        }
    }

    /// Display name of the underlying file.
    pub fn name(&self) -> &str {
        &self.source.name
    }

    /// Zero-based source pages selected by the range string.
    pub fn selected_pages(&self) -> Vec<usize> {
        parse_range(&self.page_range, self.page_count)
    }

    /// Scale to render an image with: the stored value when it is a positive
    /// finite number, otherwise 1.
    ///
    /// Zero and negative values also fall back to 1, although a bare
    /// "numeric and finite" check would let them through.
    pub fn effective_scale(&self) -> f32 {
        match self.scale {
            Some(scale) if scale.is_finite() && scale > 0.0 => scale,
            _ => 1.0,
        }
    }

    /// Store a scale typed by the user.
    ///
    /// Anything that is not a number, including an empty field, is kept as
    /// `None` so that the field can be cleared while typing.
    pub fn set_scale_input(&mut self, input: &str) {
        self.scale = input.trim().parse::<f32>().ok();
    }

    /// Copy every field into a new descriptor with a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: FileId::new(),
            ..self.clone()
        }
    }
}

/// Ordered list of files to merge.
#[derive(Debug, Clone, Default)]
pub struct FileQueue {
    files: Vec<FileDescriptor>,
}

impl FileQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file and return its id.
    pub fn push(&mut self, file: FileDescriptor) -> FileId {
        let id = file.id;
        self.files.push(file);
        id
    }

    /// Remove a file, returning it if it was queued.
    pub fn remove(&mut self, id: FileId) -> Option<FileDescriptor> {
        let index = self.position(id)?;
        Some(self.files.remove(index))
    }

    /// Move the file at `from` so that it ends up at index `to`.
    ///
    /// Returns `false` and leaves the queue alone if either index is out of
    /// bounds.
    pub fn move_file(&mut self, from: usize, to: usize) -> bool {
        if from >= self.files.len() || to >= self.files.len() {
            return false;
        }
        let file = self.files.remove(from);
        self.files.insert(to, file);
        true
    }

    /// Insert a copy of a file directly after it.
    ///
    /// The copy gets a new id and shares the original's content.
    pub fn duplicate(&mut self, id: FileId) -> Option<FileId> {
        let index = self.position(id)?;
        let copy = self.files[index].duplicate();
        let copy_id = copy.id;
        self.files.insert(index + 1, copy);
        Some(copy_id)
    }

    /// Replace one file's range string.
    pub fn set_range(&mut self, id: FileId, range: impl Into<String>) -> bool {
        self.update(id, |file| file.page_range = range.into())
    }

    /// Turn one file a quarter turn clockwise.
    pub fn rotate_clockwise(&mut self, id: FileId) -> bool {
        self.update(id, |file| file.rotation = file.rotation.rotate_clockwise())
    }

    /// Set one file's scale.
    pub fn set_scale(&mut self, id: FileId, scale: Option<f32>) -> bool {
        self.update(id, |file| file.scale = scale)
    }

    /// Look up a file by id.
    pub fn get(&self, id: FileId) -> Option<&FileDescriptor> {
        self.files.iter().find(|file| file.id == id)
    }

    /// Index of a file in the queue.
    pub fn position(&self, id: FileId) -> Option<usize> {
        self.files.iter().position(|file| file.id == id)
    }

    /// Iterate over files in merge order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileDescriptor> {
        self.files.iter()
    }

    /// Files in merge order.
    pub fn as_slice(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Number of queued files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn update(&mut self, id: FileId, edit: impl FnOnce(&mut FileDescriptor)) -> bool {
        match self.files.iter_mut().find(|file| file.id == id) {
            Some(file) => {
                edit(file);
                true
            }
            None => false,
        }
    }
}

impl Extend<FileDescriptor> for FileQueue {
    fn extend<T: IntoIterator<Item = FileDescriptor>>(&mut self, iter: T) {
        self.files.extend(iter);
    }
}

impl FromIterator<FileDescriptor> for FileQueue {
    fn from_iter<T: IntoIterator<Item = FileDescriptor>>(iter: T) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FileQueue {
    type Item = &'a FileDescriptor;
    type IntoIter = std::slice::Iter<'a, FileDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
