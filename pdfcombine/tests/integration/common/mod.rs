//! Shared helpers for integration tests.
//!
//! Inputs are generated on the fly so the suite needs no fixture files.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Build a PDF with one page per entry of `widths`, each page drawing its
/// 1-based number as text so pages can be told apart after merging.
pub fn pdf_bytes(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = widths
        .iter()
        .enumerate()
        .map(|(index, &width)| {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![50.into(), 400.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("source page {}", index + 1))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 792.into()],
                "Contents" => content_id,
            })
            .into()
        })
        .collect();

    // Resources sit on the tree root so copying must flatten them.
    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => widths.len() as i64,
            "Resources" => resources_id,
        }
        .into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF with `pages` Letter-sized pages.
pub fn letter_pdf(pages: usize) -> Vec<u8> {
    pdf_bytes(&vec![612; pages])
}

/// A solid-colour PNG.
pub fn png_bytes(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(pixel));
    let mut bytes = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// A merged document reloaded for inspection.
pub struct Output {
    pub doc: Document,
    pub pages: Vec<ObjectId>,
}

impl Output {
    pub fn load(bytes: &[u8]) -> Self {
        let doc = Document::load_mem(bytes).expect("merged output should parse");
        let pages = doc.get_pages().into_values().collect();
        Self { doc, pages }
    }

    pub fn page(&self, index: usize) -> &Dictionary {
        self.doc.get_dictionary(self.pages[index]).unwrap()
    }

    pub fn width(&self, index: usize) -> f32 {
        let Ok(Object::Array(values)) = self.page(index).get(b"MediaBox") else {
            panic!("page {index} has no MediaBox");
        };
        values[2].as_float().unwrap() - values[0].as_float().unwrap()
    }

    pub fn rotation(&self, index: usize) -> i64 {
        self.page(index)
            .get(b"Rotate")
            .and_then(Object::as_i64)
            .unwrap_or(0)
    }

    /// Every string shown with `Tj` on a page, in content order.
    pub fn texts(&self, index: usize) -> Vec<String> {
        let content = self.doc.get_page_content(self.pages[index]).unwrap_or_default();
        let Ok(content) = Content::decode(&content) else {
            return Vec::new();
        };
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => String::from_utf8(bytes.clone()).ok(),
                _ => None,
            })
            .collect()
    }

    /// Whether the page is empty: no content at all.
    pub fn is_blank(&self, index: usize) -> bool {
        !self.page(index).has(b"Contents")
    }

    pub fn info(&self, key: &[u8]) -> Option<String> {
        let info_id = self.doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        let info = self.doc.get_dictionary(info_id).ok()?;
        match info.get(key) {
            Ok(Object::String(bytes, _)) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }

    /// The page's resource dictionary, following an indirect reference.
    pub fn resources(&self, index: usize) -> Option<&Dictionary> {
        match self.page(index).get(b"Resources").ok()? {
            Object::Reference(id) => self.doc.get_dictionary(*id).ok(),
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Whether the page draws an image XObject.
    pub fn has_image(&self, index: usize) -> bool {
        let Some(resources) = self.resources(index) else {
            return false;
        };
        let Ok(xobjects) = resources.get(b"XObject").and_then(Object::as_dict) else {
            return false;
        };
        xobjects.iter().any(|(_, value)| {
            value
                .as_reference()
                .and_then(|id| self.doc.get_object(id))
                .and_then(Object::as_stream)
                .is_ok_and(|stream| {
                    stream.dict.get(b"Subtype").and_then(Object::as_name).ok()
                        == Some(b"Image".as_slice())
                })
        })
    }
}
