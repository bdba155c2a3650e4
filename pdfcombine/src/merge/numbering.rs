//! Page-number stamping.
//!
//! One Helvetica font object is shared by every page. Each page gets the font
//! registered in its own resources, its existing content wrapped in `q`/`Q`
//! so leftover graphics state cannot skew the stamp, and one extra content
//! stream that draws the text.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::pages::{box_width, flatten_page, media_box};
use crate::config::PageNumbering;
use crate::error::{PdfCombineError, Result};
use crate::plan::stamp::{FONT_SIZE, Stamp, stamp_text};

/// Font resource name used by the stamp. Unusual enough not to clash with
/// names already on a copied page.
pub const FONT_KEY: &str = "PdfCombineHelv";

/// Add the standard Helvetica font to `doc`.
pub fn embed_standard_font(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Stamp every page in `pages` with its number.
///
/// # Errors
///
/// Fails with [`PdfCombineError::UnencodableText`] before touching any page
/// if a stamp cannot be drawn with the standard font.
pub fn stamp_page_numbers(
    doc: &mut Document,
    pages: &[ObjectId],
    numbering: &PageNumbering,
) -> Result<()> {
    let total = pages.len();
    let mut stamps = Vec::with_capacity(total);
    for (index, &page_id) in pages.iter().enumerate() {
        let page = flatten_page(doc, page_id)?;
        let [llx, lly, urx, ury] = media_box(&page);
        let text = stamp_text(&numbering.format, index, total);
        let stamp = Stamp::layout(text, numbering.position, box_width([llx, lly, urx, ury]))?;
        stamps.push(Stamp {
            x: stamp.x + llx.min(urx),
            y: stamp.y + lly.min(ury),
            ..stamp
        });
    }

    let font_id = embed_standard_font(doc);
    for (&page_id, stamp) in pages.iter().zip(&stamps) {
        draw_text(doc, page_id, font_id, stamp)?;
    }

    tracing::debug!(pages = total, "Stamped page numbers");
    Ok(())
}

/// Draw `stamp` on top of the page's existing content.
pub fn draw_text(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    stamp: &Stamp,
) -> Result<()> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfCombineError::merge_failed(format!("Failed to get page: {e}")))?
        .clone();

    let mut resources = resolve_dictionary(doc, page.get(b"Resources").ok());
    let mut fonts = resolve_dictionary(doc, resources.get(b"Font").ok());
    fonts.set(FONT_KEY, font_id);
    resources.set("Font", fonts);
    page.set("Resources", resources);

    let existing = match page.get(b"Contents") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(contents @ Object::Reference(_)) => vec![contents.clone()],
        _ => Vec::new(),
    };

    let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let stamp_id = doc.add_object(Stream::new(Dictionary::new(), stamp_content(stamp)?));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(stamp_id));
    page.set("Contents", contents);

    doc.objects.insert(page_id, Object::Dictionary(page));
    Ok(())
}

/// An inline copy of a dictionary that may be stored directly or by reference.
fn resolve_dictionary(doc: &Document, value: Option<&Object>) -> Dictionary {
    match value {
        Some(Object::Dictionary(dict)) => dict.clone(),
        Some(Object::Reference(id)) => doc.get_dictionary(*id).cloned().unwrap_or_default(),
        _ => Dictionary::new(),
    }
}

fn stamp_content(stamp: &Stamp) -> Result<Vec<u8>> {
    let content = Content {
        operations: vec![
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(FONT_KEY.as_bytes().to_vec()), FONT_SIZE.into()],
            ),
            Operation::new("Td", vec![stamp.x.into(), stamp.y.into()]),
            Operation::new("Tj", vec![Object::string_literal(stamp.text.as_bytes())]),
            Operation::new("ET", vec![]),
        ],
    };
    content
        .encode()
        .map_err(|e| PdfCombineError::merge_failed(format!("Failed to encode page number: {e}")))
}
