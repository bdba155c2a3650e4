//! Image pages.
//!
//! Images are decoded to 8-bit RGBA and embedded as a DeviceRGB image
//! XObject. Transparency survives as a DeviceGray soft mask, written only
//! when some pixel is not fully opaque.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::{PdfCombineError, Result};
use crate::queue::SourceFile;

/// Resource name the image is drawn under.
pub const IMAGE_KEY: &str = "Im0";

/// Decode `source` and add it to `doc` as an image XObject.
///
/// # Errors
///
/// Returns [`PdfCombineError::ImageEmbedFailed`] if the image format is
/// unknown or the data does not decode.
pub fn embed_image(doc: &mut Document, source: &SourceFile) -> Result<ObjectId> {
    let info = source
        .image
        .ok_or_else(|| PdfCombineError::image_embed_failed(&source.name, "unknown image format"))?;

    let decoded = image::load_from_memory_with_format(&source.bytes, info.format.as_image_format())
        .map_err(|e| PdfCombineError::image_embed_failed(&source.name, e.to_string()))?
        .to_rgba8();
    let (width, height) = decoded.dimensions();

    let pixels = decoded.as_raw();
    let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
    let mut alpha = Vec::with_capacity(pixels.len() / 4);
    for pixel in pixels.chunks_exact(4) {
        rgb.extend_from_slice(&pixel[..3]);
        alpha.push(pixel[3]);
    }

    let mut dict = image_dictionary(width, height, "DeviceRGB");
    if alpha.iter().any(|&a| a < u8::MAX) {
        let mask_id = doc.add_object(Stream::new(
            image_dictionary(width, height, "DeviceGray"),
            alpha,
        ));
        dict.set("SMask", mask_id);
    }

    tracing::debug!(file = %source.name, width, height, "Embedded image");
    Ok(doc.add_object(Stream::new(dict, rgb)))
}

fn image_dictionary(width: u32, height: u32, color_space: &str) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => color_space,
        "BitsPerComponent" => 8,
    }
}

/// Content stream that scales the image to fill a `width` by `height` page.
pub fn image_page_content(width: f32, height: f32) -> Result<Vec<u8>> {
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    width.into(),
                    0.into(),
                    0.into(),
                    height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_KEY.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    content
        .encode()
        .map_err(|e| PdfCombineError::merge_failed(format!("Failed to encode image page: {e}")))
}
