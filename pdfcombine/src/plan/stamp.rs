//! Page-number stamp text and layout.
//!
//! Stamps are drawn with the standard Helvetica font, so text is measured
//! with its built-in AFM widths and limited to what the single-byte encoding
//! can carry.

use serde::Serialize;

use crate::config::NumberPosition;
use crate::error::{PdfCombineError, Result};

/// Stamp font size in points.
pub const FONT_SIZE: f32 = 12.0;

/// Distance from the page edge for left/right stamps, in points.
pub const MARGIN: f32 = 20.0;

/// Baseline height above the bottom edge, in points.
pub const BASELINE_Y: f32 = 20.0;

/// Helvetica advance widths for `' '..='~'`, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Expand a stamp template for one page.
///
/// `{n}` becomes the 1-based page number and `{total}` the page count.
/// Every occurrence of either placeholder is replaced, not only the first.
///
/// ```
/// use pdfcombine::plan::stamp::stamp_text;
///
/// assert_eq!(stamp_text("Page {n} of {total}", 2, 5), "Page 3 of 5");
/// ```
pub fn stamp_text(format: &str, page_index: usize, total: usize) -> String {
    format
        .replace("{n}", &(page_index + 1).to_string())
        .replace("{total}", &total.to_string())
}

/// Width of `text` in Helvetica at `font_size`, in points.
///
/// Returns `None` if the text has characters outside printable ASCII.
pub fn text_width(text: &str, font_size: f32) -> Option<f32> {
    let units = text.chars().try_fold(0u32, |sum, c| {
        glyph_width(c).map(|width| sum + u32::from(width))
    })?;
    Some(units as f32 * font_size / 1000.0)
}

fn glyph_width(c: char) -> Option<u16> {
    match c {
        ' '..='~' => Some(HELVETICA_WIDTHS[c as usize - ' ' as usize]),
        _ => None,
    }
}

/// Horizontal start of a stamp of `text_width` on a page `page_width` wide.
pub fn stamp_x(position: NumberPosition, page_width: f32, text_width: f32) -> f32 {
    match position {
        NumberPosition::Left => MARGIN,
        NumberPosition::Center => page_width / 2.0 - text_width / 2.0,
        NumberPosition::Right => page_width - MARGIN - text_width,
    }
}

/// A positioned stamp, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stamp {
    /// Text to draw.
    pub text: String,
    /// Baseline start x.
    pub x: f32,
    /// Baseline y.
    pub y: f32,
}

impl Stamp {
    /// Measure and place `text` on a page of the given width.
    ///
    /// # Errors
    ///
    /// Returns [`PdfCombineError::UnencodableText`] if the standard font
    /// cannot show the text.
    pub fn layout(text: String, position: NumberPosition, page_width: f32) -> Result<Self> {
        let width = text_width(&text, FONT_SIZE)
            .ok_or_else(|| PdfCombineError::UnencodableText { text: text.clone() })?;
        Ok(Self {
            x: stamp_x(position, page_width, width),
            y: BASELINE_Y,
            text,
        })
    }
}
