//! Page-level helpers for copying pages between documents.
//!
//! A page copied out of its source loses the page tree it lived in, so
//! attributes it inherited from ancestor `Pages` nodes are flattened onto the
//! page first. Only objects the page actually references are carried over.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfCombineError, Result};

/// Page attributes a page may inherit from its ancestors.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, used when a page and all its ancestors lack a MediaBox.
pub const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A4 portrait in points.
pub const A4: (f32, f32) = (595.28, 841.89);

/// Upper bound on page tree depth, guarding against `Parent` cycles.
const MAX_TREE_DEPTH: usize = 64;

/// Clone a page dictionary with inherited attributes made explicit.
///
/// The returned dictionary has no `Parent`; the caller attaches it to its
/// own page tree.
pub fn flatten_page(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut page = doc
        .get_dictionary(page_id)
        .map_err(|e| PdfCombineError::merge_failed(format!("Failed to get page: {e}")))?
        .clone();

    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;
    while let Some(parent_id) = parent {
        depth += 1;
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        for key in INHERITABLE {
            if !page.has(key)
                && let Ok(value) = node.get(key)
            {
                page.set(key.to_vec(), value.clone());
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    if !page.has(b"MediaBox") {
        page.set("MediaBox", rect(DEFAULT_MEDIA_BOX));
    }
    page.remove(b"Parent");
    Ok(page)
}

/// Copy object references from one PDF document to another.
///
/// Walks `obj` recursively and inserts every referenced object that `target`
/// does not have yet. `Parent` links are not followed, so copying a page
/// does not drag the source's whole page tree along.
pub fn copy_references(target: &mut Document, source: &Document, obj: &Object) {
    match obj {
        Object::Reference(ref_id) => {
            if !target.objects.contains_key(ref_id)
                && let Ok(referenced_obj) = source.get_object(*ref_id)
            {
                target.objects.insert(*ref_id, referenced_obj.clone());
                copy_references(target, source, referenced_obj);
            }
        }
        Object::Dictionary(dict) => copy_dictionary_references(target, source, dict),
        Object::Array(arr) => {
            for item in arr {
                copy_references(target, source, item);
            }
        }
        Object::Stream(stream) => copy_dictionary_references(target, source, &stream.dict),
        _ => {}
    }
}

fn copy_dictionary_references(target: &mut Document, source: &Document, dict: &Dictionary) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            copy_references(target, source, value);
        }
    }
}

/// The page's stored `/Rotate`, or 0.
pub fn page_rotation(page: &Dictionary) -> i64 {
    page.get(b"Rotate").and_then(Object::as_i64).unwrap_or(0)
}

/// The page's MediaBox as `[llx, lly, urx, ury]`.
pub fn media_box(page: &Dictionary) -> [f32; 4] {
    let Ok(Object::Array(values)) = page.get(b"MediaBox") else {
        return DEFAULT_MEDIA_BOX;
    };
    let numbers: Vec<f32> = values.iter().filter_map(|v| v.as_float().ok()).collect();
    match numbers.as_slice() {
        [a, b, c, d] => [*a, *b, *c, *d],
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// Width of a MediaBox.
pub fn box_width(rect: [f32; 4]) -> f32 {
    (rect[2] - rect[0]).abs()
}

/// A rectangle as a PDF array.
pub fn rect(values: [f32; 4]) -> Object {
    Object::Array(values.into_iter().map(Object::Real).collect())
}
