//! PDF metadata management.
//!
//! Writes the document Info dictionary: the user's Title, Author and Subject
//! plus Producer and the creation and modification dates.

use chrono::{DateTime, Utc};
use lopdf::{Dictionary, Document, Object, StringFormat};

use crate::config::Metadata;
use crate::error::{PdfCombineError, Result};

/// Value written to the Producer field.
pub const PRODUCER: &str = concat!("pdfcombine ", env!("CARGO_PKG_VERSION"));

/// Manager for PDF metadata.
#[derive(Debug, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Set metadata on a document.
    ///
    /// Unset fields are left out. Producer and dates are always written.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing Info entry cannot be replaced.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfcombine::merge::metadata::MetadataManager;
    /// # use pdfcombine::config::Metadata;
    /// # use lopdf::Document;
    /// # fn example(mut doc: Document) -> Result<(), Box<dyn std::error::Error>> {
    /// let manager = MetadataManager::new();
    /// let metadata = Metadata::new(Some("Quarterly report".to_string()), None, None);
    /// manager.set_metadata(&mut doc, &metadata)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_metadata(&self, doc: &mut Document, metadata: &Metadata) -> Result<()> {
        self.set_metadata_at(doc, metadata, Utc::now())
    }

    fn set_metadata_at(
        &self,
        doc: &mut Document,
        metadata: &Metadata,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let mut info = Dictionary::new();

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info.set(key, text_string(value));
            }
        }

        info.set("Producer", text_string(PRODUCER));
        let date = format_pdf_date(now);
        info.set("CreationDate", Object::string_literal(date.as_bytes()));
        info.set("ModDate", Object::string_literal(date.as_bytes()));

        match doc.trailer.get(b"Info").and_then(Object::as_reference) {
            Ok(info_id) => {
                let slot = doc
                    .objects
                    .get_mut(&info_id)
                    .ok_or_else(|| PdfCombineError::MetadataFailed {
                        reason: format!("Info object {} {} is missing", info_id.0, info_id.1),
                    })?;
                *slot = Object::Dictionary(info);
            }
            Err(_) => {
                let info_id = doc.add_object(info);
                doc.trailer.set("Info", Object::Reference(info_id));
            }
        }

        Ok(())
    }

    /// Get metadata from a document.
    pub fn get_metadata(&self, doc: &Document) -> Metadata {
        let Some(info) = info_dictionary(doc) else {
            return Metadata::default();
        };

        Metadata::new(
            read_text(info, b"Title"),
            read_text(info, b"Author"),
            read_text(info, b"Subject"),
        )
    }

    /// Read the Producer field.
    pub fn producer(&self, doc: &Document) -> Option<String> {
        info_dictionary(doc).and_then(|info| read_text(info, b"Producer"))
    }

    /// Check if a document has metadata.
    pub fn has_metadata(&self, doc: &Document) -> bool {
        doc.trailer.has(b"Info")
    }
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
    doc.get_dictionary(info_id).ok()
}

/// Encode a PDF text string.
///
/// ASCII goes out as a literal string; anything else as UTF-16BE with a byte
/// order mark, which every reader understands.
fn text_string(value: &str) -> Object {
    if value.is_ascii() {
        return Object::String(value.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn read_text(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let Ok(Object::String(bytes, _)) = dict.get(key) else {
        return None;
    };

    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => String::from_utf8(bytes.clone()).ok(),
    }
}

/// Format a timestamp as a PDF date string (`D:YYYYMMDDHHmmSSZ`).
fn format_pdf_date(time: DateTime<Utc>) -> String {
    time.format("D:%Y%m%d%H%M%SZ").to_string()
}
