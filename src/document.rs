use crate::date;
use crate::{DocumentInfo, EditError, Result};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use lopdf::{Dictionary, Document, Object, ObjectId};

// ── MetadataDocument ─────────────────────────────────────────────────────────

/// A loaded document whose descriptive metadata can be read, changed and
/// written back out.
///
/// Getters return `None` when the entry is absent. Setters never fail; any
/// structure they need (such as a missing `/Info` dictionary) is created on
/// demand. Only [`load`](MetadataDocument::load) and
/// [`save`](MetadataDocument::save) touch the byte representation.
pub trait MetadataDocument: Sized {
    /// Parse a document from its serialized bytes.
    fn load(bytes: &[u8]) -> Result<Self>;

    /// Serialize the document, including every change made through the
    /// setters.
    fn save(&mut self) -> Result<Vec<u8>>;

    fn title(&self) -> Option<String>;
    fn author(&self) -> Option<String>;
    fn subject(&self) -> Option<String>;
    fn keywords(&self) -> Option<Vec<String>>;
    fn creator(&self) -> Option<String>;
    fn producer(&self) -> Option<String>;
    fn creation_date(&self) -> Option<DateTime<Utc>>;
    fn modification_date(&self) -> Option<DateTime<Utc>>;

    fn set_title(&mut self, value: &str);
    fn set_author(&mut self, value: &str);
    fn set_subject(&mut self, value: &str);
    fn set_keywords(&mut self, keywords: &[String]);
    fn set_creator(&mut self, value: &str);
    fn set_producer(&mut self, value: &str);
    fn set_creation_date(&mut self, value: DateTime<Utc>);
    fn set_modification_date(&mut self, value: DateTime<Utc>);

    /// Read all eight fields at once.
    fn info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self.title(),
            author: self.author(),
            subject: self.subject(),
            keywords: self.keywords(),
            creator: self.creator(),
            producer: self.producer(),
            creation_date: self.creation_date(),
            modification_date: self.modification_date(),
        }
    }
}

// ── PdfDocument ──────────────────────────────────────────────────────────────

/// [`MetadataDocument`] backed by [`lopdf`], operating on the trailer's
/// `/Info` dictionary.
///
/// Keywords are stored as a single `", "`-joined string and split on `,`
/// when read back. Dates are stored as PDF date strings in UTC.
#[derive(Debug)]
pub struct PdfDocument {
    document: Document,
}

impl PdfDocument {
    /// Wrap an already parsed [`lopdf::Document`].
    pub fn from_document(document: Document) -> Self {
        Self { document }
    }

    /// Returns a reference to the underlying [`lopdf::Document`].
    pub fn document(&self) -> &Document {
        &self.document
    }

    // ── Private: /Info access ────────────────────────────────────────────────

    /// The `/Info` dictionary, whether stored inline in the trailer or as an
    /// indirect object.
    fn info_dict(&self) -> Option<&Dictionary> {
        let info = self.document.trailer.get(b"Info").ok()?;
        match info.as_reference() {
            Ok(id) => self.document.get_object(id).and_then(Object::as_dict).ok(),
            Err(_) => info.as_dict().ok(),
        }
    }

    /// Object id of the `/Info` dictionary, creating one when the trailer has
    /// none. An inline dictionary is moved into an indirect object so that
    /// later writes have a single place to go.
    fn ensure_info(&mut self) -> ObjectId {
        let existing = self.document.trailer.get(b"Info").ok().cloned();
        let dict = match existing {
            Some(Object::Reference(id))
                if self.document.get_object(id).and_then(Object::as_dict).is_ok() =>
            {
                return id;
            }
            Some(Object::Dictionary(dict)) => dict,
            Some(other) => {
                warn!("replacing unusable /Info trailer entry {other:?}");
                Dictionary::new()
            }
            None => Dictionary::new(),
        };

        let id = self.document.add_object(dict);
        self.document.trailer.set("Info", id);
        debug!("created /Info dictionary as object {} {}", id.0, id.1);
        id
    }

    fn set_entry(&mut self, key: &str, value: Object) {
        let id = self.ensure_info();
        match self.document.get_object_mut(id).and_then(Object::as_dict_mut) {
            Ok(dict) => dict.set(key, value),
            Err(e) => warn!("cannot write /Info /{key}: {e}"),
        }
    }

    /// Read a text entry, following an indirect reference if needed.
    fn text(&self, key: &[u8]) -> Option<String> {
        let value = self.info_dict()?.get(key).ok()?;
        let value = match value.as_reference() {
            Ok(id) => self.document.get_object(id).ok()?,
            Err(_) => value,
        };
        match value {
            Object::String(..) => Some(decode_text(value)),
            _ => None,
        }
    }

    fn set_text(&mut self, key: &str, value: &str) {
        self.set_entry(key, lopdf::text_string(value));
    }

    fn date(&self, key: &[u8]) -> Option<DateTime<Utc>> {
        let raw = self.text(key)?;
        let parsed = date::parse_pdf_date(&raw);
        if parsed.is_none() {
            debug!(
                "ignoring unparsable /{} {raw:?}",
                String::from_utf8_lossy(key)
            );
        }
        parsed
    }

    fn set_date(&mut self, key: &str, value: DateTime<Utc>) {
        self.set_entry(key, Object::string_literal(date::format_pdf_date(&value)));
    }
}

impl MetadataDocument for PdfDocument {
    fn load(bytes: &[u8]) -> Result<Self> {
        // Readers tolerate a little junk ahead of the header.
        if !bytes.windows(5).take(1024).any(|w| w == b"%PDF-") {
            return Err(EditError::InvalidPdf("no %PDF- header".into()));
        }
        Ok(Self {
            document: Document::load_mem(bytes)?,
        })
    }

    fn save(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.document
            .save_to(&mut buffer)
            .map_err(|e| EditError::SerializationError(e.to_string()))?;
        Ok(buffer)
    }

    fn title(&self) -> Option<String> {
        self.text(b"Title")
    }

    fn author(&self) -> Option<String> {
        self.text(b"Author")
    }

    fn subject(&self) -> Option<String> {
        self.text(b"Subject")
    }

    fn keywords(&self) -> Option<Vec<String>> {
        self.text(b"Keywords").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }

    fn creator(&self) -> Option<String> {
        self.text(b"Creator")
    }

    fn producer(&self) -> Option<String> {
        self.text(b"Producer")
    }

    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.date(b"CreationDate")
    }

    fn modification_date(&self) -> Option<DateTime<Utc>> {
        self.date(b"ModDate")
    }

    fn set_title(&mut self, value: &str) {
        self.set_text("Title", value);
    }

    fn set_author(&mut self, value: &str) {
        self.set_text("Author", value);
    }

    fn set_subject(&mut self, value: &str) {
        self.set_text("Subject", value);
    }

    fn set_keywords(&mut self, keywords: &[String]) {
        self.set_text("Keywords", &keywords.join(", "));
    }

    fn set_creator(&mut self, value: &str) {
        self.set_text("Creator", value);
    }

    fn set_producer(&mut self, value: &str) {
        self.set_text("Producer", value);
    }

    fn set_creation_date(&mut self, value: DateTime<Utc>) {
        self.set_date("CreationDate", value);
    }

    fn set_modification_date(&mut self, value: DateTime<Utc>) {
        self.set_date("ModDate", value);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Decode a PDF text string. Without a byte order mark the bytes are
/// PDFDocEncoding; lopdf keeps a UTF-8 BOM in its output, so it is dropped
/// here.
fn decode_text(value: &Object) -> String {
    match lopdf::decode_text_string(value) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_owned(),
            None => text,
        },
        Err(e) => {
            debug!("text string does not decode cleanly ({e}); reading it lossily");
            String::from_utf8_lossy(value.as_str().unwrap_or_default()).into_owned()
        }
    }
}
