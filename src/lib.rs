//! # pdfmetaedit
//!
//! A Rust library for reading, editing and re-exporting the descriptive
//! metadata of PDF documents.
//!
//! ## What this crate does
//!
//! 1. **Extract** — parses PDF bytes and reads the eight standard `/Info`
//!    fields (Title, Author, Subject, Keywords, Creator, Producer,
//!    CreationDate, ModificationDate) into an editable [`MetadataRecord`].
//! 2. **Validate** — checks user-entered timestamps against the strict
//!    `YYYY-MM-DDTHH:MM:SSZ` form ([`is_valid_instant`]).
//! 3. **Commit** — writes the edited record back into the document and
//!    serializes it. Dates that do not parse are skipped, never fatal.
//! 4. **Export** — names the result ([`derive_filename`]) and hands it out
//!    as an [`ExportArtifact`].
//!
//! ## Quick example
//!
//! ```no_run
//! use pdfmetaedit::{Field, MetadataEditor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("report.pdf")?;
//!
//! let mut editor: MetadataEditor = MetadataEditor::new();
//! let record = editor.load(&bytes, "report.pdf")?;
//! println!("Title    : {}", record.title);
//! println!("Keywords : {}", record.keywords);
//!
//! editor.set_field(Field::Keywords, "finance, q3, draft")?;
//! editor.set_field(Field::CreationDate, "2024-01-15T10:30:00Z")?;
//!
//! let artifact = editor.commit("report-q3")?;
//! artifact.save_to_disk("./out")?;
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

mod date;
mod document;
mod export;
pub mod pipeline;
mod record;
mod session;

#[cfg(test)]
mod testing;

pub use date::{format_instant, is_valid_instant, parse_commit_date, parse_instant};
pub use document::{MetadataDocument, PdfDocument};
pub use export::{derive_filename, ExportArtifact, PDF_CONTENT_TYPE};
pub use pipeline::CommitOutcome;
pub use record::{DocumentInfo, Field, Keywords, MetadataRecord, ValidationWarning};
pub use session::{DocumentSession, LoadOutcome, LoadTicket, MetadataEditor, SessionState};

// ── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration for [`MetadataEditor`].
#[derive(Debug, Clone, Default)]
pub struct EditorConfig {
    /// When `false` (the default) a date is written on commit only if it
    /// passes [`is_valid_instant`] and names a real calendar instant. When
    /// `true`, RFC 3339 timestamps with offsets or fractional seconds,
    /// zone-less date-times and bare `YYYY-MM-DD` dates (all read as UTC)
    /// are accepted as well.
    pub lenient_dates: bool,

    /// If set, loading returns [`EditError::FileSizeExceeded`] for inputs
    /// larger than this many bytes.
    pub max_input_size: Option<usize>,

    /// If `true` and `output_directory` is also set, every artifact produced
    /// by [`MetadataEditor::commit`] is written to disk automatically.
    pub export_to_disk: bool,

    /// Directory used when `export_to_disk` is `true`.
    pub output_directory: Option<String>,
}

// ── Error type ───────────────────────────────────────────────────────────────

/// Every error that this crate can produce.
#[derive(Error, Debug)]
pub enum EditError {
    /// A filesystem I/O error occurred while exporting.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The underlying lopdf parser rejected the input bytes.
    #[error("PDF parse error: {0}")]
    ParseError(#[from] lopdf::Error),

    /// The input bytes were rejected before parsing, for example because they
    /// have no `%PDF-` header. Other [`MetadataDocument`]
    /// implementations use it for inputs in a format they do not handle.
    #[error("Invalid PDF: {0}")]
    InvalidPdf(String),

    /// The document could not be serialized back to bytes.
    #[error("Failed to serialize PDF: {0}")]
    SerializationError(String),

    /// An edit or commit was requested while no document is loaded.
    #[error("No document loaded")]
    NoDocument,

    /// The input exceeds the configured `max_input_size` limit.
    #[error("Input exceeds the configured maximum size")]
    FileSizeExceeded,

    /// A field name that is not one of the eight standard fields.
    #[error("Unknown metadata field '{0}'")]
    UnknownField(String),
}

impl EditError {
    /// Returns `true` for errors meaning "these bytes are not a loadable
    /// document".
    pub fn is_parse_error(&self) -> bool {
        matches!(self, EditError::ParseError(_) | EditError::InvalidPdf(_))
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, EditError>;
