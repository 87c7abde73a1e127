//! The two halves of an editing round trip: bytes → record, record → bytes.

use crate::date;
use crate::{
    DocumentSession, EditError, EditorConfig, Field, MetadataDocument, MetadataRecord, Result,
    ValidationWarning,
};
use chrono::{DateTime, Utc};
use log::{debug, warn};

// ── Extraction ───────────────────────────────────────────────────────────────

/// Parse `bytes` and build a session holding the document and its metadata.
///
/// Nothing outside the returned session is touched, so a failure here leaves
/// whatever session the caller already holds intact.
///
/// Returns [`EditError::FileSizeExceeded`] when the input is larger than
/// [`EditorConfig::max_input_size`], or the document library's parse error.
pub fn extract<D: MetadataDocument>(
    bytes: &[u8],
    original_name: &str,
    config: &EditorConfig,
) -> Result<DocumentSession<D>> {
    if let Some(max) = config.max_input_size {
        if bytes.len() > max {
            return Err(EditError::FileSizeExceeded);
        }
    }

    let document = D::load(bytes)?;
    let session = DocumentSession::new(document, original_name);
    debug!(
        "extracted metadata from '{original_name}' ({} bytes)",
        bytes.len()
    );
    Ok(session)
}

// ── Commit ───────────────────────────────────────────────────────────────────

/// Result of a successful [`commit`].
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    /// The serialized document.
    pub bytes: Vec<u8>,

    /// Date fields that were left untouched because their text could not be
    /// parsed.
    pub skipped: Vec<ValidationWarning>,
}

/// Write `record` into `document` and serialize it.
///
/// The text fields and keywords are applied unconditionally. Each date is
/// applied only when it parses (strictly, unless
/// [`EditorConfig::lenient_dates`] is set); otherwise the document keeps its
/// previous value for that field. An empty date is "not set" and is skipped
/// without a warning.
///
/// Changes made to `document` stay in place even when serialization fails.
pub fn commit<D: MetadataDocument>(
    document: &mut D,
    record: &MetadataRecord,
    config: &EditorConfig,
) -> Result<CommitOutcome> {
    document.set_title(&record.title);
    document.set_author(&record.author);
    document.set_subject(&record.subject);
    document.set_keywords(record.keywords.as_slice());
    document.set_creator(&record.creator);
    document.set_producer(&record.producer);

    let mut skipped = Vec::new();

    if let Some(instant) = commit_date(
        Field::CreationDate,
        &record.creation_date,
        config.lenient_dates,
        &mut skipped,
    ) {
        document.set_creation_date(instant);
    }

    if let Some(instant) = commit_date(
        Field::ModificationDate,
        &record.modification_date,
        config.lenient_dates,
        &mut skipped,
    ) {
        document.set_modification_date(instant);
    }

    let bytes = document.save()?;
    debug!(
        "committed metadata: {} bytes, {} date field(s) skipped",
        bytes.len(),
        skipped.len()
    );

    Ok(CommitOutcome { bytes, skipped })
}

fn commit_date(
    field: Field,
    value: &str,
    lenient: bool,
    skipped: &mut Vec<ValidationWarning>,
) -> Option<DateTime<Utc>> {
    if value.trim().is_empty() {
        return None;
    }

    let parsed = date::parse_commit_date(value, lenient);
    if parsed.is_none() {
        let warning = ValidationWarning {
            field,
            value: value.to_owned(),
        };
        warn!("{warning}; keeping the stored value");
        skipped.push(warning);
    }
    parsed
}
