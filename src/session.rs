use crate::export::{derive_filename, ExportArtifact};
use crate::pipeline;
use crate::{
    DocumentInfo, EditError, EditorConfig, Field, MetadataDocument, MetadataRecord, PdfDocument,
    Result,
};
use log::{debug, info};

// ── DocumentSession ──────────────────────────────────────────────────────────

/// One loaded document together with the metadata being edited for it.
///
/// The record is derived from the document when the session is created and
/// is edited independently afterwards; the document only changes on commit.
#[derive(Debug)]
pub struct DocumentSession<D> {
    document: D,
    original_name: String,
    record: MetadataRecord,
}

impl<D: MetadataDocument> DocumentSession<D> {
    pub(crate) fn new(document: D, original_name: &str) -> Self {
        let record = MetadataRecord::from_info(&document.info());
        Self {
            document,
            original_name: original_name.to_owned(),
            record,
        }
    }

    /// The filename the document was loaded under.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn record(&self) -> &MetadataRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut MetadataRecord {
        &mut self.record
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    /// The metadata currently stored in the document, which may differ from
    /// [`record`](Self::record) until the next commit.
    pub fn stored_info(&self) -> DocumentInfo {
        self.document.info()
    }

    /// Discard pending edits and re-derive the record from the document.
    pub fn reload_record(&mut self) {
        self.record = MetadataRecord::from_info(&self.document.info());
    }
}

// ── Load tickets ─────────────────────────────────────────────────────────────

/// Identifies one load attempt. Tickets increase monotonically per editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

/// What happened to a finished extraction handed to
/// [`MetadataEditor::install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The session replaced whatever was loaded before.
    Loaded,
    /// A load started later has already been installed; this result was
    /// dropped.
    Superseded,
}

/// Lifecycle of the editor. Unsaved edits are not tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Exported,
}

// ── MetadataEditor ───────────────────────────────────────────────────────────

/// Owns the single live [`DocumentSession`] and the latest export.
///
/// Loads may overlap: call [`begin_load`](Self::begin_load) when a load is
/// triggered, run [`pipeline::extract`] whenever the bytes are available, and
/// hand the result to [`install`](Self::install). A result whose ticket is
/// older than the installed session's is discarded, so a slow load can never
/// overwrite a newer one. [`load`](Self::load) does all three steps at once.
///
/// ```no_run
/// use pdfmetaedit::{Field, MetadataEditor};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("report.pdf")?;
///
/// let mut editor: MetadataEditor = MetadataEditor::new();
/// editor.load(&bytes, "report.pdf")?;
/// editor.set_field(Field::Title, "Annual report")?;
///
/// let artifact = editor.commit("annual")?;
/// std::fs::write(&artifact.filename, &artifact.data)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MetadataEditor<D: MetadataDocument = PdfDocument> {
    config: EditorConfig,
    session: Option<DocumentSession<D>>,
    installed: Option<LoadTicket>,
    issued: u64,
    artifact: Option<ExportArtifact>,
}

impl<D: MetadataDocument> Default for MetadataEditor<D> {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl<D: MetadataDocument> MetadataEditor<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            session: None,
            installed: None,
            issued: 0,
            artifact: None,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match (&self.session, &self.artifact) {
            (None, _) => SessionState::Empty,
            (Some(_), None) => SessionState::Loaded,
            (Some(_), Some(_)) => SessionState::Exported,
        }
    }

    pub fn session(&self) -> Option<&DocumentSession<D>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut DocumentSession<D>> {
        self.session.as_mut()
    }

    pub fn record(&self) -> Option<&MetadataRecord> {
        self.session.as_ref().map(DocumentSession::record)
    }

    /// The most recent export, if the current session has been committed.
    pub fn artifact(&self) -> Option<&ExportArtifact> {
        self.artifact.as_ref()
    }

    /// Store user input for one field of the current record.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        let session = self.session.as_mut().ok_or(EditError::NoDocument)?;
        session.record.set(field, value);
        Ok(())
    }

    // ── Loading ──────────────────────────────────────────────────────────────

    /// Register the start of a load and return its ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Returns `true` unless a load started after `ticket` has already been
    /// installed.
    pub fn accepts(&self, ticket: LoadTicket) -> bool {
        self.installed.map_or(true, |current| ticket > current)
    }

    /// Replace the live session with `session`, unless it was superseded.
    ///
    /// Installing drops the previous session's record and any export made
    /// from it.
    pub fn install(&mut self, ticket: LoadTicket, session: DocumentSession<D>) -> LoadOutcome {
        if !self.accepts(ticket) {
            debug!(
                "discarding stale load {:?} of '{}'",
                ticket,
                session.original_name()
            );
            return LoadOutcome::Superseded;
        }

        info!("loaded '{}'", session.original_name());
        self.session = Some(session);
        self.installed = Some(ticket);
        self.artifact = None;
        LoadOutcome::Loaded
    }

    /// Parse `bytes` and make the result the live session.
    ///
    /// On error the previous session, if any, is left exactly as it was.
    pub fn load(&mut self, bytes: &[u8], original_name: &str) -> Result<&MetadataRecord> {
        let ticket = self.begin_load();
        let session = pipeline::extract(bytes, original_name, &self.config)?;
        self.install(ticket, session);
        self.record().ok_or(EditError::NoDocument)
    }

    // ── Export ───────────────────────────────────────────────────────────────

    /// Apply the current record to the document, serialize it, and name the
    /// result after `filename_input` (see [`derive_filename`]).
    ///
    /// The new artifact replaces the previous one. When
    /// [`EditorConfig::export_to_disk`] is set together with
    /// [`EditorConfig::output_directory`], the artifact is also written
    /// there.
    ///
    /// On a serialization or disk error no artifact is produced and the
    /// previous one is dropped, since the edits already applied to the
    /// document are kept and it no longer matches them.
    pub fn commit(&mut self, filename_input: &str) -> Result<&ExportArtifact> {
        let session = self.session.as_mut().ok_or(EditError::NoDocument)?;
        self.artifact = None;
        let outcome = pipeline::commit(&mut session.document, &session.record, &self.config)?;

        let artifact = ExportArtifact {
            filename: derive_filename(filename_input, &session.original_name),
            data: outcome.bytes,
            skipped: outcome.skipped,
        };

        if self.config.export_to_disk {
            if let Some(ref dir) = self.config.output_directory {
                let dest = artifact.save_to_disk(dir)?;
                info!("wrote {}", dest.display());
            }
        }

        info!(
            "exported '{}' ({} bytes)",
            artifact.filename,
            artifact.data.len()
        );
        Ok(&*self.artifact.insert(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryDocument;

    type Editor = MetadataEditor<MemoryDocument>;

    fn extract(name: &str) -> DocumentSession<MemoryDocument> {
        pipeline::extract(b"ok", name, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn new_editor_is_empty() {
        let editor = Editor::new();
        assert_eq!(editor.state(), SessionState::Empty);
        assert!(editor.record().is_none());
        assert!(editor.artifact().is_none());
    }

    #[test]
    fn lifecycle_moves_through_loaded_and_exported() {
        let mut editor = Editor::new();
        editor.load(b"ok", "a.pdf").unwrap();
        assert_eq!(editor.state(), SessionState::Loaded);

        editor.commit("").unwrap();
        assert_eq!(editor.state(), SessionState::Exported);

        editor.load(b"ok", "b.pdf").unwrap();
        assert_eq!(editor.state(), SessionState::Loaded);
        assert!(editor.artifact().is_none());
        assert_eq!(editor.session().unwrap().original_name(), "b.pdf");
    }

    #[test]
    fn commit_without_document_fails() {
        let mut editor = Editor::new();
        assert!(matches!(editor.commit("x"), Err(EditError::NoDocument)));
        assert!(matches!(
            editor.set_field(Field::Title, "x"),
            Err(EditError::NoDocument)
        ));
    }

    #[test]
    fn failed_load_keeps_previous_session() {
        let mut editor = Editor::new();
        editor.load(b"ok", "first.pdf").unwrap();
        editor.set_field(Field::Title, "draft").unwrap();

        assert!(editor.load(b"garbage", "second.pdf").is_err());

        let session = editor.session().unwrap();
        assert_eq!(session.original_name(), "first.pdf");
        assert_eq!(session.record().title, "draft");
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut editor = Editor::new();
        let older = editor.begin_load();
        let newer = editor.begin_load();

        assert_eq!(editor.install(newer, extract("new.pdf")), LoadOutcome::Loaded);
        assert_eq!(
            editor.install(older, extract("old.pdf")),
            LoadOutcome::Superseded
        );
        assert_eq!(editor.session().unwrap().original_name(), "new.pdf");
    }

    #[test]
    fn older_load_finishing_first_is_replaced_by_newer() {
        let mut editor = Editor::new();
        let older = editor.begin_load();
        let newer = editor.begin_load();

        assert_eq!(editor.install(older, extract("old.pdf")), LoadOutcome::Loaded);
        assert_eq!(editor.install(newer, extract("new.pdf")), LoadOutcome::Loaded);
        assert_eq!(editor.session().unwrap().original_name(), "new.pdf");
    }

    #[test]
    fn commit_names_artifact_from_input_or_original() {
        let mut editor = Editor::new();
        editor.load(b"ok", "report.pdf").unwrap();

        assert_eq!(editor.commit("  ").unwrap().filename, "report.pdf");
        assert_eq!(editor.commit("final").unwrap().filename, "final.pdf");
        assert_eq!(editor.artifact().unwrap().filename, "final.pdf");
    }

    #[test]
    fn failed_commit_produces_no_artifact() {
        let mut editor = Editor::new();
        editor.load(b"ok", "report.pdf").unwrap();
        editor.session_mut().unwrap().document.fail_save = true;
        editor.set_field(Field::Author, "someone").unwrap();

        assert!(matches!(
            editor.commit(""),
            Err(EditError::SerializationError(_))
        ));
        assert_eq!(editor.state(), SessionState::Loaded);
        let stored = editor.session().unwrap().stored_info();
        assert_eq!(stored.author.as_deref(), Some("someone"));
    }

    #[test]
    fn failed_commit_drops_the_previous_artifact() {
        let mut editor = Editor::new();
        editor.load(b"ok", "report.pdf").unwrap();
        editor.commit("first").unwrap();
        assert_eq!(editor.state(), SessionState::Exported);

        editor.session_mut().unwrap().document.fail_save = true;
        assert!(editor.commit("second").is_err());
        assert!(editor.artifact().is_none());
        assert_eq!(editor.state(), SessionState::Loaded);
    }

    #[test]
    fn reload_record_discards_pending_edits() {
        let mut editor = Editor::new();
        editor.load(b"ok", "a.pdf").unwrap();
        editor.set_field(Field::Subject, "pending").unwrap();

        let session = editor.session_mut().unwrap();
        session.reload_record();
        assert_eq!(session.record().subject, "");
    }
}
