use crate::ValidationWarning;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Content type declared for every exported document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// ── Filename derivation ──────────────────────────────────────────────────────

/// Compute the download filename for an export.
///
/// The base name is the trimmed `user_input`, or `original_name` when the
/// input is blank. `.pdf` is appended unless the base already ends with it
/// (case-insensitively). This is a literal suffix check, an existing
/// extension is never replaced.
///
/// ```
/// use pdfmetaedit::derive_filename;
///
/// assert_eq!(derive_filename("", "report.pdf"), "report.pdf");
/// assert_eq!(derive_filename("out", "report.pdf"), "out.pdf");
/// assert_eq!(derive_filename("out.PDF", "report.pdf"), "out.PDF");
/// assert_eq!(derive_filename("notes.pdfx", "report.pdf"), "notes.pdfx.pdf");
/// ```
pub fn derive_filename(user_input: &str, original_name: &str) -> String {
    let trimmed = user_input.trim();
    let base = if trimmed.is_empty() {
        original_name
    } else {
        trimmed
    };

    if base.to_lowercase().ends_with(".pdf") {
        base.to_owned()
    } else {
        format!("{base}.pdf")
    }
}

// ── ExportArtifact ───────────────────────────────────────────────────────────

/// A named, downloadable document produced by a commit.
///
/// Returned by [`crate::MetadataEditor::commit`]. Only the most recent
/// artifact is kept by the editor; earlier ones are dropped.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested filename, see [`derive_filename`].
    pub filename: String,

    /// The serialized document.
    pub data: Vec<u8>,

    /// Date fields that were not written because they could not be parsed.
    pub skipped: Vec<ValidationWarning>,
}

impl ExportArtifact {
    pub fn content_type(&self) -> &'static str {
        PDF_CONTENT_TYPE
    }

    /// Text for the download action, e.g. `Download "report.pdf"`.
    pub fn label(&self) -> String {
        format!("Download \"{}\"", self.filename)
    }

    /// Write this artifact into `output_dir`, creating the directory if
    /// necessary, and return the path written.
    ///
    /// The filename must be a single path component; names such as
    /// `../x.pdf` or `sub/x.pdf` are rejected with
    /// [`std::io::ErrorKind::InvalidInput`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pdfmetaedit::MetadataEditor;
    ///
    /// let bytes = std::fs::read("report.pdf").unwrap();
    /// let mut editor: MetadataEditor = MetadataEditor::new();
    /// editor.load(&bytes, "report.pdf").unwrap();
    /// let artifact = editor.commit("").unwrap();
    /// artifact.save_to_disk("./out").unwrap();
    /// ```
    pub fn save_to_disk<P: AsRef<Path>>(&self, output_dir: P) -> std::io::Result<PathBuf> {
        let dir = output_dir.as_ref();
        let plain = !self.filename.contains(['/', '\\'])
            && Path::new(&self.filename).file_name() == Some(OsStr::new(&self.filename));
        if !plain {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("export filename '{}' is not a plain file name", self.filename),
            ));
        }
        std::fs::create_dir_all(dir)?;
        let dest = dir.join(&self.filename);
        std::fs::write(&dest, &self.data)?;
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_falls_back_to_original_name() {
        assert_eq!(derive_filename("", "report.pdf"), "report.pdf");
        assert_eq!(derive_filename("   ", "report.pdf"), "report.pdf");
        assert_eq!(derive_filename("", "scan"), "scan.pdf");
    }

    #[test]
    fn input_is_trimmed_and_suffixed() {
        assert_eq!(derive_filename("out", "report.pdf"), "out.pdf");
        assert_eq!(derive_filename("  my file  ", "x.pdf"), "my file.pdf");
    }

    #[test]
    fn suffix_check_ignores_case() {
        assert_eq!(derive_filename("out.PDF", "report.pdf"), "out.PDF");
        assert_eq!(derive_filename("Out.Pdf", "report.pdf"), "Out.Pdf");
    }

    #[test]
    fn suffix_check_is_literal() {
        assert_eq!(derive_filename("a.pdfx", "r.pdf"), "a.pdfx.pdf");
        assert_eq!(derive_filename("a.txt", "r.pdf"), "a.txt.pdf");
        assert_eq!(derive_filename("pdf", "r.pdf"), "pdf.pdf");
        assert_eq!(derive_filename(".pdf", "r.pdf"), ".pdf");
    }

    #[test]
    fn label_quotes_filename() {
        let artifact = ExportArtifact {
            filename: "out.pdf".into(),
            data: vec![],
            skipped: vec![],
        };
        assert_eq!(artifact.label(), "Download \"out.pdf\"");
        assert_eq!(artifact.content_type(), "application/pdf");
    }

    #[test]
    fn save_to_disk_refuses_names_leaving_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let out = root.path().join("out");
        for name in ["../escape.pdf", "sub/x.pdf", "..\\x.pdf", "...pdf/.."] {
            let artifact = ExportArtifact {
                filename: name.into(),
                data: b"%PDF-".to_vec(),
                skipped: vec![],
            };
            let err = artifact.save_to_disk(&out).unwrap_err();
            assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput, "{name}");
        }
        assert!(!root.path().join("escape.pdf").exists());
    }
}
