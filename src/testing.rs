//! Test doubles shared by the unit tests.

use crate::{DocumentInfo, EditError, MetadataDocument, Result};
use chrono::{DateTime, Utc};

/// In-memory stand-in for a document library.
#[derive(Debug, Default)]
pub(crate) struct MemoryDocument {
    pub(crate) info: DocumentInfo,
    pub(crate) fail_save: bool,
    pub(crate) saves: usize,
}

impl MetadataDocument for MemoryDocument {
    fn load(bytes: &[u8]) -> Result<Self> {
        match bytes {
            b"ok" => Ok(Self::default()),
            _ => Err(EditError::InvalidPdf("not a memory document".into())),
        }
    }

    fn save(&mut self) -> Result<Vec<u8>> {
        if self.fail_save {
            return Err(EditError::SerializationError("disk full".into()));
        }
        self.saves += 1;
        Ok(format!("{:?}", self.info).into_bytes())
    }

    fn title(&self) -> Option<String> {
        self.info.title.clone()
    }
    fn author(&self) -> Option<String> {
        self.info.author.clone()
    }
    fn subject(&self) -> Option<String> {
        self.info.subject.clone()
    }
    fn keywords(&self) -> Option<Vec<String>> {
        self.info.keywords.clone()
    }
    fn creator(&self) -> Option<String> {
        self.info.creator.clone()
    }
    fn producer(&self) -> Option<String> {
        self.info.producer.clone()
    }
    fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.info.creation_date
    }
    fn modification_date(&self) -> Option<DateTime<Utc>> {
        self.info.modification_date
    }

    fn set_title(&mut self, value: &str) {
        self.info.title = Some(value.into());
    }
    fn set_author(&mut self, value: &str) {
        self.info.author = Some(value.into());
    }
    fn set_subject(&mut self, value: &str) {
        self.info.subject = Some(value.into());
    }
    fn set_keywords(&mut self, keywords: &[String]) {
        self.info.keywords = Some(keywords.to_vec());
    }
    fn set_creator(&mut self, value: &str) {
        self.info.creator = Some(value.into());
    }
    fn set_producer(&mut self, value: &str) {
        self.info.producer = Some(value.into());
    }
    fn set_creation_date(&mut self, value: DateTime<Utc>) {
        self.info.creation_date = Some(value);
    }
    fn set_modification_date(&mut self, value: DateTime<Utc>) {
        self.info.modification_date = Some(value);
    }
}
