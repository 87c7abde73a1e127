use crate::date;
use crate::EditError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ── Field ────────────────────────────────────────────────────────────────────

/// One of the eight standard descriptive fields of a PDF `/Info` dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Subject,
    Keywords,
    Creator,
    Producer,
    CreationDate,
    ModificationDate,
}

impl Field {
    /// Every field, in display order.
    pub const ALL: [Field; 8] = [
        Field::Title,
        Field::Author,
        Field::Subject,
        Field::Keywords,
        Field::Creator,
        Field::Producer,
        Field::CreationDate,
        Field::ModificationDate,
    ];

    /// The label shown next to the field, e.g. `"CreationDate"`.
    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Subject => "Subject",
            Field::Keywords => "Keywords",
            Field::Creator => "Creator",
            Field::Producer => "Producer",
            Field::CreationDate => "CreationDate",
            Field::ModificationDate => "ModificationDate",
        }
    }

    /// Returns `true` for the two timestamp fields.
    pub fn is_date(self) -> bool {
        matches!(self, Field::CreationDate | Field::ModificationDate)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = EditError;

    /// Case-insensitive label lookup. The PDF key `ModDate` is accepted as an
    /// alias for `ModificationDate`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("ModDate") {
            return Ok(Field::ModificationDate);
        }
        Field::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| EditError::UnknownField(s.to_owned()))
    }
}

// ── Keywords ─────────────────────────────────────────────────────────────────

/// An ordered list of keyword tokens.
///
/// Displayed as a single `", "`-joined string; parsed back by splitting on
/// `,`, trimming every token and dropping the empty ones.
///
/// ```
/// use pdfmetaedit::Keywords;
///
/// let kw = Keywords::parse("x, y ,, z");
/// assert_eq!(kw.as_slice(), ["x", "y", "z"]);
/// assert_eq!(kw.to_string(), "x, y, z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    pub fn parse(input: &str) -> Self {
        Self::from_tokens(input.split(','))
    }

    /// Build from already separated tokens, trimming them and dropping the
    /// empty ones.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for Keywords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

// ── DocumentInfo ─────────────────────────────────────────────────────────────

/// The metadata exactly as the document stores it: `None` means the entry is
/// absent from the `/Info` dictionary, which is distinct from an empty value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub modification_date: Option<DateTime<Utc>>,
}

impl DocumentInfo {
    /// Returns `true` if all fields are absent.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
            && self.creator.is_none()
            && self.producer.is_none()
            && self.creation_date.is_none()
            && self.modification_date.is_none()
    }
}

// ── MetadataRecord ───────────────────────────────────────────────────────────

/// The editable view of a document's metadata.
///
/// Every field is always present: absent entries become empty strings (or an
/// empty keyword list) when the record is built with
/// [`MetadataRecord::from_info`]. Dates are kept as text so that a form can
/// hold whatever the user typed; they are only parsed on commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: String,
    pub author: String,
    pub subject: String,
    pub keywords: Keywords,
    pub creator: String,
    pub producer: String,
    pub creation_date: String,
    pub modification_date: String,
}

impl MetadataRecord {
    pub fn from_info(info: &DocumentInfo) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let instant = |v: &Option<DateTime<Utc>>| {
            v.as_ref().map(date::format_instant).unwrap_or_default()
        };

        Self {
            title: text(&info.title),
            author: text(&info.author),
            subject: text(&info.subject),
            keywords: info
                .keywords
                .as_ref()
                .map(Keywords::from_tokens)
                .unwrap_or_default(),
            creator: text(&info.creator),
            producer: text(&info.producer),
            creation_date: instant(&info.creation_date),
            modification_date: instant(&info.modification_date),
        }
    }

    /// The display value of `field`; keywords are joined with `", "`.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Author => self.author.clone(),
            Field::Subject => self.subject.clone(),
            Field::Keywords => self.keywords.to_string(),
            Field::Creator => self.creator.clone(),
            Field::Producer => self.producer.clone(),
            Field::CreationDate => self.creation_date.clone(),
            Field::ModificationDate => self.modification_date.clone(),
        }
    }

    /// Store user input for `field`. Keywords are re-split; everything else,
    /// dates included, is kept verbatim.
    pub fn set(&mut self, field: Field, value: &str) {
        let value = value.to_owned();
        match field {
            Field::Title => self.title = value,
            Field::Author => self.author = value,
            Field::Subject => self.subject = value,
            Field::Keywords => self.keywords = Keywords::parse(&value),
            Field::Creator => self.creator = value,
            Field::Producer => self.producer = value,
            Field::CreationDate => self.creation_date = value,
            Field::ModificationDate => self.modification_date = value,
        }
    }

    /// `(label, display value)` pairs in field order, for a table view.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        Field::ALL
            .into_iter()
            .map(|f| (f.label(), self.get(f)))
            .collect()
    }

    /// The live validation state of one field.
    ///
    /// Only date fields can be invalid. An empty date is "not set" and never
    /// produces a warning.
    pub fn warning(&self, field: Field) -> Option<ValidationWarning> {
        if !field.is_date() {
            return None;
        }
        let value = self.get(field);
        if value.is_empty() || date::is_valid_instant(&value) {
            None
        } else {
            Some(ValidationWarning { field, value })
        }
    }

    /// All current validation warnings, in field order.
    pub fn warnings(&self) -> Vec<ValidationWarning> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.warning(f))
            .collect()
    }
}

// ── ValidationWarning ────────────────────────────────────────────────────────

/// A date field whose text is not a usable timestamp.
///
/// Never fatal: on commit the field is skipped and the document keeps its
/// previous value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} \"{value}\" is not a valid timestamp (expected YYYY-MM-DDTHH:MM:SSZ)")]
pub struct ValidationWarning {
    pub field: Field,
    pub value: String,
}
