//! Document model
//!
//! A document is an ordered list of chapters; a chapter is an ordered list of
//! paragraphs. Paragraphs are addressed by position inside their chapter, never
//! by content. Documents are immutable once loaded and replaced wholesale.

use crate::error::WorkspaceError;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Title given to the synthetic chapter shown when no chapter exists at the
/// requested position
pub const PLACEHOLDER_TITLE: &str = "untitled";

/// Server-assigned document identifier (always positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct DocumentId(u64);

impl DocumentId {
    /// Create a document id
    ///
    /// # Errors
    /// `WorkspaceError::InvalidDocumentId` if `raw` is zero
    pub fn new(raw: u64) -> Result<Self, WorkspaceError> {
        if raw == 0 {
            return Err(WorkspaceError::InvalidDocumentId(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// Raw numeric value
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for DocumentId {
    type Error = WorkspaceError;

    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DocumentId> for u64 {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u64>()
            .map_err(|_| WorkspaceError::InvalidDocumentId(s.to_string()))?;
        Self::new(raw)
    }
}

/// Optional descriptive metadata extracted by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Author, when known
    #[serde(default)]
    pub author: Option<String>,
    /// Title, when known
    #[serde(default)]
    pub title: Option<String>,
    /// Page count of the source file
    #[serde(default)]
    pub num_pages: Option<u32>,
}

/// A titled, ordered sequence of paragraphs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter title (may be absent)
    #[serde(default)]
    pub title: Option<String>,
    /// Paragraph texts in reading order
    #[serde(default, deserialize_with = "null_as_default")]
    pub paragraphs: Vec<String>,
}

impl Chapter {
    /// Create a chapter
    #[must_use]
    pub fn new(title: Option<String>, paragraphs: Vec<String>) -> Self {
        Self { title, paragraphs }
    }

    /// The empty chapter rendered in place of a missing one
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            title: Some(PLACEHOLDER_TITLE.to_string()),
            paragraphs: Vec::new(),
        }
    }

    /// Paragraph at `index`
    #[inline]
    #[must_use]
    pub fn paragraph(&self, index: usize) -> Option<&str> {
        self.paragraphs.get(index).map(String::as_str)
    }

    /// Number of paragraphs
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    /// Whether the chapter has no paragraphs
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    /// Title for display; untitled chapters are named by position
    #[must_use]
    pub fn display_title(&self, index: usize) -> String {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Chapter {}", index + 1),
        }
    }
}

/// A loaded document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier
    pub id: DocumentId,
    /// Original upload filename
    pub filename: String,
    /// Chapters in order (may be empty)
    #[serde(default, deserialize_with = "null_as_default")]
    pub chapters: Vec<Chapter>,
    /// Descriptive metadata
    #[serde(default, alias = "document_metadata", deserialize_with = "null_as_default")]
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document without metadata
    #[must_use]
    pub fn new(id: DocumentId, filename: impl Into<String>, chapters: Vec<Chapter>) -> Self {
        Self {
            id,
            filename: filename.into(),
            chapters,
            metadata: DocumentMetadata::default(),
        }
    }

    /// With metadata
    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Chapter at `index`
    #[inline]
    #[must_use]
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Chapter at `index`, or the placeholder when there is none
    #[must_use]
    pub fn chapter_or_placeholder(&self, index: usize) -> Cow<'_, Chapter> {
        self.chapters
            .get(index)
            .map_or_else(|| Cow::Owned(Chapter::placeholder()), Cow::Borrowed)
    }

    /// Number of chapters
    #[inline]
    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Paragraph count across all chapters
    #[must_use]
    pub fn total_paragraphs(&self) -> usize {
        self.chapters.iter().map(Chapter::len).sum()
    }

    /// Display titles of every chapter, in order
    #[must_use]
    pub fn chapter_titles(&self) -> Vec<String> {
        self.chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| chapter.display_title(index))
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_rejects_zero() {
        assert!(DocumentId::new(0).is_err());
        assert_eq!(DocumentId::new(42).unwrap().get(), 42);
        assert_eq!("7".parse::<DocumentId>().unwrap().get(), 7);
        assert!("-3".parse::<DocumentId>().is_err());
        assert!("abc".parse::<DocumentId>().is_err());
    }

    #[test]
    fn document_decodes_service_payload() {
        let json = r#"{
            "id": 42,
            "filename": "book.pdf",
            "chapters": [
                {"title": "Intro", "paragraphs": ["Hello", "World"]},
                {"paragraphs": []}
            ],
            "metadata": {"author": "Ana", "num_pages": 12}
        }"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.id.get(), 42);
        assert_eq!(doc.chapter_count(), 2);
        assert_eq!(doc.total_paragraphs(), 2);
        assert_eq!(doc.metadata.author.as_deref(), Some("Ana"));
        assert_eq!(doc.metadata.num_pages, Some(12));
        assert_eq!(doc.chapters[1].title, None);
    }

    #[test]
    fn document_id_wire_form_is_positive_integer() {
        assert_eq!(serde_json::to_string(&DocumentId::new(9).unwrap()).unwrap(), "9");
        assert_eq!(serde_json::from_str::<DocumentId>("9").unwrap().get(), 9);
        assert!(serde_json::from_str::<DocumentId>("0").is_err());

        let json = r#"{"id": 0, "filename": "zero.txt", "chapters": []}"#;
        assert!(serde_json::from_str::<Document>(json).is_err());
    }

    #[test]
    fn document_tolerates_missing_and_null_fields() {
        let json = r#"{"id": 3, "filename": "x.txt", "chapters": null, "document_metadata": null}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.chapter_count(), 0);
        assert_eq!(doc.metadata, DocumentMetadata::default());
    }

    #[test]
    fn chapter_display_title_falls_back_to_position() {
        assert_eq!(Chapter::new(Some("One".into()), vec![]).display_title(0), "One");
        assert_eq!(Chapter::new(Some("  ".into()), vec![]).display_title(1), "Chapter 2");
        assert_eq!(Chapter::new(None, vec![]).display_title(2), "Chapter 3");
    }

    #[test]
    fn chapter_or_placeholder_out_of_range() {
        let doc = Document::new(DocumentId::new(1).unwrap(), "a.txt", vec![]);
        let chapter = doc.chapter_or_placeholder(5);
        assert_eq!(chapter.title.as_deref(), Some(PLACEHOLDER_TITLE));
        assert!(chapter.is_empty());
    }
}
