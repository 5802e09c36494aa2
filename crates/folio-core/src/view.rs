//! View projection
//!
//! Pure functions merging the document, the active chapter index, the
//! selection and the translation results into a render-ready structure.
//! A missing chapter projects to the empty placeholder; nothing here fails.

use crate::config::SessionSettings;
use crate::context::TranslationMap;
use crate::document::{Document, DocumentId, DocumentMetadata};
use crate::selection::Selection;
use std::collections::BTreeSet;

/// Render state of one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphView {
    /// Position in the chapter
    pub index: usize,
    /// Original text
    pub text: String,
    /// Marked for translation
    pub selected: bool,
    /// Translated text, once received
    pub translation: Option<String>,
    /// Last request for this paragraph failed
    pub failed: bool,
}

/// Render state of the active chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterView {
    /// Requested chapter index
    pub index: usize,
    /// Display title
    pub title: String,
    /// True when no chapter exists at `index`
    pub placeholder: bool,
    /// Paragraphs in order
    pub paragraphs: Vec<ParagraphView>,
}

impl ChapterView {
    /// Flag paragraphs whose translation failed
    #[must_use]
    pub fn with_failures(mut self, failed: &BTreeSet<usize>) -> Self {
        for paragraph in &mut self.paragraphs {
            paragraph.failed = failed.contains(&paragraph.index);
        }
        self
    }

    /// Number of translated paragraphs
    #[must_use]
    pub fn translated_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.translation.is_some()).count()
    }
}

/// Project the active chapter of `document`
#[must_use]
pub fn project_chapter(
    document: &Document,
    active: usize,
    selection: &Selection,
    translations: &TranslationMap,
) -> ChapterView {
    let placeholder = document.chapter(active).is_none();
    let chapter = document.chapter_or_placeholder(active);

    let title = if placeholder {
        chapter.title.clone().unwrap_or_default()
    } else {
        chapter.display_title(active)
    };

    let paragraphs = chapter
        .paragraphs
        .iter()
        .enumerate()
        .map(|(index, text)| ParagraphView {
            index,
            text: text.clone(),
            selected: selection.is_selected(index),
            translation: translations.get(&index).cloned(),
            failed: false,
        })
        .collect();

    ChapterView {
        index: active,
        title,
        placeholder,
        paragraphs,
    }
}

/// Header and navigation data of a ready document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentView {
    /// Document id
    pub id: DocumentId,
    /// Upload filename
    pub filename: String,
    /// Metadata for the header
    pub metadata: DocumentMetadata,
    /// Display titles for the chapter list
    pub chapter_titles: Vec<String>,
    /// The active chapter
    pub chapter: ChapterView,
    /// Number of selected paragraphs
    pub selected_count: usize,
    /// A batch of the active chapter is running
    pub translating: bool,
    /// Session languages and style
    pub settings: SessionSettings,
}

impl DocumentView {
    /// Whether the translate action is available
    #[inline]
    #[must_use]
    pub fn can_translate(&self) -> bool {
        self.selected_count > 0 && !self.translating
    }
}

/// Whole-workspace render state; the variants are mutually exclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceView {
    /// Nothing loaded
    NoDocument,
    /// Document fetch in flight
    Loading {
        /// Requested document
        id: DocumentId,
    },
    /// Document fetch failed; nothing else is rendered
    Failed {
        /// Requested document
        id: DocumentId,
        /// Human-readable message
        message: String,
    },
    /// Document ready
    Ready(Box<DocumentView>),
}

impl WorkspaceView {
    /// Active chapter view, only when ready
    #[must_use]
    pub fn chapter(&self) -> Option<&ChapterView> {
        match self {
            Self::Ready(view) => Some(&view.chapter),
            _ => None,
        }
    }
}
