//! Workspace change notifications
//!
//! Advisory signals for renderers; the workspace state is authoritative.

use crate::document::DocumentId;
use crate::navigator::{BatchToken, ContextEpoch};

/// Something in the workspace changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    /// Document fetch started
    LoadStarted { id: DocumentId },
    /// Document fetch succeeded
    DocumentLoaded { id: DocumentId, chapters: usize },
    /// Document fetch failed
    LoadFailed { id: DocumentId, message: String },
    /// Document closed
    DocumentClosed,
    /// Active chapter changed; selection and results were reset
    ChapterSelected {
        index: usize,
        epoch: ContextEpoch,
        placeholder: bool,
    },
    /// A paragraph was selected or deselected
    SelectionChanged { index: usize, selected: bool },
    /// Batch dispatched
    BatchStarted { token: BatchToken, paragraphs: usize },
    /// A paragraph translation was stored
    ParagraphTranslated { token: BatchToken, index: usize },
    /// A paragraph translation failed
    ParagraphFailed { token: BatchToken, index: usize },
    /// A result for a previous context was dropped
    StaleResultDropped { token: BatchToken, index: usize },
    /// Every request of the batch resolved
    BatchFinished {
        token: BatchToken,
        translated: usize,
        failed: usize,
        stale: usize,
    },
    /// Languages or style options changed
    SettingsChanged,
}

impl WorkspaceEvent {
    /// Batch the event belongs to, if any
    #[must_use]
    pub fn token(&self) -> Option<BatchToken> {
        match self {
            Self::BatchStarted { token, .. }
            | Self::ParagraphTranslated { token, .. }
            | Self::ParagraphFailed { token, .. }
            | Self::StaleResultDropped { token, .. }
            | Self::BatchFinished { token, .. } => Some(*token),
            _ => None,
        }
    }
}
