//! Error types for Folio Core
//!
//! Provides error handling for:
//! - Remote service failures (fetch, translate)
//! - Workspace misuse (bad ids, out-of-range paragraphs)
//! - Configuration and language code parsing

/// Failures reported by the remote document/translation service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Network or connection level failure
    #[error("transport failure: {0}")]
    Transport(String),

    /// Service answered with a non-success status
    #[error("service returned status {status}: {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Human-readable detail from the response body
        detail: String,
    },

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// Human-readable detail suitable for display
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Transport(detail)
            | Self::NotFound(detail)
            | Self::Decode(detail)
            | Self::Status { detail, .. } => detail,
        }
    }

    /// Check if the failure may go away on a later attempt
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::NotFound(_) | Self::Decode(_) => false,
        }
    }
}

/// Main workspace error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkspaceError {
    /// Document identifiers are positive integers
    #[error("invalid document id: '{0}'")]
    InvalidDocumentId(String),

    /// Operation needs a loaded document
    #[error("no document loaded")]
    NoDocument,

    /// Paragraph index outside the active chapter
    #[error("paragraph {index} out of range (chapter has {len} paragraphs)")]
    ParagraphOutOfRange {
        /// Requested index
        index: usize,
        /// Paragraph count of the active chapter
        len: usize,
    },

    /// Language code failed validation
    #[error("invalid language code: '{0}'")]
    InvalidLanguage(String),

    /// Unknown formality level
    #[error("invalid formality level: '{0}'")]
    InvalidFormality(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),

    /// Document fetch failed
    #[error("document load failed: {0}")]
    Load(#[from] ServiceError),
}

impl WorkspaceError {
    /// Check if re-invoking the operation could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Load(source) if source.is_retryable())
    }
}
