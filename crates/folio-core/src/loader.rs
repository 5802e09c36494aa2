//! Document model loader
//!
//! Fetches a document and tracks the load as one of four mutually exclusive
//! states: nothing requested, loading, ready or failed. Failed loads are not
//! retried; the caller loads again.

use crate::document::{Document, DocumentId};
use crate::error::ServiceError;
use crate::service::TranslationService;
use std::sync::Arc;

/// State of the document slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No document requested
    #[default]
    Empty,
    /// Fetch in flight
    Loading {
        /// Requested document
        id: DocumentId,
    },
    /// Document available
    Ready(Arc<Document>),
    /// Fetch failed
    Failed {
        /// Requested document
        id: DocumentId,
        /// Why it failed
        error: ServiceError,
    },
}

impl LoadState {
    /// Whether a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Whether a document is available
    #[inline]
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Whether the last fetch failed
    #[inline]
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The loaded document, if ready
    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&Arc<Document>> {
        match self {
            Self::Ready(document) => Some(document),
            _ => None,
        }
    }

    /// The load failure, if failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Fetch document `id` from `service`
///
/// # Errors
/// Propagates the service failure unchanged
pub async fn load_document<S>(service: &S, id: DocumentId) -> Result<Document, ServiceError>
where
    S: TranslationService + ?Sized,
{
    tracing::info!(document = %id, "loading document");

    match service.fetch_document(id).await {
        Ok(document) => {
            tracing::info!(
                document = %id,
                chapters = document.chapter_count(),
                paragraphs = document.total_paragraphs(),
                "document loaded"
            );
            Ok(document)
        }
        Err(error) => {
            tracing::warn!(document = %id, %error, "document load failed");
            Err(error)
        }
    }
}
