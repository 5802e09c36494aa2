//! Folio Core - Selective Paragraph Translation Workspace
//!
//! The stateful heart of the Folio client:
//! - Loads a document (chapters of paragraphs) from the remote service
//! - Tracks which paragraphs of the active chapter are selected
//! - Translates the selection one paragraph per request, tolerating failures
//! - Resets selection and results on every chapter switch
//! - Projects everything into a render-ready view
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_core::{DocumentId, Workspace, WorkspaceConfig};
//! use std::sync::Arc;
//!
//! # async fn example(service: Arc<impl folio_core::TranslationService>) -> Result<(), Box<dyn std::error::Error>> {
//! let workspace = Workspace::new(service, WorkspaceConfig::new());
//! workspace.load(DocumentId::new(42)?).await?;
//!
//! workspace.select_chapter(0);
//! workspace.toggle_paragraph(0)?;
//! if let Some(report) = workspace.translate_selected().await {
//!     println!("translated {} of {}", report.translated.len(), report.requested.len());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod events;
pub mod language;
pub mod loader;
pub mod navigator;
pub mod orchestrator;
pub mod selection;
pub mod service;
pub mod view;
pub mod workspace;

// Re-exports for convenience
pub use config::{SessionSettings, WorkspaceConfig};
pub use context::{ChapterContext, Reconciled, TranslationMap};
pub use document::{Chapter, Document, DocumentId, DocumentMetadata, PLACEHOLDER_TITLE};
pub use error::{ServiceError, WorkspaceError};
pub use events::WorkspaceEvent;
pub use language::{language_name, Formality, LanguageCode, LanguagePair, SUPPORTED_LANGUAGES};
pub use loader::{load_document, LoadState};
pub use navigator::{BatchToken, ChapterNavigator, ChapterTarget, ContextEpoch};
pub use orchestrator::{FanOutSummary, ParagraphJob, ParagraphOutcome, TranslationOrchestrator};
pub use selection::Selection;
pub use service::{TranslationRequest, TranslationResponse, TranslationService};
pub use view::{project_chapter, ChapterView, DocumentView, ParagraphView, WorkspaceView};
pub use workspace::{BatchReport, Workspace};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Folio Core
    pub use crate::{
        DocumentId, LanguagePair, SessionSettings, TranslationService, Workspace,
        WorkspaceConfig, WorkspaceEvent, WorkspaceView,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
