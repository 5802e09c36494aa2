//! Folio Client - HTTP backend for the translation workspace
//!
//! Provides:
//! - [`ApiClient`], the `reqwest` implementation of
//!   [`folio_core::TranslationService`]
//! - Document listing, deletion, translation history and rating
//! - Validated, progress-reporting document uploads
//!
//! # Example
//!
//! ```rust,ignore
//! use folio_client::{ApiClient, ClientConfig};
//! use folio_core::{DocumentId, Workspace, WorkspaceConfig};
//! use std::sync::Arc;
//!
//! let client = Arc::new(ApiClient::new(ClientConfig::new().with_env_overrides())?);
//! let workspace = Workspace::new(client, WorkspaceConfig::new());
//! workspace.load(DocumentId::new(42)?).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod upload;

pub use api::ApiClient;
pub use config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use models::{error_detail, format_file_size, DocumentSummary, TranslationRecord};
pub use upload::{
    content_type_for, UploadCandidate, UploadError, UploadPolicy, UploadProgress, UploadState,
    UploadTracker,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
