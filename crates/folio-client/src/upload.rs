//! Document upload
//!
//! - [`UploadPolicy`]: accepted content types and size limit
//! - [`UploadCandidate`]: a file about to be sent
//! - [`UploadTracker`]: observable upload state, shared over a
//!   `tokio::sync::watch` channel
//!
//! Candidates are validated before any byte leaves the machine. The body is
//! streamed in chunks and the tracker advances as each chunk is handed to
//! the connection.

use crate::models::DocumentSummary;
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

/// PDF documents
pub const MIME_PDF: &str = "application/pdf";
/// Word documents
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// Plain text
pub const MIME_TEXT: &str = "text/plain";
/// Fallback for unknown extensions
pub const MIME_UNKNOWN: &str = "application/octet-stream";

/// Default size limit: 10 MiB
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;

const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Content type for a filename, from its extension
#[must_use]
pub fn content_type_for(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some(MIME_PDF),
        "docx" => Some(MIME_DOCX),
        "txt" => Some(MIME_TEXT),
        _ => None,
    }
}

/// Upload rejected or failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Nothing to send
    #[error("no file selected")]
    NoFile,

    /// Content type not in the policy
    #[error("unsupported file type: {content_type}")]
    UnsupportedType {
        /// Declared or inferred type
        content_type: String,
    },

    /// File larger than the policy allows
    #[error("file is {size} bytes, limit is {max}")]
    TooLarge {
        /// File size
        size: u64,
        /// Policy limit
        max: u64,
    },

    /// Another upload is running on the same tracker
    #[error("an upload is already in progress")]
    InProgress,

    /// Server refused the file
    #[error("server rejected upload with status {status}: {detail}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or a generic message
        detail: String,
    },

    /// Connection failed mid-transfer
    #[error("upload transport failure: {0}")]
    Transport(String),
}

impl UploadError {
    /// Message for the person uploading
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::NoFile => "Please select a file.".to_string(),
            Self::UnsupportedType { .. } => {
                "Unsupported file type. Please use PDF, DOCX or TXT.".to_string()
            }
            Self::TooLarge { max, .. } => format!(
                "File is too large. Maximum size is {}.",
                crate::models::format_file_size(*max)
            ),
            Self::InProgress => "An upload is already in progress.".to_string(),
            Self::Rejected { detail, .. } => detail.clone(),
            Self::Transport(_) => "Error uploading file. Please try again.".to_string(),
        }
    }
}

/// Accepted content types and size limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    /// Accepted content types
    pub allowed_types: Vec<String>,
    /// Largest accepted file in bytes
    pub max_bytes: u64,
    /// Bytes per streamed body chunk
    pub chunk_size: usize,
}

impl UploadPolicy {
    /// Whether `content_type` is accepted
    #[must_use]
    pub fn allows(&self, content_type: &str) -> bool {
        self.allowed_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(content_type))
    }

    /// Check a candidate: presence first, then type, then size
    ///
    /// # Errors
    /// The first rule the candidate breaks
    pub fn validate(&self, candidate: Option<&UploadCandidate>) -> Result<(), UploadError> {
        let candidate = match candidate {
            Some(candidate) if !candidate.is_empty() => candidate,
            _ => return Err(UploadError::NoFile),
        };
        if !self.allows(&candidate.content_type) {
            return Err(UploadError::UnsupportedType {
                content_type: candidate.content_type.clone(),
            });
        }
        if candidate.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: candidate.len(),
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_types: vec![MIME_PDF.to_string(), MIME_DOCX.to_string(), MIME_TEXT.to_string()],
            max_bytes: DEFAULT_MAX_BYTES,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// A file ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    /// Name sent to the server
    pub filename: String,
    /// Declared content type
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadCandidate {
    /// Create a candidate, inferring the content type from the extension
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = content_type_for(&filename).unwrap_or(MIME_UNKNOWN).to_string();
        Self {
            filename,
            content_type,
            bytes,
        }
    }

    /// With explicit content type
    #[inline]
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read a file from disk
    ///
    /// # Errors
    /// I/O errors from reading the file
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(filename, bytes))
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// No content
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Bytes handed to the connection so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadProgress {
    /// Bytes sent
    pub loaded: u64,
    /// Bytes in the file
    pub total: u64,
}

impl UploadProgress {
    /// Fraction sent, in `0.0..=1.0`; an empty total counts as done
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.loaded as f64 / self.total as f64;
        ratio.clamp(0.0, 1.0)
    }

    /// Rounded percentage, `0..=100`
    #[must_use]
    pub fn percent(&self) -> u8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let percent = (self.ratio() * 100.0).round() as u8;
        percent
    }
}

/// Observable upload state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadState {
    /// No upload yet, or the last outcome was dismissed
    #[default]
    Idle,
    /// Checking the candidate against the policy
    Validating,
    /// Transfer running
    Uploading(UploadProgress),
    /// Server accepted the document
    Succeeded(DocumentSummary),
    /// Validation or transfer failed; holds the display message
    Failed(String),
}

impl UploadState {
    /// Validating or uploading
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Validating | Self::Uploading(_))
    }
}

/// Shared upload state machine
///
/// `Idle -> Validating -> Uploading -> Succeeded | Failed`, and back to
/// `Idle` through [`UploadTracker::dismiss`]. A new upload may start from
/// any state that is not active.
#[derive(Debug, Clone)]
pub struct UploadTracker {
    state: Arc<watch::Sender<UploadState>>,
}

impl UploadTracker {
    /// Create an idle tracker
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(UploadState::Idle);
        Self {
            state: Arc::new(state),
        }
    }

    /// Watch state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Enter `Validating`; false if an upload is already active
    pub fn begin(&self) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_active() {
                return false;
            }
            *state = UploadState::Validating;
            true
        })
    }

    /// Record transfer progress; ignored unless validating or uploading
    pub fn progress(&self, progress: UploadProgress) {
        self.state.send_if_modified(|state| {
            if !state.is_active() {
                return false;
            }
            *state = UploadState::Uploading(progress);
            true
        });
    }

    /// Record success
    pub fn succeed(&self, summary: DocumentSummary) {
        self.state.send_replace(UploadState::Succeeded(summary));
    }

    /// Record failure with a display message
    pub fn fail(&self, message: impl Into<String>) {
        self.state.send_replace(UploadState::Failed(message.into()));
    }

    /// Clear a finished outcome; false while an upload is active
    pub fn dismiss(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            UploadState::Succeeded(_) | UploadState::Failed(_) => {
                *state = UploadState::Idle;
                true
            }
            _ => false,
        })
    }
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `bytes` into body chunks, reporting progress as each is pulled
pub(crate) fn progress_stream(
    bytes: Vec<u8>,
    chunk_size: usize,
    tracker: UploadTracker,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + Sync + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(chunk_size.max(1)).map(<[u8]>::to_vec).collect();

    tracker.progress(UploadProgress { loaded: 0, total });
    let mut loaded = 0u64;
    stream::iter(chunks).map(move |chunk| {
        loaded += chunk.len() as u64;
        tracker.progress(UploadProgress { loaded, total });
        Ok(chunk)
    })
}
