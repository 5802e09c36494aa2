//! Error types for the HTTP backend

use folio_core::ServiceError;

/// HTTP client failures
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connection, timeout or protocol failure
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned status {status}: {detail}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, or a generic message
        detail: String,
    },

    /// Body was not the expected JSON
    #[error("malformed response: {0}")]
    Decode(String),

    /// Local file access failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid client configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Quality ratings run from 1 to 5
    #[error("invalid rating {0}: expected a value from 1 to 5")]
    InvalidRating(u8),
}

impl ClientError {
    /// Check if the request may succeed when sent again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// HTTP status, when the server answered
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status: 404, detail } => Self::NotFound(detail),
            ClientError::Status { status, detail } => Self::Status { status, detail },
            ClientError::Decode(detail) => Self::Decode(detail),
            ClientError::Http(err) if err.is_decode() => Self::Decode(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}
