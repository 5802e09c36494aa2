//! Wire models for document listings and translation history

use chrono::{DateTime, NaiveDateTime};
use folio_core::{DocumentId, TranslationRequest};
use serde::{Deserialize, Deserializer, Serialize};

/// One entry of the document list, also returned by an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document id
    pub id: DocumentId,
    /// Original upload filename
    pub filename: String,
    /// Stored size in bytes
    #[serde(default)]
    pub size: u64,
    /// Number of chapters detected
    #[serde(default)]
    pub num_chapters: usize,
    /// Number of paragraphs across all chapters
    #[serde(default)]
    pub total_paragraphs: usize,
    /// Server-side creation time (UTC)
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

impl DocumentSummary {
    /// Human-readable size
    #[must_use]
    pub fn size_label(&self) -> String {
        format_file_size(self.size)
    }

    /// Creation time as `YYYY-MM-DD HH:MM`, or `-` when unknown
    #[must_use]
    pub fn created_label(&self) -> String {
        self.created_at
            .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    }
}

/// A stored translation from the history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Record id; needed for rating
    #[serde(default)]
    pub id: Option<u64>,
    /// Text before translation
    #[serde(default)]
    pub original_text: Option<String>,
    /// Text after translation
    pub translated_text: String,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Creation time (UTC)
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<NaiveDateTime>,
    /// Quality rating from 1 to 5
    #[serde(default)]
    pub quality_rating: Option<u8>,
}

/// Body of a rating update
#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct RatingUpdate {
    pub(crate) quality_rating: u8,
}

/// Body of a quick translation
///
/// The backend reads the style hint as `tone` and ignores `style`; both are
/// sent so either name works.
#[derive(Debug, Serialize)]
pub(crate) struct QuickTranslationBody<'a> {
    #[serde(flatten)]
    pub(crate) request: &'a TranslationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tone: Option<&'a str>,
}

impl<'a> From<&'a TranslationRequest> for QuickTranslationBody<'a> {
    fn from(request: &'a TranslationRequest) -> Self {
        Self {
            request,
            tone: request.style.as_deref(),
        }
    }
}

/// Error body of the backend: `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Extract a display message from an error response body
///
/// A string `detail` is returned verbatim, any other `detail` as JSON text,
/// a non-JSON body as trimmed text. Empty bodies get a generic message.
#[must_use]
pub fn error_detail(status: u16, body: &str) -> String {
    if let Ok(ErrorBody { detail }) = serde_json::from_str::<ErrorBody>(body) {
        return match detail {
            serde_json::Value::String(text) => text,
            serde_json::Value::Null => generic_error(status),
            other => other.to_string(),
        };
    }
    let body = body.trim();
    if body.is_empty() || body.starts_with('{') {
        generic_error(status)
    } else {
        body.to_string()
    }
}

fn generic_error(status: u16) -> String {
    format!("request failed with status {status}")
}

/// Format a byte count the way the document list shows it
///
/// Base 1024, units `Bytes`, `KB`, `MB`, `GB`, at most two decimals with
/// trailing zeros dropped: `0 Bytes`, `500 Bytes`, `1.5 KB`, `10 MB`.
#[must_use]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    #[allow(clippy::cast_precision_loss)]
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// Accepts RFC 3339 timestamps and the naive ISO form the backend emits
fn timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.naive_utc()));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(Some)
        .map_err(serde::de::Error::custom)
}
