//! HTTP implementation of the translation service
//!
//! Endpoints (all under `{base_url}/api`):
//! - `GET /documents/{id}` - full document with chapters
//! - `GET /documents`, `DELETE /documents/{id}`, `POST /documents/upload`
//! - `POST /translations/quick` - translate one text without storing it
//! - `GET /translations`, `PUT /translations/{id}` - history and rating

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::models::{
    error_detail, DocumentSummary, QuickTranslationBody, RatingUpdate, TranslationRecord,
};
use crate::upload::{progress_stream, UploadCandidate, UploadError, UploadPolicy, UploadTracker};
use async_trait::async_trait;
use folio_core::{
    Document, DocumentId, ServiceError, TranslationRequest, TranslationResponse,
    TranslationService,
};
use reqwest::multipart;
use serde::de::DeserializeOwned;

/// Client for the document and translation backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    upload_policy: UploadPolicy,
}

impl ApiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    /// `ClientError::Config` for invalid configuration, `ClientError::Http`
    /// if the underlying client cannot be built
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let config = config.validated()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(base_url = %config.base_url, "api client ready");
        Ok(Self {
            http,
            base_url: config.base_url,
            upload_policy: config.upload,
        })
    }

    /// Backend root
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload limits applied before sending
    #[inline]
    #[must_use]
    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// Fetch a full document
    ///
    /// # Errors
    /// Transport, status or decode failures
    pub async fn get_document(&self, id: DocumentId) -> Result<Document, ClientError> {
        let response = self.http.get(self.url(&format!("/documents/{id}"))).send().await?;
        decode(response).await
    }

    /// Translate one text without storing it
    ///
    /// # Errors
    /// Transport, status or decode failures
    pub async fn quick_translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResponse, ClientError> {
        let response = self
            .http
            .post(self.url("/translations/quick"))
            .json(&QuickTranslationBody::from(request))
            .send()
            .await?;
        decode(response).await
    }

    /// All uploaded documents, newest first
    ///
    /// # Errors
    /// Transport, status or decode failures
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>, ClientError> {
        let response = self.http.get(self.url("/documents")).send().await?;
        decode(response).await
    }

    /// Delete a document
    ///
    /// # Errors
    /// Transport or status failures
    pub async fn delete_document(&self, id: DocumentId) -> Result<(), ClientError> {
        let response = self.http.delete(self.url(&format!("/documents/{id}"))).send().await?;
        expect_success(response).await?;
        tracing::info!(document = %id, "document deleted");
        Ok(())
    }

    /// Stored translations, newest first
    ///
    /// # Errors
    /// Transport, status or decode failures
    pub async fn translations_history(&self) -> Result<Vec<TranslationRecord>, ClientError> {
        let response = self.http.get(self.url("/translations")).send().await?;
        decode(response).await
    }

    /// Rate a stored translation from 1 to 5
    ///
    /// # Errors
    /// `ClientError::InvalidRating` outside 1..=5 (nothing is sent), otherwise
    /// transport or status failures
    pub async fn rate_translation(&self, id: u64, rating: u8) -> Result<(), ClientError> {
        if !(1..=5).contains(&rating) {
            return Err(ClientError::InvalidRating(rating));
        }
        let response = self
            .http
            .put(self.url(&format!("/translations/{id}")))
            .json(&RatingUpdate { quality_rating: rating })
            .send()
            .await?;
        expect_success(response).await?;
        tracing::info!(translation = id, rating, "translation rated");
        Ok(())
    }

    /// Validate and upload a document, reporting through `tracker`
    ///
    /// The tracker ends in `Succeeded` or `Failed` unless another upload was
    /// already active on it.
    ///
    /// # Errors
    /// Validation failures before any transfer, then transport or server
    /// rejections
    pub async fn upload(
        &self,
        candidate: Option<UploadCandidate>,
        tracker: &UploadTracker,
    ) -> Result<DocumentSummary, UploadError> {
        if !tracker.begin() {
            return Err(UploadError::InProgress);
        }

        let result = self.send_upload(candidate, tracker).await;
        match &result {
            Ok(summary) => {
                tracing::info!(document = %summary.id, filename = %summary.filename, "document uploaded");
                tracker.succeed(summary.clone());
            }
            Err(error) => {
                tracing::warn!(%error, "upload failed");
                tracker.fail(error.message());
            }
        }
        result
    }

    async fn send_upload(
        &self,
        candidate: Option<UploadCandidate>,
        tracker: &UploadTracker,
    ) -> Result<DocumentSummary, UploadError> {
        self.upload_policy.validate(candidate.as_ref())?;
        let Some(candidate) = candidate else {
            return Err(UploadError::NoFile);
        };

        let total = candidate.len();
        tracing::info!(filename = %candidate.filename, bytes = total, "uploading document");

        let body = reqwest::Body::wrap_stream(progress_stream(
            candidate.bytes,
            self.upload_policy.chunk_size,
            tracker.clone(),
        ));
        let part = multipart::Part::stream_with_length(body, total)
            .file_name(candidate.filename)
            .mime_str(&candidate.content_type)
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/documents/upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        decode(response).await.map_err(|error| match error {
            ClientError::Status { status, detail } => UploadError::Rejected { status, detail },
            other => UploadError::Transport(other.to_string()),
        })
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            detail: error_detail(status.as_u16(), &body),
        })
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let body = read_body(response).await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn expect_success(response: reqwest::Response) -> Result<(), ClientError> {
    read_body(response).await.map(drop)
}

#[async_trait]
impl TranslationService for ApiClient {
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, ServiceError> {
        self.get_document(id).await.map_err(ServiceError::from)
    }

    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, ServiceError> {
        self.quick_translate(&request).await.map_err(ServiceError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ClientConfig::new().with_base_url("http://backend:8000/")).unwrap()
    }

    #[test]
    fn urls_join_under_api() {
        let client = client();
        assert_eq!(client.base_url(), "http://backend:8000");
        assert_eq!(client.url("/documents/7"), "http://backend:8000/api/documents/7");
        assert_eq!(client.url("/translations/quick"), "http://backend:8000/api/translations/quick");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = ApiClient::new(ClientConfig::new().with_base_url("localhost:8000"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[tokio::test]
    async fn rating_is_checked_before_sending() {
        let client = client();
        assert!(matches!(client.rate_translation(1, 0).await, Err(ClientError::InvalidRating(0))));
        assert!(matches!(client.rate_translation(1, 6).await, Err(ClientError::InvalidRating(6))));
    }

    #[tokio::test]
    async fn invalid_upload_never_reaches_the_network() {
        let client = client();
        let tracker = UploadTracker::new();

        let result = client
            .upload(Some(UploadCandidate::new("photo.png", vec![1, 2, 3])), &tracker)
            .await;
        assert!(matches!(result, Err(UploadError::UnsupportedType { .. })));
        assert_eq!(
            tracker.state(),
            crate::UploadState::Failed("Unsupported file type. Please use PDF, DOCX or TXT.".into())
        );

        assert_eq!(client.upload(None, &tracker).await, Err(UploadError::NoFile));
        assert!(tracker.dismiss());
    }

    #[tokio::test]
    async fn busy_tracker_refuses_second_upload() {
        let client = client();
        let tracker = UploadTracker::new();
        tracker.begin();

        let result = client.upload(Some(UploadCandidate::new("a.txt", vec![1])), &tracker).await;
        assert_eq!(result, Err(UploadError::InProgress));
        assert_eq!(tracker.state(), crate::UploadState::Validating);
    }
}
