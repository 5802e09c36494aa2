//! Remote service seam
//!
//! The workspace talks to the document/translation service only through
//! [`TranslationService`]. The HTTP implementation lives in `folio-client`;
//! tests plug in scripted or mocked services.

use crate::config::SessionSettings;
use crate::document::{Document, DocumentId};
use crate::error::ServiceError;
use crate::language::{Formality, LanguageCode, LanguagePair};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Body of a quick translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Text to translate
    pub text: String,
    /// Language of `text`
    pub source_language: LanguageCode,
    /// Language to produce
    pub target_language: LanguageCode,
    /// Requested register
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formality_level: Option<Formality>,
    /// Style hint (the HTTP client also sends it as `tone`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl TranslationRequest {
    /// Create a request with no style options
    #[must_use]
    pub fn new(text: impl Into<String>, languages: &LanguagePair) -> Self {
        Self {
            text: text.into(),
            source_language: languages.source.clone(),
            target_language: languages.target.clone(),
            formality_level: None,
            style: None,
        }
    }

    /// Create a request carrying the session's languages and style options
    #[must_use]
    pub fn from_settings(text: impl Into<String>, settings: &SessionSettings) -> Self {
        Self::new(text, &settings.languages)
            .with_formality(settings.formality)
            .with_style(settings.style.clone())
    }

    /// With formality
    #[inline]
    #[must_use]
    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality_level = Some(formality);
        self
    }

    /// With optional style hint
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: Option<String>) -> Self {
        self.style = style;
        self
    }
}

/// Result of a translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    /// Translated text
    pub translated_text: String,
    /// Source language echoed by the service
    #[serde(default)]
    pub source_language: Option<String>,
    /// Target language echoed by the service
    #[serde(default)]
    pub target_language: Option<String>,
}

impl TranslationResponse {
    /// Create a response holding only the translated text
    #[must_use]
    pub fn new(translated_text: impl Into<String>) -> Self {
        Self {
            translated_text: translated_text.into(),
            source_language: None,
            target_language: None,
        }
    }
}

/// Remote document and translation service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Fetch a document by id
    async fn fetch_document(&self, id: DocumentId) -> Result<Document, ServiceError>;

    /// Translate a single piece of text
    async fn translate(
        &self,
        request: TranslationRequest,
    ) -> Result<TranslationResponse, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_from_settings() {
        let settings = SessionSettings::new()
            .with_formality(Formality::Formal)
            .with_style("legal");
        let request = TranslationRequest::from_settings("Hello", &settings);

        assert_eq!(request.source_language.as_str(), "en");
        assert_eq!(request.target_language.as_str(), "pt");
        assert_eq!(request.formality_level, Some(Formality::Formal));
        assert_eq!(request.style.as_deref(), Some("legal"));
    }

    #[test]
    fn request_wire_shape_omits_absent_options() {
        let request = TranslationRequest::new("Hi", &LanguagePair::default());
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"text": "Hi", "source_language": "en", "target_language": "pt"})
        );
    }

    #[test]
    fn response_accepts_minimal_body() {
        let response: TranslationResponse =
            serde_json::from_str(r#"{"translated_text": "Olá"}"#).unwrap();
        assert_eq!(response, TranslationResponse::new("Olá"));
    }
}
