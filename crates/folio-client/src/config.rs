//! HTTP client configuration

use crate::error::ClientError;
use crate::upload::UploadPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding [`ClientConfig::base_url`]
pub const API_URL_ENV: &str = "FOLIO_API_URL";

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the document/translation backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, without the `/api` prefix
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Upload limits
    pub upload: UploadPolicy,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With backend root; a trailing slash is dropped
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With upload policy
    #[inline]
    #[must_use]
    pub fn with_upload(mut self, upload: UploadPolicy) -> Self {
        self.upload = upload;
        self
    }

    /// Apply `FOLIO_API_URL` when set and non-empty
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => self.with_base_url(url.trim()),
            _ => self,
        }
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `ClientError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(text: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validated()
    }

    /// Read from a TOML file
    ///
    /// # Errors
    /// `ClientError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check values and normalise the base URL
    ///
    /// # Errors
    /// `ClientError::Config` for a non-HTTP base URL, a zero timeout or an
    /// empty upload policy
    pub fn validated(self) -> Result<Self, ClientError> {
        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got '{base_url}'"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be at least 1".to_string()));
        }
        if self.upload.allowed_types.is_empty() {
            return Err(ClientError::Config("upload.allowed_types must not be empty".to_string()));
        }
        if self.upload.chunk_size == 0 {
            return Err(ClientError::Config("upload.chunk_size must be at least 1".to_string()));
        }
        let base_url = base_url.to_string();
        Ok(self.with_base_url(base_url))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            upload: UploadPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::MIME_PDF;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::new();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.upload.max_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = ClientConfig::new().with_base_url("https://folio.example/");
        assert_eq!(config.base_url, "https://folio.example");
    }

    #[test]
    fn parse_toml_with_upload_overrides() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "http://10.0.0.5:9000/"
            timeout_secs = 5

            [upload]
            max_bytes = 1024
            allowed_types = ["application/pdf"]
            "#,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.upload.max_bytes, 1024);
        assert_eq!(config.upload.allowed_types, vec![MIME_PDF.to_string()]);
        assert_eq!(config.upload.chunk_size, UploadPolicy::default().chunk_size);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_toml_str(r#"base_url = "ftp://nope""#),
            Err(ClientError::Config(_))
        ));
        assert!(ClientConfig::from_toml_str("timeout_secs = 0").is_err());
        assert!(ClientConfig::from_toml_str("[upload]\nallowed_types = []").is_err());
        assert!(ClientConfig::from_toml_str("base_url = [").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "timeout_secs = 12").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        assert!(ClientConfig::load("/nonexistent/folio.toml").is_err());
    }
}
