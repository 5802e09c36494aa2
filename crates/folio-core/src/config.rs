//! Session settings and workspace configuration

use crate::error::WorkspaceError;
use crate::language::{Formality, LanguageCode, LanguagePair};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-session translation settings
///
/// Owned by the workspace and changed independently of document and chapter
/// state; changing them never clears selections or results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Source and target language
    pub languages: LanguagePair,
    /// Requested register
    pub formality: Formality,
    /// Free-form style hint (academic, literary, ...); none means general
    pub style: Option<String>,
}

impl SessionSettings {
    /// Create default settings (`en -> pt`, neutral)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With language pair
    #[inline]
    #[must_use]
    pub fn with_languages(mut self, languages: LanguagePair) -> Self {
        self.languages = languages;
        self
    }

    /// With source language
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: LanguageCode) -> Self {
        self.languages.source = source;
        self
    }

    /// With target language
    #[inline]
    #[must_use]
    pub fn with_target(mut self, target: LanguageCode) -> Self {
        self.languages.target = target;
        self
    }

    /// With formality
    #[inline]
    #[must_use]
    pub fn with_formality(mut self, formality: Formality) -> Self {
        self.formality = formality;
        self
    }

    /// With style hint; blank styles are dropped
    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        let style = style.into();
        self.style = (!style.trim().is_empty()).then_some(style);
        self
    }
}

/// Workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Initial session settings
    pub settings: SessionSettings,
    /// Upper bound on translation requests in flight per batch
    pub max_concurrent_translations: usize,
    /// Buffered workspace events per subscriber
    pub event_capacity: usize,
}

impl WorkspaceConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With initial settings
    #[inline]
    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// With max concurrent translations (at least one)
    #[inline]
    #[must_use]
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent_translations = max.max(1);
        self
    }

    /// With event buffer capacity (at least one)
    #[inline]
    #[must_use]
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// `WorkspaceError::Config` on malformed TOML or invalid values
    pub fn from_toml_str(text: &str) -> Result<Self, WorkspaceError> {
        let config: Self = toml::from_str(text).map_err(|e| WorkspaceError::Config(e.to_string()))?;
        config.validated()
    }

    /// Read from a TOML file
    ///
    /// # Errors
    /// `WorkspaceError::Config` if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorkspaceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| WorkspaceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check values
    ///
    /// # Errors
    /// `WorkspaceError::Config` for a zero concurrency limit or event capacity
    pub fn validated(self) -> Result<Self, WorkspaceError> {
        if self.max_concurrent_translations == 0 {
            return Err(WorkspaceError::Config(
                "max_concurrent_translations must be at least 1".to_string(),
            ));
        }
        if self.event_capacity == 0 {
            return Err(WorkspaceError::Config("event_capacity must be at least 1".to_string()));
        }
        Ok(self)
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            settings: SessionSettings::default(),
            max_concurrent_translations: 4,
            event_capacity: 256,
        }
    }
}
