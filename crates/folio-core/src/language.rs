//! Language codes, language pairs and translation style options

use crate::error::WorkspaceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered by the translation service, with display names
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("pt", "Portuguese"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("nl", "Dutch"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese"),
];

/// Display name of a supported language
#[must_use]
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(_, name)| *name)
}

/// Short ISO-like language code such as `en`, `pt` or `pt-BR`
///
/// Normalised on construction: primary subtag lower-case, region upper-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and normalise a language code
    ///
    /// # Errors
    /// `WorkspaceError::InvalidLanguage` unless the code is 2-3 ASCII letters,
    /// optionally followed by `-` or `_` and a 2-4 character region
    pub fn new(code: &str) -> Result<Self, WorkspaceError> {
        let invalid = || WorkspaceError::InvalidLanguage(code.to_string());
        let trimmed = code.trim();
        let mut parts = trimmed.splitn(2, ['-', '_']);

        let primary = parts.next().unwrap_or_default();
        if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }

        let mut normalised = primary.to_ascii_lowercase();
        if let Some(region) = parts.next() {
            if !(2..=4).contains(&region.len()) || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(invalid());
            }
            normalised.push('-');
            normalised.push_str(&region.to_ascii_uppercase());
        }

        Ok(Self(normalised))
    }

    /// The normalised code
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name when the code is in the supported catalogue
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        language_name(&self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = WorkspaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

/// Source and target language of a translation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Language of the document text
    pub source: LanguageCode,
    /// Language to translate into
    pub target: LanguageCode,
}

impl LanguagePair {
    /// Create a language pair
    #[inline]
    #[must_use]
    pub fn new(source: LanguageCode, target: LanguageCode) -> Self {
        Self { source, target }
    }

    /// Parse both codes
    ///
    /// # Errors
    /// `WorkspaceError::InvalidLanguage` for the first invalid code
    pub fn parse(source: &str, target: &str) -> Result<Self, WorkspaceError> {
        Ok(Self::new(LanguageCode::new(source)?, LanguageCode::new(target)?))
    }

    /// Exchange source and target
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl Default for LanguagePair {
    fn default() -> Self {
        Self {
            source: LanguageCode("en".to_string()),
            target: LanguageCode("pt".to_string()),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Register of the translated text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formality {
    /// Formal register
    Formal,
    /// Informal register
    Informal,
    /// No preference
    #[default]
    Neutral,
}

impl Formality {
    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Informal => "informal",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Formality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formality {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "formal" => Ok(Self::Formal),
            "informal" => Ok(Self::Informal),
            "neutral" => Ok(Self::Neutral),
            _ => Err(WorkspaceError::InvalidFormality(s.to_string())),
        }
    }
}
