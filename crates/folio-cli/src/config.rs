//! Configuration file handling
//!
//! `folio.toml` holds a `[client]` table (backend address, timeout, upload
//! limits) and a `[workspace]` table (session defaults, concurrency).
//! Precedence, lowest first: defaults, file, `FOLIO_API_URL`, `--api-url`.

use anyhow::{Context, Result};
use folio_client::ClientConfig;
use folio_core::WorkspaceConfig;
use serde::Deserialize;
use std::path::Path;

/// File looked up in the working directory when `--config` is absent
pub(crate) const DEFAULT_CONFIG_FILE: &str = "folio.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    pub(crate) client: ClientConfig,
    pub(crate) workspace: WorkspaceConfig,
}

impl FileConfig {
    pub(crate) fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid configuration")?;
        config.validated()
    }

    /// Read `explicit`, or `folio.toml` if it exists, or fall back to defaults
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config = Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Apply `FOLIO_API_URL`, then the `--api-url` flag
    pub(crate) fn with_overrides(mut self, api_url: Option<&str>) -> Result<Self> {
        self.client = self.client.with_env_overrides();
        if let Some(url) = api_url {
            self.client = self.client.with_base_url(url);
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self> {
        self.client = self.client.validated()?;
        self.workspace = self.workspace.validated()?;
        Ok(self)
    }
}
