//! Configuration for external collaborators.

use crate::{CollaboratorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding [`CollaboratorConfig::analysis_url`].
pub const ANALYSIS_URL_ENV: &str = "DISPATCH_ANALYSIS_URL";
/// Environment variable overriding [`CollaboratorConfig::analysis_timeout_ms`].
pub const ANALYSIS_TIMEOUT_ENV: &str = "DISPATCH_ANALYSIS_TIMEOUT_MS";
/// Environment variable overriding [`CollaboratorConfig::pantry_path`].
pub const PANTRY_PATH_ENV: &str = "DISPATCH_PANTRY_PATH";

const DEFAULT_ANALYSIS_URL: &str = "http://localhost:3000/api/analyze-health-report";
const DEFAULT_ANALYSIS_TIMEOUT_MS: u64 = 15_000;

/// Settings shared by the built-in handlers.
///
/// Loadable from a TOML file:
///
/// ```toml
/// analysis_url = "https://analysis.internal/api/analyze-health-report"
/// analysis_timeout_ms = 10000
/// pantry_path = "/var/lib/kitchen/pantry.json"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollaboratorConfig {
    /// Endpoint of the health-report analysis service
    pub analysis_url: String,

    /// HTTP timeout for one analysis request, in milliseconds
    pub analysis_timeout_ms: u64,

    /// Pantry table on disk; the embedded sample table is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pantry_path: Option<PathBuf>,
}

impl Default for CollaboratorConfig {
    fn default() -> Self {
        Self {
            analysis_url: DEFAULT_ANALYSIS_URL.to_string(),
            analysis_timeout_ms: DEFAULT_ANALYSIS_TIMEOUT_MS,
            pantry_path: None,
        }
    }
}

impl CollaboratorConfig {
    /// Creates a new builder for `CollaboratorConfig`.
    pub fn builder() -> CollaboratorConfigBuilder {
        CollaboratorConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.analysis_url.starts_with("http://") || self.analysis_url.starts_with("https://"))
        {
            return Err(CollaboratorError::ConfigurationError(format!(
                "analysis_url must be an http(s) URL, got '{}'",
                self.analysis_url
            )));
        }

        if self.analysis_timeout_ms == 0 {
            return Err(CollaboratorError::ConfigurationError(
                "analysis_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self
            .pantry_path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(CollaboratorError::ConfigurationError(
                "pantry_path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// HTTP timeout for one analysis request.
    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }

    /// Parses a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from a variable lookup.
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = var(ANALYSIS_URL_ENV) {
            self.analysis_url = url;
        }

        if let Some(timeout) = var(ANALYSIS_TIMEOUT_ENV) {
            self.analysis_timeout_ms = timeout.trim().parse().map_err(|_| {
                CollaboratorError::ConfigurationError(format!(
                    "{ANALYSIS_TIMEOUT_ENV} must be a number of milliseconds, got '{timeout}'"
                ))
            })?;
        }

        if let Some(path) = var(PANTRY_PATH_ENV) {
            self.pantry_path = Some(PathBuf::from(path));
        }

        Ok(self)
    }

    /// Loads the effective configuration: file (or defaults), then
    /// environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `CollaboratorConfig`.
#[derive(Debug, Clone, Default)]
pub struct CollaboratorConfigBuilder {
    analysis_url: Option<String>,
    analysis_timeout_ms: Option<u64>,
    pantry_path: Option<PathBuf>,
}

impl CollaboratorConfigBuilder {
    /// Sets the analysis service endpoint.
    pub fn analysis_url<S: Into<String>>(mut self, url: S) -> Self {
        self.analysis_url = Some(url.into());
        self
    }

    /// Sets the analysis request timeout in milliseconds.
    pub fn analysis_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.analysis_timeout_ms = Some(timeout_ms);
        self
    }

    /// Reads the pantry table from a file instead of the embedded sample.
    pub fn pantry_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.pantry_path = Some(path.into());
        self
    }

    /// Builds the `CollaboratorConfig`.
    ///
    /// Unset values take defaults; the result is validated.
    pub fn build(self) -> Result<CollaboratorConfig> {
        let defaults = CollaboratorConfig::default();
        let config = CollaboratorConfig {
            analysis_url: self.analysis_url.unwrap_or(defaults.analysis_url),
            analysis_timeout_ms: self
                .analysis_timeout_ms
                .unwrap_or(defaults.analysis_timeout_ms),
            pantry_path: self.pantry_path,
        };

        config.validate()?;
        Ok(config)
    }
}
