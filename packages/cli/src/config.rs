//! Tool configuration loaded from TOML.
//!
//! A default configuration is embedded at compile time. A file named by
//! `--config` or the `PROD_REPORT_CONFIG` environment variable replaces it
//! entirely; tables missing from that file fall back to built-in defaults.

use std::path::{Path, PathBuf};

use prod_report_analytics_models::AccountGroups;
use prod_report_extract::{DEFAULT_HEADER_FRAGMENTS, ExtractOptions};
use prod_report_production_models::DatePolicy;
use serde::Deserialize;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "PROD_REPORT_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// `[extraction]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionConfig {
    /// How record dates are validated.
    #[serde(default)]
    pub date_policy: DatePolicy,
    /// Repeated column-header lines to discard.
    #[serde(default = "default_header_fragments")]
    pub header_fragments: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            date_policy: DatePolicy::default(),
            header_fragments: default_header_fragments(),
        }
    }
}

fn default_header_fragments() -> Vec<String> {
    DEFAULT_HEADER_FRAGMENTS
        .iter()
        .map(|&s| s.to_owned())
        .collect()
}

/// `[recency]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RecencyConfig {
    /// Keep only employees with a record in the last `window_days` days.
    pub window_days: Option<u32>,
}

/// The full tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    /// Extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Recency filter settings.
    #[serde(default)]
    pub recency: RecencyConfig,
    /// Account group name → store substrings.
    #[serde(default)]
    pub account_groups: AccountGroups,
}

impl ReportConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Account group names are lowercased so store terms match them
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not a valid config.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::de::from_str(text)?;
        config.account_groups = std::mem::take(&mut config.account_groups)
            .into_iter()
            .map(|(name, members)| (name.to_lowercase(), members))
            .collect();
        Ok(config)
    }

    /// The configuration compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the embedded file is malformed.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Loads `explicit` if given, else the file named by
    /// [`CONFIG_ENV_VAR`], else the embedded default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the chosen file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_path(Path::new(&path)),
            _ => Self::embedded(),
        }
    }

    /// Extraction options derived from the `[extraction]` table.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::default()
            .with_header_fragments(self.extraction.header_fragments.clone())
            .with_date_policy(self.extraction.date_policy)
    }
}
