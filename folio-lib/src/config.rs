use crate::loader::{ProfileSource, PROFILE_PATH};
use crate::ui::{DEFAULT_CLOCK_FORMAT, DEFAULT_SCROLL_THRESHOLD};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Site configuration, usually read from `folio.yaml`.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Profile document location: a file path or an http(s) base URL
    pub profile: String,
    /// Directory that `render` writes the site into
    pub output_dir: String,
    /// Delay between typewriter characters
    pub typewriter_interval_ms: u64,
    /// Delay between clock refreshes
    pub clock_interval_ms: u64,
    /// Scroll offset (pixels) past which the scroll-to-top control shows
    pub scroll_threshold: f64,
    /// chrono `strftime` pattern for the footer clock
    pub clock_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            profile: PROFILE_PATH.to_string(),
            output_dir: "dist".to_string(),
            typewriter_interval_ms: 100,
            clock_interval_ms: 1000,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            clock_format: DEFAULT_CLOCK_FORMAT.to_string(),
        }
    }
}

impl SiteConfig {
    pub fn profile_source(&self) -> ProfileSource {
        ProfileSource::parse(&self.profile)
    }

    pub fn typewriter_interval(&self) -> Duration {
        Duration::from_millis(self.typewriter_interval_ms)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_millis(self.clock_interval_ms)
    }

    /// Check values that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.typewriter_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "typewriter_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.clock_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "clock_interval_ms must be greater than zero".to_string(),
            ));
        }
        if !self.scroll_threshold.is_finite() || self.scroll_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scroll_threshold must be a non-negative number, got {}",
                self.scroll_threshold
            )));
        }
        if StrftimeItems::new(&self.clock_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::Invalid(format!(
                "clock_format '{}' is not a valid strftime pattern",
                self.clock_format
            )));
        }
        Ok(())
    }
}

/// Parse and validate a YAML config file
pub async fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.as_ref().display().to_string(),
            source,
        })?;

    parse_config_string(&content)
}

/// Parse and validate a YAML config string
pub fn parse_config_string(content: &str) -> Result<SiteConfig, ConfigError> {
    // serde_yaml rejects an empty document, treat it as all defaults
    if content.trim().is_empty() {
        return Ok(SiteConfig::default());
    }

    let config: SiteConfig = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}
