//! Board configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use consensus_engine::ConsensusConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_ENV: &str = "DRAFTBOARD_CONFIG";

/// Prefix for environment overrides, e.g. `DRAFTBOARD_SOURCE__LOCATION`
pub const ENV_PREFIX: &str = "DRAFTBOARD";

/// Main board configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Where per-year CSV files come from
    pub source: SourceConfig,

    /// CSV file names inside each year
    pub files: FileConfig,

    /// Selectable draft years
    pub years: YearConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Histogram, y-axis and discovery settings
    pub consensus: ConsensusConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `location` is a base URL
    Http,
    /// `location` is a local directory
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Base URL or directory; year sub-paths are appended
    pub location: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Prospect sheet, one row per prospect
    pub prospects: String,

    /// Separate consensus sheet; when unset the prospect sheet is used for both
    pub consensus: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YearConfig {
    pub available: Vec<u16>,
    pub default: u16,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { kind: SourceKind::Directory, location: "./data".to_string(), timeout_secs: 30 }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self { prospects: "prospects.csv".to_string(), consensus: None }
    }
}

impl Default for YearConfig {
    fn default() -> Self {
        Self { available: vec![2023, 2024, 2025], default: 2025 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl BoardConfig {
    /// Defaults, then the file named by `DRAFTBOARD_CONFIG` if set, then environment
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load(path.as_deref())
    }

    /// Defaults, then an optional TOML file, then `DRAFTBOARD_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        // File layer is optional; struct defaults fill whatever it omits
        if let Some(path) = path {
            tracing::debug!("Loading configuration from file: {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        }

        // Environment overrides the file
        let config: BoardConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("years.available")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.years.available.is_empty() {
            anyhow::bail!("At least one draft year must be available");
        }

        if !self.years.available.contains(&self.years.default) {
            anyhow::bail!(
                "Default year {} is not among available years {:?}",
                self.years.default,
                self.years.available
            );
        }

        if self.files.prospects.trim().is_empty() {
            anyhow::bail!("Prospect file name must not be empty");
        }

        if self.source.location.trim().is_empty() {
            anyhow::bail!("Source location must not be empty");
        }

        Ok(())
    }

    pub fn is_available(&self, year: u16) -> bool {
        self.years.available.contains(&year)
    }
}
