use prospect_registry::PickWindow;
use serde::{Deserialize, Serialize};

/// Configuration for the Consensus Engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    /// Pick windows
    pub histogram: HistogramConfig,

    /// Chart y-axis ladder
    pub y_axis: YAxisConfig,

    /// Per-prospect histogram replacements
    pub overrides: Vec<OverrideEntry>,

    /// Contributor discovery tweaks
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Upper bound of the histogram x-axis window
    pub max_pick: u32,

    /// Upper bound of the window used for statistics and sparse detection
    pub stats_max_pick: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YAxisConfig {
    /// Ladder step and tick spacing (percent)
    pub step: u32,

    /// Highest ladder value (percent)
    pub cap: u32,

    /// Axis max when the histogram has no positive bin
    pub empty_max: u32,
}

/// A prospect whose histogram is replaced by a single unanimous bin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub name: String,
    pub pick: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Columns to treat as metadata on top of the built-in list
    pub extra_metadata_fields: Vec<String>,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { max_pick: PickWindow::HISTOGRAM.max, stats_max_pick: PickWindow::STATS.max }
    }
}

impl Default for YAxisConfig {
    fn default() -> Self {
        Self { step: 5, cap: 100, empty_max: 10 }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            histogram: HistogramConfig::default(),
            y_axis: YAxisConfig::default(),
            // Unanimous #1 whose sheet row carries stray contributor text
            overrides: vec![OverrideEntry { name: "Cooper Flagg".to_string(), pick: 1 }],
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl ConsensusConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(max_pick) = std::env::var("CONSENSUS_HISTOGRAM_MAX_PICK") {
            config.histogram.max_pick = max_pick.parse().unwrap_or(PickWindow::HISTOGRAM.max);
        }

        if let Ok(max_pick) = std::env::var("CONSENSUS_STATS_MAX_PICK") {
            config.histogram.stats_max_pick = max_pick.parse().unwrap_or(PickWindow::STATS.max);
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ConsensusConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn histogram_window(&self) -> PickWindow {
        PickWindow::new(self.histogram.max_pick)
    }

    pub fn stats_window(&self) -> PickWindow {
        PickWindow::new(self.histogram.stats_max_pick)
    }
}
