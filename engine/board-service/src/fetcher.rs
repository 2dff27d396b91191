use prospect_registry::ProspectRegistry;
use tracing::{error, info};

use crate::config::{BoardConfig, FileConfig};
use crate::error::{BoardError, Result};
use crate::source::{source_from_config, CsvSource};

/// Loads one year's board from a CSV source
pub struct BoardFetcher {
    source: Box<dyn CsvSource>,
    files: FileConfig,
    available_years: Vec<u16>,
}

impl BoardFetcher {
    pub fn new(source: Box<dyn CsvSource>, files: FileConfig, available_years: Vec<u16>) -> Self {
        Self { source, files, available_years }
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self> {
        if config.years.available.is_empty() {
            return Err(BoardError::config("no draft years configured"));
        }
        let source = source_from_config(&config.source)?;
        Ok(Self::new(source, config.files.clone(), config.years.available.clone()))
    }

    pub fn available_years(&self) -> &[u16] {
        &self.available_years
    }

    /// Fetch and parse the prospect sheet (and consensus sheet, if configured) for `year`
    pub async fn fetch_year(&self, year: u16) -> Result<ProspectRegistry> {
        if !self.available_years.contains(&year) {
            return Err(BoardError::UnknownYear(year));
        }

        info!("Fetching {} board from {}", year, self.source.describe());

        let result = self.fetch_and_parse(year).await;
        if let Err(e) = &result {
            error!("Failed to load {} board: {}", year, e);
        }
        result
    }

    async fn fetch_and_parse(&self, year: u16) -> Result<ProspectRegistry> {
        let prospects_csv = self.source.fetch_text(&format!("{}/{}", year, self.files.prospects)).await?;

        let consensus_csv = match &self.files.consensus {
            Some(file) => Some(self.source.fetch_text(&format!("{}/{}", year, file)).await?),
            None => None,
        };

        let registry = ProspectRegistry::load_from_csv_text(year, &prospects_csv, consensus_csv.as_deref())?;
        info!("Loaded {} prospects for {}", registry.len(), year);
        Ok(registry)
    }
}
