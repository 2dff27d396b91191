use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{SourceConfig, SourceKind};
use crate::error::{BoardError, Result};

/// Something that can hand back the text of a CSV file by relative path
#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Fetch `relative_path`, e.g. `2025/prospects.csv`
    async fn fetch_text(&self, relative_path: &str) -> Result<String>;

    /// Human-readable location for log lines
    fn describe(&self) -> String;
}

/// CSV files served over HTTP below a base URL
pub struct HttpCsvSource {
    client: Client,
    base_url: String,
}

impl HttpCsvSource {
    pub fn new(base_url: impl Into<String>, config: &SourceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    fn url_for(&self, relative_path: &str) -> String {
        format!("{}/{}", self.base_url, relative_path.trim_start_matches('/'))
    }
}

#[async_trait]
impl CsvSource for HttpCsvSource {
    async fn fetch_text(&self, relative_path: &str) -> Result<String> {
        let url = self.url_for(relative_path);
        debug!("Fetching CSV from: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(BoardError::Status { url, status: response.status().as_u16() });
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// CSV files in a local directory tree
pub struct FileCsvSource {
    root: PathBuf,
}

impl FileCsvSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CsvSource for FileCsvSource {
    async fn fetch_text(&self, relative_path: &str) -> Result<String> {
        let path = self.root.join(relative_path);
        debug!("Reading CSV from: {:?}", path);
        Ok(tokio::fs::read_to_string(&path).await?)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Build the source named by the configuration
pub fn source_from_config(config: &SourceConfig) -> Result<Box<dyn CsvSource>> {
    match config.kind {
        SourceKind::Http => Ok(Box::new(HttpCsvSource::new(config.location.clone(), config)?)),
        SourceKind::Directory => Ok(Box::new(FileCsvSource::new(&config.location))),
    }
}
