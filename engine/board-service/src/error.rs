//! Error types for the board service

use prospect_registry::RegistryError;
use thiserror::Error;

/// Result type alias for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors surfaced while loading a year's board
#[derive(Error, Debug)]
pub enum BoardError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Local file errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse or registry build failure
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Year not listed in the configuration
    #[error("Year {0} is not available")]
    UnknownYear(u16),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BoardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
