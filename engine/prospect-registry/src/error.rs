//! Error types for the prospect registry

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while loading or querying prospects
#[derive(Error, Debug)]
pub enum RegistryError {
    /// CSV text could not be split into records
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column the registry cannot work without is absent from the header row
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Lookup by name found nothing
    #[error("Prospect '{0}' not found in registry")]
    ProspectNotFound(String),
}
