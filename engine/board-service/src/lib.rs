//! Draft Board Service
//!
//! Loads a year's prospect and consensus CSVs from a directory or an HTTP
//! base URL, keeps per-year session state, and serves ranks, display lists
//! and consensus views from the engine crates.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod session;
pub mod source;

pub use config::{BoardConfig, FileConfig, LoggingConfig, SourceConfig, SourceKind, YearConfig};
pub use error::{BoardError, Result};
pub use fetcher::BoardFetcher;
pub use logging::{initialize_from_config, initialize_logging, initialize_logging_with_config};
pub use session::{BoardSession, LoadOutcome, LoadTicket};
pub use source::{source_from_config, CsvSource, FileCsvSource, HttpCsvSource};
