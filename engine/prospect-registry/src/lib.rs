//! Prospect Registry - Draft prospects and their per-contributor consensus records
//!
//! This crate turns raw CSV text into typed [`Prospect`] rows and open-ended
//! [`ConsensusRecord`] maps, joined by prospect name. It also owns the cell
//! coercion rules shared by the histogram, statistics and sort code.

pub mod coercion;
pub mod contributors;
pub mod csv_table;
pub mod error;
pub mod registry;
pub mod types;

pub use coercion::{Coerced, PickWindow};
pub use contributors::ContributorDiscovery;
pub use csv_table::{parse_csv_text, CsvRow, CsvTable};
pub use error::{RegistryError, Result};
pub use registry::ProspectRegistry;
pub use types::{CellValue, ConsensusRecord, Prospect, Role, Tier};
