//! Consensus Engine
//!
//! Derives per-prospect views from a consensus record: the pick histogram,
//! the sparse/dense rendering decision with its y-axis scale, recomputed
//! consensus statistics and the range-bucket percentages.

pub mod buckets;
pub mod config;
pub mod engine;
pub mod histogram;
pub mod models;
pub mod overrides;
pub mod quality;
pub mod stats;

pub use buckets::{BucketSchema, RangeChart};
pub use config::ConsensusConfig;
pub use engine::ConsensusEngine;
pub use histogram::HistogramBuilder;
pub use models::*;
pub use overrides::HistogramOverrides;
pub use stats::ConsensusStats;
