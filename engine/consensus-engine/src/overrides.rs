//! Per-prospect histogram replacements.
//!
//! A small lookup table of data-quality workarounds: a listed prospect gets a
//! single synthetic bin instead of the tallied distribution. Kept out of the
//! histogram builder so entries can be tested and removed individually.

use std::collections::HashMap;

use crate::config::OverrideEntry;
use crate::models::{Histogram, HistogramBin, HistogramSource};

#[derive(Debug, Clone, Default)]
pub struct HistogramOverrides {
    unanimous_picks: HashMap<String, u32>,
}

impl HistogramOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[OverrideEntry]) -> Self {
        let mut overrides = Self::new();
        for entry in entries {
            overrides.insert(entry.name.clone(), entry.pick);
        }
        overrides
    }

    pub fn insert(&mut self, name: impl Into<String>, pick: u32) {
        self.unanimous_picks.insert(name.into(), pick);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.unanimous_picks.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.unanimous_picks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.unanimous_picks.is_empty()
    }

    /// Replacement histogram: one bin at the listed pick holding every contributor
    pub fn lookup(&self, name: &str, contributor_count: usize) -> Option<Histogram> {
        let pick = *self.unanimous_picks.get(name)?;
        let count = contributor_count as u32;
        Some(Histogram {
            bins: vec![HistogramBin { pick: pick as i32, count, percentage: 100.0 }],
            total_valid: count,
            source: HistogramSource::Override,
        })
    }
}
