//! Contributor-column discovery.
//!
//! Contributor columns are whatever a consensus record carries beyond the
//! known metadata and statistic fields. Each draft year has its own roster of
//! contributors, so discovery runs against each record rather than a fixed list.

use std::collections::HashSet;

use crate::types::ConsensusRecord;

/// Field names that are never contributor columns
pub const KNOWN_METADATA_FIELDS: &[&str] = &[
    "Name",
    "Height",
    "Wingspan",
    "Weight",
    "Age",
    "Actual Pick",
    "NBA Team",
    "Pre-NBA",
    "League",
    "Role",
    "Tier",
    "Low GP",
    "SCORE",
    "MEAN",
    "MEDIAN",
    "MODE",
    "HIGH",
    "LOW",
    "RANGE",
    "STDEV",
    "COUNT",
    "Inclusion Rate",
    "1-3",
    "4-14",
    "15-30",
    "31-59",
    "2nd Round",
    "Undrafted",
    "Summary",
];

/// Denylist-based contributor key discovery
#[derive(Debug, Clone)]
pub struct ContributorDiscovery {
    known: HashSet<String>,
}

impl ContributorDiscovery {
    /// Discovery using [`KNOWN_METADATA_FIELDS`]
    pub fn new() -> Self {
        Self { known: KNOWN_METADATA_FIELDS.iter().map(|f| f.to_string()).collect() }
    }

    /// Discovery with additional non-contributor fields
    pub fn with_extra_fields<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut discovery = Self::new();
        discovery.known.extend(extra.into_iter().map(Into::into));
        discovery
    }

    pub fn is_metadata(&self, key: &str) -> bool {
        key.trim().is_empty() || self.known.contains(key)
    }

    /// Contributor keys of one record, in header order
    pub fn contributor_keys(&self, record: &ConsensusRecord) -> Vec<String> {
        record.keys().filter(|key| !self.is_metadata(key)).map(str::to_string).collect()
    }

    /// Union of contributor keys across records, in first-seen order
    pub fn contributors_across<'a, I>(&self, records: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a ConsensusRecord>,
    {
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for record in records {
            for key in record.keys() {
                if !self.is_metadata(key) && seen.insert(key.to_string()) {
                    keys.push(key.to_string());
                }
            }
        }
        keys
    }
}

impl Default for ContributorDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
