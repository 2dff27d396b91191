use std::collections::BTreeMap;

use prospect_registry::coercion::coerce_leading_int;
use prospect_registry::{ConsensusRecord, PickWindow};
use serde::{Deserialize, Serialize};

/// Summary statistics over a prospect's valid contributor picks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusStats {
    pub mean: f64,
    pub median: f64,
    /// Most frequent pick, lowest pick on ties
    pub mode: u32,
    /// Best (lowest-numbered) pick
    pub high: u32,
    /// Worst (highest-numbered) pick
    pub low: u32,
    pub range: u32,
    /// Sample standard deviation, 0 for a single pick
    pub stdev: f64,
    pub count: usize,
    /// `count / contributor_count`, 0..=1
    pub inclusion_rate: f64,
}

impl ConsensusStats {
    /// Recompute statistics from a record's contributor columns.
    ///
    /// Values use the leading-digit policy and must be valid picks in
    /// `window`. Returns `None` when no contributor gave one.
    pub fn from_record<S: AsRef<str>>(
        record: &ConsensusRecord,
        contributors: &[S],
        window: PickWindow,
    ) -> Option<Self> {
        let picks: Vec<u32> = contributors
            .iter()
            .filter_map(|key| record.get(key.as_ref()))
            .filter_map(|cell| coerce_leading_int(cell).as_pick(window))
            .collect();

        Self::from_picks(&picks, contributors.len())
    }

    /// Statistics over already-validated picks
    pub fn from_picks(picks: &[u32], contributor_count: usize) -> Option<Self> {
        if picks.is_empty() {
            return None;
        }

        let mut sorted = picks.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let mean = sorted.iter().map(|&p| p as f64).sum::<f64>() / count as f64;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] as f64 + sorted[count / 2] as f64) / 2.0
        } else {
            sorted[count / 2] as f64
        };

        let mut frequency: BTreeMap<u32, usize> = BTreeMap::new();
        for &pick in &sorted {
            *frequency.entry(pick).or_insert(0) += 1;
        }
        // BTreeMap iterates ascending, so the first maximum is the lowest pick
        let mode = frequency
            .iter()
            .fold((0u32, 0usize), |best, (&pick, &n)| if n > best.1 { (pick, n) } else { best })
            .0;

        let high = sorted[0];
        let low = sorted[count - 1];

        let stdev = if count < 2 {
            0.0
        } else {
            let variance =
                sorted.iter().map(|&p| (p as f64 - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        };

        let inclusion_rate =
            if contributor_count == 0 { 0.0 } else { count as f64 / contributor_count as f64 };

        Some(Self { mean, median, mode, high, low, range: low - high, stdev, count, inclusion_rate })
    }
}
