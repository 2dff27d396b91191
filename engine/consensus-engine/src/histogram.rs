use std::collections::BTreeMap;

use prospect_registry::coercion::coerce_digits_only;
use prospect_registry::{ConsensusRecord, ContributorDiscovery, PickWindow};
use tracing::debug;

use crate::models::{Histogram, HistogramBin, HistogramSource};
use crate::overrides::HistogramOverrides;

/// Builds a prospect's discrete pick distribution from contributor values
#[derive(Debug, Clone)]
pub struct HistogramBuilder {
    window: PickWindow,
    overrides: HistogramOverrides,
    discovery: ContributorDiscovery,
}

impl HistogramBuilder {
    pub fn new(window: PickWindow, overrides: HistogramOverrides, discovery: ContributorDiscovery) -> Self {
        Self { window, overrides, discovery }
    }

    /// Build the histogram for one prospect.
    ///
    /// Values are coerced with the strip-non-digits policy and kept when they
    /// fall inside the histogram window. Bins are dense from the lowest to the
    /// highest accepted pick; a single distinct pick is widened to three bins
    /// so it does not render with zero width.
    pub fn build(&self, name: &str, record: &ConsensusRecord) -> Histogram {
        let contributors = self.discovery.contributor_keys(record);

        // Hard-coded prospects skip the tally entirely
        if let Some(histogram) = self.overrides.lookup(name, contributors.len()) {
            debug!("Using histogram override for {}", name);
            return histogram;
        }

        // Tally valid picks per position
        let mut tally: BTreeMap<u32, u32> = BTreeMap::new();
        let mut total_valid = 0u32;
        for key in &contributors {
            let Some(cell) = record.get(key) else { continue };
            if let Some(pick) = coerce_digits_only(cell).as_pick(self.window) {
                *tally.entry(pick).or_insert(0) += 1;
                total_valid += 1;
            }
        }

        let (Some((&min_pick, _)), Some((&max_pick, _))) =
            (tally.first_key_value(), tally.last_key_value())
        else {
            return Histogram::empty();
        };

        // Widen a single cluster to its neighbours
        if tally.len() == 1 {
            let pick = min_pick as i32;
            let count = tally[&min_pick];
            return Histogram {
                bins: vec![
                    HistogramBin::new(pick - 1, 0, total_valid),
                    HistogramBin::new(pick, count, total_valid),
                    HistogramBin::new(pick + 1, 0, total_valid),
                ],
                total_valid,
                source: HistogramSource::SingleCluster,
            };
        }

        // Dense bins, zero-filled between observed picks
        let bins = (min_pick..=max_pick)
            .map(|pick| {
                let count = tally.get(&pick).copied().unwrap_or(0);
                HistogramBin::new(pick as i32, count, total_valid)
            })
            .collect();

        Histogram { bins, total_valid, source: HistogramSource::Contributors }
    }
}

impl Default for HistogramBuilder {
    fn default() -> Self {
        Self::new(PickWindow::HISTOGRAM, HistogramOverrides::new(), ContributorDiscovery::new())
    }
}
