//! Sparse-data classification and y-axis scaling for histogram charts.

use prospect_registry::coercion::coerce_leading_int;
use prospect_registry::{ConsensusRecord, PickWindow};

use crate::config::YAxisConfig;
use crate::models::{Histogram, YAxis};

/// Whether a histogram should render as discrete bars instead of a density curve.
///
/// Sparse when at most one contributor gave a valid pick, or exactly two did
/// and they agree on a single position.
pub fn is_sparse_data(valid_picks: usize, unique_pick_positions: usize) -> bool {
    valid_picks <= 1 || (valid_picks == 2 && unique_pick_positions == 1)
}

/// Contributors whose value is a valid pick inside `window`, read with the
/// leading-digit policy
pub fn count_valid_picks<S: AsRef<str>>(record: &ConsensusRecord, contributors: &[S], window: PickWindow) -> usize {
    contributors
        .iter()
        .filter_map(|key| record.get(key.as_ref()))
        .filter(|cell| coerce_leading_int(cell).as_pick(window).is_some())
        .count()
}

/// Sparse classification straight from a record and its histogram
pub fn classify<S: AsRef<str>>(
    record: &ConsensusRecord,
    contributors: &[S],
    histogram: &Histogram,
    window: PickWindow,
) -> bool {
    is_sparse_data(count_valid_picks(record, contributors, window), histogram.unique_pick_positions())
}

/// Smallest ladder value at or above the largest bin percentage, with ticks every step
pub fn y_axis_scale(max_percentage: f64, config: &YAxisConfig) -> YAxis {
    let step = config.step.max(1);
    let max = if max_percentage <= 0.0 || !max_percentage.is_finite() {
        config.empty_max
    } else {
        (step..=config.cap)
            .step_by(step as usize)
            .find(|&rung| rung as f64 >= max_percentage)
            .unwrap_or(config.cap)
    };

    let ticks = (0..=max).step_by(step as usize).collect();
    YAxis { max, ticks }
}
