use serde::{Deserialize, Serialize};

use crate::buckets::RangeChart;
use crate::stats::ConsensusStats;

/// One x-axis position of a prospect's pick distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Draft position (0 can appear as a synthetic edge of a widened cluster)
    pub pick: i32,

    /// Contributors who gave this pick
    pub count: u32,

    /// `count / total_valid * 100`
    pub percentage: f64,
}

impl HistogramBin {
    pub fn new(pick: i32, count: u32, total_valid: u32) -> Self {
        let percentage =
            if total_valid == 0 { 0.0 } else { count as f64 / total_valid as f64 * 100.0 };
        Self { pick, count, percentage }
    }
}

/// How a histogram was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistogramSource {
    /// Tallied from contributor values
    Contributors,
    /// Every contributor agreed; widened to three bins
    SingleCluster,
    /// Taken from the override table
    Override,
}

/// A prospect's pick distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,

    /// Contributors whose value fell inside the histogram window
    pub total_valid: u32,

    pub source: HistogramSource,
}

impl Histogram {
    pub fn empty() -> Self {
        Self { bins: Vec::new(), total_valid: 0, source: HistogramSource::Contributors }
    }

    /// No contributor gave a usable pick; callers render a placeholder
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bins with at least one contributor
    pub fn unique_pick_positions(&self) -> usize {
        self.bins.iter().filter(|bin| bin.count > 0).count()
    }

    pub fn max_percentage(&self) -> f64 {
        self.bins.iter().map(|bin| bin.percentage).fold(0.0, f64::max)
    }

    pub fn total_count(&self) -> u32 {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

/// Y-axis scale for a histogram chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YAxis {
    pub max: u32,
    pub ticks: Vec<u32>,
}

/// Everything the presentation layer needs for one prospect's consensus card
#[derive(Debug, Clone, Serialize)]
pub struct ProspectConsensus {
    pub name: String,
    pub histogram: Histogram,
    pub is_sparse: bool,
    pub y_axis: YAxis,
    pub range_chart: RangeChart,
    pub stats: Option<ConsensusStats>,
}
