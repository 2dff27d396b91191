use prospect_registry::{ConsensusRecord, ContributorDiscovery, Prospect, ProspectRegistry};
use tracing::debug;

use crate::buckets::{range_buckets, BucketSchema, RangeBucket, RangeChart};
use crate::config::ConsensusConfig;
use crate::histogram::HistogramBuilder;
use crate::models::{Histogram, ProspectConsensus, YAxis};
use crate::overrides::HistogramOverrides;
use crate::quality;
use crate::stats::ConsensusStats;

/// Consensus Engine - per-prospect derived views
///
/// Every method is a pure function of its inputs; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct ConsensusEngine {
    config: ConsensusConfig,
    discovery: ContributorDiscovery,
    histograms: HistogramBuilder,
}

impl ConsensusEngine {
    pub fn new(config: ConsensusConfig) -> Self {
        let discovery = ContributorDiscovery::with_extra_fields(config.discovery.extra_metadata_fields.clone());
        let overrides = HistogramOverrides::from_entries(&config.overrides);
        let histograms = HistogramBuilder::new(config.histogram_window(), overrides, discovery.clone());

        Self { config, discovery, histograms }
    }

    pub fn config(&self) -> &ConsensusConfig {
        &self.config
    }

    pub fn discovery(&self) -> &ContributorDiscovery {
        &self.discovery
    }

    /// Pick histogram for a prospect
    pub fn histogram_bins(&self, prospect: &Prospect, record: &ConsensusRecord) -> Histogram {
        self.histograms.build(&prospect.name, record)
    }

    /// Sparse/dense rendering decision for a prospect's histogram
    pub fn is_sparse_data(&self, record: &ConsensusRecord, histogram: &Histogram) -> bool {
        let contributors = self.discovery.contributor_keys(record);
        quality::classify(record, &contributors, histogram, self.config.stats_window())
    }

    pub fn y_axis(&self, histogram: &Histogram) -> YAxis {
        quality::y_axis_scale(histogram.max_percentage(), &self.config.y_axis)
    }

    /// Range buckets using the schema detected from the prospect's columns
    pub fn range_buckets(&self, prospect: &Prospect, year: u16) -> Vec<RangeBucket> {
        range_buckets(prospect, &BucketSchema::detect(prospect, year))
    }

    pub fn stats(&self, record: &ConsensusRecord) -> Option<ConsensusStats> {
        let contributors = self.discovery.contributor_keys(record);
        ConsensusStats::from_record(record, &contributors, self.config.stats_window())
    }

    /// Full consensus view for one prospect. A prospect without a consensus
    /// record gets an empty histogram and no statistics.
    pub fn analyze(&self, prospect: &Prospect, record: Option<&ConsensusRecord>, year: u16) -> ProspectConsensus {
        let range_chart = RangeChart::new(self.range_buckets(prospect, year));

        let Some(record) = record else {
            let histogram = Histogram::empty();
            return ProspectConsensus {
                name: prospect.name.clone(),
                y_axis: self.y_axis(&histogram),
                is_sparse: true,
                histogram,
                range_chart,
                stats: None,
            };
        };

        let histogram = self.histogram_bins(prospect, record);
        let is_sparse = self.is_sparse_data(record, &histogram);
        let stats = self.stats(record);

        debug!(
            "Analyzed {}: {} bins, {} valid, sparse={}",
            prospect.name,
            histogram.bins.len(),
            histogram.total_valid,
            is_sparse
        );

        ProspectConsensus {
            name: prospect.name.clone(),
            y_axis: self.y_axis(&histogram),
            is_sparse,
            histogram,
            range_chart,
            stats,
        }
    }

    /// Consensus views for every prospect of a registry, in source order
    pub fn analyze_registry(&self, registry: &ProspectRegistry) -> Vec<ProspectConsensus> {
        registry
            .prospects()
            .iter()
            .map(|p| self.analyze(p, registry.consensus_for(&p.name), registry.year()))
            .collect()
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new(ConsensusConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HistogramBin, HistogramSource};

    fn load(csv: &str) -> ProspectRegistry {
        ProspectRegistry::load_from_csv_text(2025, csv, None).unwrap()
    }

    #[test]
    fn test_three_row_sheet() {
        let registry = load("Name,ContribA,ContribB\nAl,1,2\nBo,,3\nCy,2,2\n");
        let engine = ConsensusEngine::default();

        let cy = registry.get_by_name("Cy").unwrap();
        let histogram = engine.histogram_bins(cy, registry.consensus_for("Cy").unwrap());
        assert_eq!(
            histogram.bins,
            vec![
                HistogramBin { pick: 1, count: 0, percentage: 0.0 },
                HistogramBin { pick: 2, count: 2, percentage: 100.0 },
                HistogramBin { pick: 3, count: 0, percentage: 0.0 },
            ]
        );
        assert_eq!(histogram.source, HistogramSource::SingleCluster);
        assert!(engine.is_sparse_data(registry.consensus_for("Cy").unwrap(), &histogram));

        let al = engine.analyze(
            registry.get_by_name("Al").unwrap(),
            registry.consensus_for("Al"),
            registry.year(),
        );
        assert!(!al.is_sparse);
        assert_eq!(al.histogram.bins.len(), 2);
        assert_eq!(al.y_axis.max, 50);

        let bo = engine.analyze(
            registry.get_by_name("Bo").unwrap(),
            registry.consensus_for("Bo"),
            registry.year(),
        );
        assert!(bo.is_sparse);
        assert_eq!(bo.stats.as_ref().map(|s| s.inclusion_rate), Some(0.5));
    }

    #[test]
    fn test_prospect_without_record() {
        let registry = load("Name,1-3\nAl,0.9\n");
        let engine = ConsensusEngine::default();
        let al = registry.get_by_name("Al").unwrap();

        let view = engine.analyze(al, None, 2025);
        assert!(view.histogram.is_empty());
        assert!(view.is_sparse);
        assert_eq!(view.y_axis.max, 10);
        assert!(view.stats.is_none());
        assert_eq!(view.range_chart.buckets[0].percentage, 90);
    }

    #[test]
    fn test_default_override_applies() {
        let registry = load("Name,A,B,C\nCooper Flagg,1,1,first overall\n");
        let engine = ConsensusEngine::default();

        let views = engine.analyze_registry(&registry);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].histogram.bins, vec![HistogramBin { pick: 1, count: 3, percentage: 100.0 }]);
    }

    #[test]
    fn test_view_serializes_for_presentation() {
        let registry = load("Name,A,B\nAl,3,5\n");
        let engine = ConsensusEngine::default();
        let view = engine.analyze(registry.get_by_name("Al").unwrap(), registry.consensus_for("Al"), 2025);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "Al");
        assert_eq!(json["is_sparse"], false);
        assert_eq!(json["histogram"]["bins"].as_array().unwrap().len(), 3);
        assert_eq!(json["histogram"]["total_valid"], 2);
    }

    #[test]
    fn test_extra_metadata_fields_are_not_contributors() {
        let mut config = ConsensusConfig::default();
        config.discovery.extra_metadata_fields.push("Notes".to_string());
        let engine = ConsensusEngine::new(config);

        let registry = load("Name,A,Notes\nAl,4,14\n");
        let view = engine.analyze(registry.get_by_name("Al").unwrap(), registry.consensus_for("Al"), 2025);
        assert_eq!(view.histogram.total_valid, 1);
        assert_eq!(view.stats.map(|s| s.count), Some(1));
    }
}
