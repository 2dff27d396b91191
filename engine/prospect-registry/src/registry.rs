use crate::contributors::ContributorDiscovery;
use crate::csv_table::{parse_csv_text, CsvTable};
use crate::error::{RegistryError, Result};
use crate::types::{ConsensusRecord, Prospect, NAME_FIELD};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Prospect Registry - One draft year's prospects and consensus records
///
/// Prospects keep their source order. Consensus records are joined to
/// prospects by exact name match; no case or whitespace normalisation is
/// applied beyond trimming the name cell.
#[derive(Debug, Clone)]
pub struct ProspectRegistry {
    /// Draft year this registry was loaded for
    year: u16,

    /// Prospects in source order
    prospects: Vec<Prospect>,

    /// Map from prospect name to index in `prospects`
    index_by_name: HashMap<String, usize>,

    /// Map from prospect name to consensus record
    consensus_by_name: HashMap<String, ConsensusRecord>,

    /// Rows dropped because their name cell was empty
    skipped_rows: usize,

    /// When this registry was materialised
    loaded_at: DateTime<Utc>,
}

impl ProspectRegistry {
    /// Create a new empty registry
    pub fn new(year: u16) -> Self {
        Self {
            year,
            prospects: Vec::new(),
            index_by_name: HashMap::new(),
            consensus_by_name: HashMap::new(),
            skipped_rows: 0,
            loaded_at: Utc::now(),
        }
    }

    /// Load a year from CSV text.
    ///
    /// With no separate consensus CSV the prospect sheet doubles as the
    /// consensus sheet: its non-metadata columns are the contributors.
    pub fn load_from_csv_text(year: u16, prospects_csv: &str, consensus_csv: Option<&str>) -> Result<Self> {
        let prospect_table = parse_csv_text(prospects_csv)?;
        let consensus_table = match consensus_csv {
            Some(text) => Some(parse_csv_text(text)?),
            None => None,
        };

        Self::from_tables(year, &prospect_table, consensus_table.as_ref())
    }

    /// Build a registry from already-parsed tables
    pub fn from_tables(year: u16, prospects: &CsvTable, consensus: Option<&CsvTable>) -> Result<Self> {
        prospects.require_column(NAME_FIELD)?;
        if let Some(table) = consensus {
            table.require_column(NAME_FIELD)?;
        }

        // Prospects first so consensus rows can be matched against them
        let mut registry = Self::new(year);
        registry.ingest_prospects(prospects);
        registry.ingest_consensus(consensus.unwrap_or(prospects));

        info!(
            "Loaded {} prospects and {} consensus records for {} ({} rows skipped)",
            registry.prospects.len(),
            registry.consensus_by_name.len(),
            year,
            registry.skipped_rows
        );
        Ok(registry)
    }

    fn ingest_prospects(&mut self, table: &CsvTable) {
        for (row_index, row) in table.rows().enumerate() {
            let Some(prospect) = Prospect::from_row(&row) else {
                warn!("Skipping prospect row {} for {}: empty Name", row_index + 1, self.year);
                self.skipped_rows += 1;
                continue;
            };

            if self.index_by_name.contains_key(&prospect.name) {
                warn!("Duplicate prospect '{}' in {}; keeping first row", prospect.name, self.year);
                continue;
            }

            self.index_by_name.insert(prospect.name.clone(), self.prospects.len());
            self.prospects.push(prospect);
        }
    }

    fn ingest_consensus(&mut self, table: &CsvTable) {
        for (row_index, row) in table.rows().enumerate() {
            let Some(record) = ConsensusRecord::from_row(&row) else {
                debug!("Skipping consensus row {} for {}: empty Name", row_index + 1, self.year);
                continue;
            };

            if self.consensus_by_name.contains_key(&record.name) {
                warn!("Duplicate consensus row for '{}' in {}; keeping first row", record.name, self.year);
                continue;
            }

            if !self.index_by_name.contains_key(&record.name) {
                debug!("Consensus record '{}' has no matching prospect in {}", record.name, self.year);
            }

            self.consensus_by_name.insert(record.name.clone(), record);
        }

        for prospect in &self.prospects {
            if !self.consensus_by_name.contains_key(&prospect.name) {
                debug!("Prospect '{}' has no consensus record in {}", prospect.name, self.year);
            }
        }
    }

    /// Get a prospect by exact name
    pub fn get_by_name(&self, name: &str) -> Result<&Prospect> {
        self.index_by_name
            .get(name)
            .map(|&i| &self.prospects[i])
            .ok_or_else(|| RegistryError::ProspectNotFound(name.to_string()))
    }

    /// Consensus record joined to a prospect name
    pub fn consensus_for(&self, name: &str) -> Option<&ConsensusRecord> {
        self.consensus_by_name.get(name)
    }

    /// All prospects in source order
    pub fn prospects(&self) -> &[Prospect] {
        &self.prospects
    }

    /// Union of contributor keys across this year's consensus records, in prospect order
    pub fn contributor_keys(&self, discovery: &ContributorDiscovery) -> Vec<String> {
        let records = self.prospects.iter().filter_map(|p| self.consensus_by_name.get(&p.name));
        discovery.contributors_across(records)
    }

    /// Search for prospects by case-insensitive partial name match
    pub fn search_prospects(&self, query: &str) -> Vec<&Prospect> {
        let query_lower = query.to_lowercase();
        self.prospects.iter().filter(|p| p.name.to_lowercase().contains(&query_lower)).collect()
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.prospects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prospects.is_empty()
    }

    /// Rows dropped for an empty name
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, Role};

    const PROSPECTS_CSV: &str = "\
Name,Role,Tier,Actual Pick,MEAN
Cooper Flagg,Wing,All-NBA,1,1.0
Dylan Harper,Guard,All-Star,2,2.1
,Big,,,
Ace Bailey,Wing,Starter,5,4.2
Cooper Flagg,Big,Bench,60,
";

    const CONSENSUS_CSV: &str = "\
Name,MEAN,Ringer,@boardguy
Cooper Flagg,1.0,1,1
Dylan Harper,2.1,2,
Nobody Listed,40,41,39
";

    #[test]
    fn test_registry_creation() {
        let registry = ProspectRegistry::load_from_csv_text(2025, PROSPECTS_CSV, Some(CONSENSUS_CSV)).unwrap();

        assert_eq!(registry.year(), 2025);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.skipped_rows(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_duplicate_name_keeps_first_row() {
        let registry = ProspectRegistry::load_from_csv_text(2025, PROSPECTS_CSV, None).unwrap();
        let flagg = registry.get_by_name("Cooper Flagg").unwrap();
        assert_eq!(flagg.role, Some(Role::Wing));
        assert_eq!(flagg.actual_pick, "1");
    }

    #[test]
    fn test_prospect_lookup() {
        let registry = ProspectRegistry::load_from_csv_text(2025, PROSPECTS_CSV, Some(CONSENSUS_CSV)).unwrap();

        let harper = registry.get_by_name("Dylan Harper").unwrap();
        assert_eq!(harper.role, Some(Role::Guard));
        assert!(matches!(registry.get_by_name("dylan harper"), Err(RegistryError::ProspectNotFound(_))));

        let record = registry.consensus_for("Dylan Harper").unwrap();
        assert_eq!(record.get("Ringer"), Some(&CellValue::from("2")));
        assert_eq!(record.get("@boardguy"), Some(&CellValue::Missing));
        assert!(registry.consensus_for("Ace Bailey").is_none());
    }

    #[test]
    fn test_single_sheet_doubles_as_consensus() {
        let csv = "Name,ContribA,ContribB\nAl,1,2\nBo,,3\nCy,2,2\n";
        let registry = ProspectRegistry::load_from_csv_text(2024, csv, None).unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.contributor_keys(&ContributorDiscovery::new()),
            vec!["ContribA", "ContribB"]
        );
        assert_eq!(registry.consensus_for("Cy").unwrap().get("ContribA"), Some(&CellValue::from("2")));
    }

    #[test]
    fn test_search_prospects() {
        let registry = ProspectRegistry::load_from_csv_text(2025, PROSPECTS_CSV, None).unwrap();

        let results = registry.search_prospects("flagg");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Cooper Flagg");

        assert_eq!(registry.search_prospects("").len(), 3);
        assert!(registry.search_prospects("zzz").is_empty());
    }

    #[test]
    fn test_missing_name_column_is_an_error() {
        let result = ProspectRegistry::load_from_csv_text(2025, "Player,Role\nA,Guard\n", None);
        assert!(matches!(result, Err(RegistryError::MissingColumn(col)) if col == "Name"));
    }
}
