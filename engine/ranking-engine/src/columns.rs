use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::comparator::SortKey;

/// Grouping used by the column picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnCategory {
    Identity,
    Physical,
    Draft,
    Consensus,
    Ranges,
    Contributors,
}

/// One displayable table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnConfig {
    pub key: String,
    pub label: String,
    pub category: ColumnCategory,
    pub visible: bool,
    pub sortable: bool,
}

impl ColumnConfig {
    pub fn new(key: &str, label: &str, category: ColumnCategory, visible: bool) -> Self {
        Self { key: key.to_string(), label: label.to_string(), category, visible, sortable: true }
    }
}

// key, label, category, visible by default
const DEFAULT_COLUMNS: &[(&str, &str, ColumnCategory, bool)] = &[
    ("Rank", "Rank", ColumnCategory::Identity, true),
    ("Name", "Name", ColumnCategory::Identity, true),
    ("Role", "Role", ColumnCategory::Identity, true),
    ("Tier", "Tier", ColumnCategory::Identity, true),
    ("Height", "Height", ColumnCategory::Physical, true),
    ("Wingspan", "Wingspan", ColumnCategory::Physical, false),
    ("Weight", "Weight", ColumnCategory::Physical, false),
    ("Age", "Age", ColumnCategory::Physical, true),
    ("Pre-NBA", "Pre-NBA", ColumnCategory::Draft, true),
    ("League", "League", ColumnCategory::Draft, false),
    ("Actual Pick", "Pick", ColumnCategory::Draft, true),
    ("NBA Team", "Team", ColumnCategory::Draft, true),
    ("SCORE", "Score", ColumnCategory::Consensus, false),
    ("MEAN", "Mean", ColumnCategory::Consensus, true),
    ("MEDIAN", "Median", ColumnCategory::Consensus, false),
    ("MODE", "Mode", ColumnCategory::Consensus, false),
    ("HIGH", "High", ColumnCategory::Consensus, true),
    ("LOW", "Low", ColumnCategory::Consensus, true),
    ("RANGE", "Range", ColumnCategory::Consensus, false),
    ("STDEV", "Std Dev", ColumnCategory::Consensus, false),
    ("COUNT", "Count", ColumnCategory::Consensus, false),
    ("Inclusion Rate", "Inclusion", ColumnCategory::Consensus, true),
    ("1-3", "Picks 1-3", ColumnCategory::Ranges, false),
    ("4-14", "Picks 4-14", ColumnCategory::Ranges, false),
    ("15-30", "Picks 15-30", ColumnCategory::Ranges, false),
    ("31-59", "Picks 31-59", ColumnCategory::Ranges, false),
    ("2nd Round", "2nd Round", ColumnCategory::Ranges, false),
    ("Undrafted", "Undrafted", ColumnCategory::Ranges, false),
];

/// Ordered table columns for one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSet {
    columns: Vec<ColumnConfig>,
}

impl ColumnSet {
    pub fn defaults() -> Self {
        let columns = DEFAULT_COLUMNS
            .iter()
            .map(|&(key, label, category, visible)| ColumnConfig::new(key, label, category, visible))
            .collect();
        Self { columns }
    }

    /// Append a hidden sortable column for each contributor not already present
    pub fn with_contributors<S: AsRef<str>>(mut self, contributors: &[S]) -> Self {
        for contributor in contributors {
            let key = contributor.as_ref();
            if self.get(key).is_none() {
                self.columns.push(ColumnConfig::new(key, key, ColumnCategory::Contributors, false));
            }
        }
        self
    }

    pub fn columns(&self) -> &[ColumnConfig] {
        &self.columns
    }

    pub fn get(&self, key: &str) -> Option<&ColumnConfig> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Returns false for an unknown key
    pub fn set_visible(&mut self, key: &str, visible: bool) -> bool {
        match self.columns.iter_mut().find(|c| c.key == key) {
            Some(column) => {
                column.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Flip visibility; `None` for an unknown key
    pub fn toggle(&mut self, key: &str) -> Option<bool> {
        let column = self.columns.iter_mut().find(|c| c.key == key)?;
        column.visible = !column.visible;
        Some(column.visible)
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &ColumnConfig> {
        self.columns.iter().filter(|c| c.visible)
    }

    pub fn in_category(&self, category: ColumnCategory) -> impl Iterator<Item = &ColumnConfig> {
        self.columns.iter().filter(move |c| c.category == category)
    }

    /// Comparator policy for a sortable column
    pub fn sort_key(&self, key: &str) -> Option<SortKey> {
        self.get(key).filter(|c| c.sortable).map(|c| SortKey::parse(&c.key))
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::defaults()
    }
}

/// User visibility choices for the selected year.
///
/// Held in memory only and dropped whenever the year changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreferences {
    year: Option<u16>,
    overrides: HashMap<String, bool>,
}

impl ColumnPreferences {
    pub fn new(year: u16) -> Self {
        Self { year: Some(year), overrides: HashMap::new() }
    }

    pub fn year(&self) -> Option<u16> {
        self.year
    }

    /// Switch years; a different year clears every override
    pub fn set_year(&mut self, year: u16) {
        if self.year != Some(year) {
            if !self.overrides.is_empty() {
                debug!("Clearing {} column preferences on switch to {}", self.overrides.len(), year);
            }
            self.overrides.clear();
            self.year = Some(year);
        }
    }

    pub fn set_visible(&mut self, key: impl Into<String>, visible: bool) {
        self.overrides.insert(key.into(), visible);
    }

    pub fn visibility(&self, key: &str) -> Option<bool> {
        self.overrides.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Overlay the stored choices on `columns`; keys the set lacks are ignored
    pub fn apply(&self, columns: &mut ColumnSet) {
        for (key, &visible) in &self.overrides {
            columns.set_visible(key, visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let columns = ColumnSet::defaults();
        assert_eq!(columns.columns()[0].key, "Rank");
        assert!(columns.get("MEAN").unwrap().visible);
        assert!(!columns.get("STDEV").unwrap().visible);
        assert!(columns.visible_columns().any(|c| c.key == "Actual Pick"));
        assert_eq!(columns.in_category(ColumnCategory::Ranges).count(), 6);
    }

    #[test]
    fn test_with_contributors() {
        let columns = ColumnSet::defaults().with_contributors(&["ESPN", "MEAN", "Ringer"]);
        let contributors: Vec<&str> =
            columns.in_category(ColumnCategory::Contributors).map(|c| c.key.as_str()).collect();

        assert_eq!(contributors, vec!["ESPN", "Ringer"]);
        assert!(!columns.get("ESPN").unwrap().visible);
        assert_eq!(columns.sort_key("ESPN"), Some(SortKey::Field("ESPN".to_string())));
    }

    #[test]
    fn test_toggle_and_set_visible() {
        let mut columns = ColumnSet::defaults();
        assert_eq!(columns.toggle("Wingspan"), Some(true));
        assert_eq!(columns.toggle("Wingspan"), Some(false));
        assert_eq!(columns.toggle("Nope"), None);
        assert!(columns.set_visible("STDEV", true));
        assert!(!columns.set_visible("Nope", true));
    }

    #[test]
    fn test_sort_key_for_columns() {
        let columns = ColumnSet::defaults();
        assert_eq!(columns.sort_key("Rank"), Some(SortKey::Rank));
        assert_eq!(columns.sort_key("Actual Pick"), Some(SortKey::ActualPick));
        assert_eq!(columns.sort_key("Height"), Some(SortKey::Measurement("Height".into())));
        assert_eq!(columns.sort_key("Unknown"), None);
    }

    #[test]
    fn test_preferences_cleared_on_year_change() {
        let mut prefs = ColumnPreferences::new(2025);
        prefs.set_visible("STDEV", true);
        prefs.set_visible("Age", false);

        prefs.set_year(2025);
        assert_eq!(prefs.len(), 2);

        let mut columns = ColumnSet::defaults();
        prefs.apply(&mut columns);
        assert!(columns.get("STDEV").unwrap().visible);
        assert!(!columns.get("Age").unwrap().visible);

        prefs.set_year(2024);
        assert!(prefs.is_empty());
        assert_eq!(prefs.year(), Some(2024));
        assert_eq!(prefs.visibility("STDEV"), None);
    }
}
