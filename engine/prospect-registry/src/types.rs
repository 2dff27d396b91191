use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::csv_table::CsvRow;

/// Column holding the prospect name (join key across every CSV)
pub const NAME_FIELD: &str = "Name";

/// Column holding the actual draft slot, a number or "UDFA"
pub const ACTUAL_PICK_FIELD: &str = "Actual Pick";

pub const ROLE_FIELD: &str = "Role";

pub const TIER_FIELD: &str = "Tier";

/// Column marking a prospect as unfit for ranking (e.g. too few games played)
pub const QUALITY_FLAG_FIELD: &str = "Low GP";

/// A raw cell as handed over by the CSV loader.
///
/// The loader may deliver numbers already typed (JSON sources) or as text,
/// so nothing downstream assumes one or the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Missing,
}

impl CellValue {
    /// Text view of the cell, `None` for a missing cell
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Missing)
    }
}

impl From<&serde_json::Value> for CellValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => CellValue::Missing,
            serde_json::Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Missing),
            serde_json::Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Positional role of a prospect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Guard,
    Wing,
    Big,
}

impl Role {
    /// Parse the `Role` column. Matching is exact; anything else has no role.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Guard" => Some(Role::Guard),
            "Wing" => Some(Role::Wing),
            "Big" => Some(Role::Big),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Guard => "Guard",
            Role::Wing => "Wing",
            Role::Big => "Big",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse outcome tier, ordered from best (severity 1) to worst (severity 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    AllTimeGreat,
    AllNba,
    AllStar,
    Starter,
    RolePlayer,
    Bench,
    FringeNba,
}

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::AllTimeGreat,
        Tier::AllNba,
        Tier::AllStar,
        Tier::Starter,
        Tier::RolePlayer,
        Tier::Bench,
        Tier::FringeNba,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|tier| tier.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::AllTimeGreat => "All-Time Great",
            Tier::AllNba => "All-NBA",
            Tier::AllStar => "All-Star",
            Tier::Starter => "Starter",
            Tier::RolePlayer => "Role Player",
            Tier::Bench => "Bench",
            Tier::FringeNba => "Fringe NBA",
        }
    }

    /// Fixed severity used for tier-locked sorting (1 = best)
    pub fn severity(&self) -> u8 {
        match self {
            Tier::AllTimeGreat => 1,
            Tier::AllNba => 2,
            Tier::AllStar => 3,
            Tier::Starter => 4,
            Tier::RolePlayer => 5,
            Tier::Bench => 6,
            Tier::FringeNba => 7,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One draft-eligible player for a given draft year.
///
/// Every source column is kept verbatim in `fields` so sort keys and
/// display columns can reach values this struct does not name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prospect {
    /// Prospect name, unique within a year (not guaranteed by the source)
    pub name: String,

    /// Guard / Wing / Big, `None` when the column is blank or unrecognised
    pub role: Option<Role>,

    pub tier: Option<Tier>,

    /// Raw `Actual Pick` text: a number, "UDFA" or empty
    pub actual_pick: String,

    /// Excluded from ranking by the data-quality marker
    pub excluded: bool,

    /// Every column of the source row, as text
    pub fields: HashMap<String, String>,
}

impl Prospect {
    /// Build a prospect from a parsed CSV row. Rows with an empty name yield `None`.
    pub fn from_row(row: &CsvRow<'_>) -> Option<Self> {
        let name = row.get(NAME_FIELD).map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return None;
        }

        let fields: HashMap<String, String> =
            row.iter().map(|(key, value)| (key.to_string(), value.to_string())).collect();

        Some(Self {
            name: name.to_string(),
            role: row.get(ROLE_FIELD).and_then(Role::from_label),
            tier: row.get(TIER_FIELD).and_then(Tier::from_label),
            actual_pick: row.get(ACTUAL_PICK_FIELD).unwrap_or_default().trim().to_string(),
            excluded: row.get(QUALITY_FLAG_FIELD).map(is_flag_set).unwrap_or(false),
            fields,
        })
    }

    /// Raw value of any source column
    pub fn field(&self, key: &str) -> Option<&str> {
        if key == NAME_FIELD {
            return Some(&self.name);
        }
        self.fields.get(key).map(String::as_str)
    }
}

fn is_flag_set(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !matches!(value.as_str(), "" | "0" | "false" | "no" | "n")
}

/// Per-prospect map from contributor key to that contributor's pick estimate.
///
/// Keys come from the CSV header row, so the record keeps header order
/// alongside the lookup map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub name: String,
    columns: Vec<String>,
    values: HashMap<String, CellValue>,
}

impl ConsensusRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), columns: Vec::new(), values: HashMap::new() }
    }

    /// Build a record from a parsed CSV row. Rows with an empty name yield `None`.
    pub fn from_row(row: &CsvRow<'_>) -> Option<Self> {
        let name = row.get(NAME_FIELD).map(str::trim).unwrap_or_default();
        if name.is_empty() {
            return None;
        }

        let mut record = Self::new(name);
        for (key, value) in row.iter() {
            let cell = if value.is_empty() { CellValue::Missing } else { CellValue::from(value) };
            record.insert(key, cell);
        }
        Some(record)
    }

    /// Insert or replace a value, keeping first-seen column order
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.columns.push(key.clone());
        }
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key)
    }

    /// Keys in header order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_table::parse_csv_text;

    #[test]
    fn test_prospect_from_row() {
        let table = parse_csv_text(
            "Name,Role,Tier,Actual Pick,Low GP,Height\nAce Bailey,Wing,All-Star,5,,6'10\"\n",
        )
        .unwrap();
        let prospect = Prospect::from_row(&table.row(0).unwrap()).unwrap();

        assert_eq!(prospect.name, "Ace Bailey");
        assert_eq!(prospect.role, Some(Role::Wing));
        assert_eq!(prospect.tier, Some(Tier::AllStar));
        assert_eq!(prospect.actual_pick, "5");
        assert!(!prospect.excluded);
        assert_eq!(prospect.field("Height"), Some("6'10\""));
        assert_eq!(prospect.field("Name"), Some("Ace Bailey"));
    }

    #[test]
    fn test_empty_name_row_is_skipped() {
        let table = parse_csv_text("Name,Role\n ,Guard\n").unwrap();
        assert!(Prospect::from_row(&table.row(0).unwrap()).is_none());
        assert!(ConsensusRecord::from_row(&table.row(0).unwrap()).is_none());
    }

    #[test]
    fn test_quality_flag() {
        let table = parse_csv_text("Name,Low GP\nA,yes\nB,0\nC,\n").unwrap();
        let flags: Vec<bool> =
            table.rows().filter_map(|row| Prospect::from_row(&row)).map(|p| p.excluded).collect();
        assert_eq!(flags, vec![true, false, false]);
    }

    #[test]
    fn test_tier_severity_order() {
        let severities: Vec<u8> = Tier::ALL.iter().map(Tier::severity).collect();
        assert_eq!(severities, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(Tier::from_label("All-Time Great"), Some(Tier::AllTimeGreat));
        assert_eq!(Tier::from_label("Fringe NBA").map(|t| t.severity()), Some(7));
        assert_eq!(Tier::from_label("Superstar"), None);
    }

    #[test]
    fn test_consensus_record_keeps_column_order() {
        let mut record = ConsensusRecord::new("Bo");
        record.insert("Zed", "4");
        record.insert("Amy", CellValue::Missing);
        record.insert("Zed", 5.0);

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["Zed", "Amy"]);
        assert_eq!(record.get("Zed"), Some(&CellValue::Number(5.0)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_cell_value_from_json() {
        assert_eq!(CellValue::from(&serde_json::json!(12)), CellValue::Number(12.0));
        assert_eq!(CellValue::from(&serde_json::json!("12th")), CellValue::from("12th"));
        assert_eq!(CellValue::from(&serde_json::Value::Null), CellValue::Missing);
    }
}
