//! Range-consensus buckets.
//!
//! Each prospect row stores, per draft-position bucket, the fraction of
//! contributors who placed the prospect there. The bucket list is fixed and
//! ordered per schema; the bar chart and the label/value table are both built
//! from the same list so they cannot disagree.

use prospect_registry::coercion::parse_float_prefix;
use prospect_registry::Prospect;
use serde::{Deserialize, Serialize};

/// First draft year whose sheets carry a "2nd Round" bucket instead of "31-59"
pub const SECOND_ROUND_SCHEMA_FROM: u16 = 2024;

/// One bucket: display label and the source column holding its fraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketDef {
    pub label: String,
    pub field: String,
}

impl BucketDef {
    fn new(label: &str, field: &str) -> Self {
        Self { label: label.to_string(), field: field.to_string() }
    }
}

/// Ordered bucket list for a draft year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSchema {
    pub buckets: Vec<BucketDef>,
}

impl BucketSchema {
    /// Schema whose late bucket covers picks 31-59
    pub fn late_picks() -> Self {
        Self {
            buckets: vec![
                BucketDef::new("Picks 1-3", "1-3"),
                BucketDef::new("Picks 4-14", "4-14"),
                BucketDef::new("Picks 15-30", "15-30"),
                BucketDef::new("Picks 31-59", "31-59"),
                BucketDef::new("Undrafted", "Undrafted"),
            ],
        }
    }

    /// Schema whose late bucket is the whole second round
    pub fn second_round() -> Self {
        Self {
            buckets: vec![
                BucketDef::new("Picks 1-3", "1-3"),
                BucketDef::new("Picks 4-14", "4-14"),
                BucketDef::new("Picks 15-30", "15-30"),
                BucketDef::new("2nd Round", "2nd Round"),
                BucketDef::new("Undrafted", "Undrafted"),
            ],
        }
    }

    pub fn for_year(year: u16) -> Self {
        if year >= SECOND_ROUND_SCHEMA_FROM {
            Self::second_round()
        } else {
            Self::late_picks()
        }
    }

    /// Pick the schema from the prospect's own columns, falling back to the year
    pub fn detect(prospect: &Prospect, year: u16) -> Self {
        if prospect.fields.contains_key("2nd Round") {
            Self::second_round()
        } else if prospect.fields.contains_key("31-59") {
            Self::late_picks()
        } else {
            Self::for_year(year)
        }
    }
}

/// One bucket's share for a prospect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub label: String,

    /// Stored fraction, 0.0 when empty or unparseable
    pub fraction: f64,

    /// `round(fraction * 100)`
    pub percentage: i32,
}

impl RangeBucket {
    pub fn display_percentage(&self) -> String {
        format!("{}%", self.percentage)
    }
}

/// Bucket percentages for a prospect, one per schema bucket, zeros included
pub fn range_buckets(prospect: &Prospect, schema: &BucketSchema) -> Vec<RangeBucket> {
    schema
        .buckets
        .iter()
        .map(|bucket| {
            let fraction = prospect.field(&bucket.field).and_then(parse_float_prefix).unwrap_or(0.0);
            RangeBucket {
                label: bucket.label.clone(),
                fraction,
                percentage: (fraction * 100.0).round() as i32,
            }
        })
        .collect()
}

/// Visualization shape for range buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartShape {
    GroupedBar,
    Distribution,
}

/// Range buckets plus the shape they should be drawn as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeChart {
    pub shape: ChartShape,
    pub buckets: Vec<RangeBucket>,
}

impl RangeChart {
    pub fn new(buckets: Vec<RangeBucket>) -> Self {
        let shape = Self::suggested_shape(&buckets);
        Self { shape, buckets }
    }

    /// Distribution once two or more buckets carry weight, grouped bars otherwise
    pub fn suggested_shape(buckets: &[RangeBucket]) -> ChartShape {
        if buckets.iter().filter(|b| b.percentage > 0).count() >= 2 {
            ChartShape::Distribution
        } else {
            ChartShape::GroupedBar
        }
    }

    /// Label/value rows for the plain table view
    pub fn table_rows(&self) -> Vec<(String, String)> {
        self.buckets.iter().map(|b| (b.label.clone(), b.display_percentage())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_registry::parse_csv_text;

    fn prospect(csv: &str) -> Prospect {
        let table = parse_csv_text(csv).unwrap();
        let row = table.row(0).unwrap();
        Prospect::from_row(&row).unwrap()
    }

    #[test]
    fn test_rounding_and_empty_values() {
        let p = prospect("Name,1-3,4-14,15-30,31-59,Undrafted\nBo,0.256,,junk,0.5,0.145\n");
        let buckets = range_buckets(&p, &BucketSchema::late_picks());

        let shown: Vec<String> = buckets.iter().map(RangeBucket::display_percentage).collect();
        assert_eq!(shown, vec!["26%", "0%", "0%", "50%", "14%"]);
    }

    #[test]
    fn test_no_bucket_is_dropped() {
        let p = prospect("Name\nBo\n");
        let buckets = range_buckets(&p, &BucketSchema::second_round());
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| b.percentage == 0));
        assert_eq!(buckets[3].label, "2nd Round");
    }

    #[test]
    fn test_schema_detection() {
        let late = prospect("Name,31-59\nBo,0.1\n");
        let second = prospect("Name,2nd Round\nBo,0.1\n");
        let bare = prospect("Name\nBo\n");

        assert_eq!(BucketSchema::detect(&late, 2025), BucketSchema::late_picks());
        assert_eq!(BucketSchema::detect(&second, 2020), BucketSchema::second_round());
        assert_eq!(BucketSchema::detect(&bare, 2023), BucketSchema::late_picks());
        assert_eq!(BucketSchema::detect(&bare, 2024), BucketSchema::second_round());
    }

    #[test]
    fn test_chart_and_table_share_buckets() {
        let p = prospect("Name,1-3,4-14,15-30,2nd Round,Undrafted\nBo,0.7,0.3,,,\n");
        let chart = RangeChart::new(range_buckets(&p, &BucketSchema::second_round()));

        assert_eq!(chart.shape, ChartShape::Distribution);
        let rows = chart.table_rows();
        assert_eq!(rows.len(), chart.buckets.len());
        assert_eq!(rows[0], ("Picks 1-3".to_string(), "70%".to_string()));
    }

    #[test]
    fn test_single_bucket_is_grouped_bar() {
        let p = prospect("Name,1-3\nBo,1.0\n");
        let chart = RangeChart::new(range_buckets(&p, &BucketSchema::late_picks()));
        assert_eq!(chart.shape, ChartShape::GroupedBar);
    }
}
