//! Multi-policy column comparator.
//!
//! Policy precedence:
//! 1. `Rank` compares positions in the already-filtered list.
//! 2. `Actual Pick` maps UDFA, empty and any non-numeric text to 999.
//! 3. N/A values sort after everything else in either direction.
//! 4. Numeric columns parse as float, defaulting to 0.
//! 5. `Inclusion Rate` drops a trailing `%` first.
//! 6. Anything else compares numerically when both sides parse, as text when
//!    neither does, and puts numbers ahead of text on a mix.

use std::cmp::Ordering;

use prospect_registry::coercion::{parse_float_or_zero, parse_float_prefix, parse_measurement_inches};
use prospect_registry::types::ACTUAL_PICK_FIELD;
use prospect_registry::Prospect;
use serde::{Deserialize, Serialize};

use crate::filter::SortDirection;

/// Sort value for undrafted or unknown actual picks
pub const UNDRAFTED_SENTINEL: f64 = 999.0;

/// Columns compared as plain floats
pub const NUMERIC_COLUMNS: &[&str] = &[
    "SCORE", "MEAN", "MEDIAN", "MODE", "HIGH", "LOW", "RANGE", "STDEV", "COUNT", "Age", "Weight", "originalRank",
];

/// Columns holding feet/inches measurements, compared in inches
pub const MEASUREMENT_COLUMNS: &[&str] = &["Height", "Wingspan"];

pub const INCLUSION_RATE_COLUMN: &str = "Inclusion Rate";

pub const RANK_COLUMN: &str = "Rank";

/// A sortable column and the policy it compares with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Position in the filtered list
    #[default]
    Rank,
    ActualPick,
    Numeric(String),
    Measurement(String),
    InclusionRate,
    Field(String),
}

impl SortKey {
    /// Map a column key to its comparison policy
    pub fn parse(column: &str) -> Self {
        match column {
            RANK_COLUMN => SortKey::Rank,
            ACTUAL_PICK_FIELD => SortKey::ActualPick,
            INCLUSION_RATE_COLUMN => SortKey::InclusionRate,
            c if NUMERIC_COLUMNS.contains(&c) => SortKey::Numeric(c.to_string()),
            c if MEASUREMENT_COLUMNS.contains(&c) => SortKey::Measurement(c.to_string()),
            c => SortKey::Field(c.to_string()),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            SortKey::Rank => RANK_COLUMN,
            SortKey::ActualPick => ACTUAL_PICK_FIELD,
            SortKey::InclusionRate => INCLUSION_RATE_COLUMN,
            SortKey::Numeric(c) | SortKey::Measurement(c) | SortKey::Field(c) => c.as_str(),
        }
    }
}

/// A prospect together with its position in the filtered list
#[derive(Debug, Clone, Copy)]
pub struct SortItem<'a> {
    pub prospect: &'a Prospect,
    pub index: usize,
}

impl<'a> SortItem<'a> {
    pub fn new(prospect: &'a Prospect, index: usize) -> Self {
        Self { prospect, index }
    }
}

/// Empty, missing, "n/a" or "na" (any case)
pub fn is_na(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let v = v.trim();
            v.is_empty() || v.eq_ignore_ascii_case("n/a") || v.eq_ignore_ascii_case("na")
        }
    }
}

/// Compare two items under `key`.
///
/// `direction` flips the value comparison; N/A placement does not flip.
pub fn compare(a: SortItem<'_>, b: SortItem<'_>, key: &SortKey, direction: SortDirection) -> Ordering {
    match key {
        SortKey::Rank => return direction.apply(a.index.cmp(&b.index)),
        SortKey::ActualPick => {
            let ordering = actual_pick_value(&a.prospect.actual_pick)
                .total_cmp(&actual_pick_value(&b.prospect.actual_pick));
            return direction.apply(ordering);
        }
        _ => {}
    }

    let column = key.column();
    let a_value = a.prospect.field(column);
    let b_value = b.prospect.field(column);

    match (is_na(a_value), is_na(b_value)) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let (a_value, b_value) = (a_value.unwrap_or_default(), b_value.unwrap_or_default());
    let ordering = match key {
        SortKey::Numeric(_) => parse_float_or_zero(a_value).total_cmp(&parse_float_or_zero(b_value)),
        SortKey::Measurement(_) => {
            let a_inches = parse_measurement_inches(a_value).unwrap_or(0.0);
            let b_inches = parse_measurement_inches(b_value).unwrap_or(0.0);
            a_inches.total_cmp(&b_inches)
        }
        SortKey::InclusionRate => percent_value(a_value).total_cmp(&percent_value(b_value)),
        // Numbers before text keeps the order total on mixed columns
        _ => match (parse_float_prefix(a_value), parse_float_prefix(b_value)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => locale_compare(a_value, b_value),
        },
    };

    direction.apply(ordering)
}

/// Numeric actual pick, or the sentinel for UDFA / empty / non-numeric
pub fn actual_pick_value(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("udfa") {
        return UNDRAFTED_SENTINEL;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(UNDRAFTED_SENTINEL)
}

fn percent_value(raw: &str) -> f64 {
    let raw = raw.trim();
    parse_float_or_zero(raw.strip_suffix('%').unwrap_or(raw))
}

/// Case-insensitive text order; on case-only ties lowercase comes first
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prospect_registry::parse_csv_text;

    fn create_test_prospects(csv: &str) -> Vec<Prospect> {
        let table = parse_csv_text(csv).unwrap();
        table.rows().filter_map(|row| Prospect::from_row(&row)).collect()
    }

    fn sorted_names(prospects: &[Prospect], key: &SortKey, direction: SortDirection) -> Vec<String> {
        let mut items: Vec<SortItem> = prospects.iter().enumerate().map(|(i, p)| SortItem::new(p, i)).collect();
        items.sort_by(|a, b| compare(*a, *b, key, direction));
        items.into_iter().map(|item| item.prospect.name.clone()).collect()
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("Rank"), SortKey::Rank);
        assert_eq!(SortKey::parse("Actual Pick"), SortKey::ActualPick);
        assert_eq!(SortKey::parse("MEAN"), SortKey::Numeric("MEAN".into()));
        assert_eq!(SortKey::parse("Height"), SortKey::Measurement("Height".into()));
        assert_eq!(SortKey::parse("Inclusion Rate"), SortKey::InclusionRate);
        assert_eq!(SortKey::parse("League"), SortKey::Field("League".into()));
        assert_eq!(SortKey::parse("League").column(), "League");
    }

    #[test]
    fn test_na_detection() {
        assert!(is_na(None));
        assert!(is_na(Some("")));
        assert!(is_na(Some("N/A")));
        assert!(is_na(Some("na")));
        assert!(is_na(Some(" NA ")));
        assert!(!is_na(Some("0")));
        assert!(!is_na(Some("nat")));
    }

    #[test]
    fn test_actual_pick_ascending() {
        let prospects = create_test_prospects("Name,Actual Pick\nFive,5\nEmpty,\nUndrafted,UDFA\nOne,1\n");
        let names = sorted_names(&prospects, &SortKey::ActualPick, SortDirection::Ascending);

        assert_eq!(&names[..2], &["One", "Five"]);
        let mut tail = names[2..].to_vec();
        tail.sort();
        assert_eq!(tail, vec!["Empty", "Undrafted"]);

        let a = SortItem::new(&prospects[1], 1);
        let b = SortItem::new(&prospects[2], 2);
        assert_eq!(compare(a, b, &SortKey::ActualPick, SortDirection::Ascending), Ordering::Equal);
    }

    #[test]
    fn test_actual_pick_descending_puts_undrafted_first() {
        let prospects = create_test_prospects("Name,Actual Pick\nFive,5\nUndrafted,udfa\nOne,1\nOdd,second round\n");
        let names = sorted_names(&prospects, &SortKey::ActualPick, SortDirection::Descending);
        assert_eq!(names, vec!["Undrafted", "Odd", "Five", "One"]);
    }

    #[test]
    fn test_na_sorts_last_in_both_directions() {
        let prospects = create_test_prospects("Name,MEAN\nA,3\nB,N/A\nC,1\nD,\n");

        let asc = sorted_names(&prospects, &SortKey::parse("MEAN"), SortDirection::Ascending);
        assert_eq!(&asc[..2], &["C", "A"]);

        let desc = sorted_names(&prospects, &SortKey::parse("MEAN"), SortDirection::Descending);
        assert_eq!(&desc[..2], &["A", "C"]);
        assert_eq!(desc[2..].to_vec(), vec!["B", "D"]);
    }

    #[test]
    fn test_numeric_column_defaults_to_zero() {
        let prospects = create_test_prospects("Name,SCORE\nA,12\nB,abc\nC,-1\n");
        let names = sorted_names(&prospects, &SortKey::parse("SCORE"), SortDirection::Ascending);
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_inclusion_rate_strips_percent() {
        let prospects = create_test_prospects("Name,Inclusion Rate\nA,85%\nB,9%\nC,0.5\n");
        let names = sorted_names(&prospects, &SortKey::InclusionRate, SortDirection::Descending);
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_height_compares_in_inches() {
        let prospects = create_test_prospects("Name,Height\nA,6'11\"\nB,7'0\"\nC,6'2\"\n");
        let names = sorted_names(&prospects, &SortKey::parse("Height"), SortDirection::Ascending);
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_generic_column_mixed_text_and_numbers() {
        let prospects = create_test_prospects("Name,League\nA,NCAA\nB,g league\nC,Australia\n");
        let names = sorted_names(&prospects, &SortKey::parse("League"), SortDirection::Ascending);
        assert_eq!(names, vec!["C", "B", "A"]);

        let by_name = sorted_names(&prospects, &SortKey::parse("Name"), SortDirection::Descending);
        assert_eq!(by_name, vec!["C", "B", "A"]);
    }

    #[test]
    fn test_generic_column_is_transitive_on_mixed_values() {
        let prospects = create_test_prospects("Name,Pre-NBA\nA,9\nB,+10\nC,-\nD, 3\nE,abc\n");
        let item = |i: usize| SortItem::new(&prospects[i], i);
        let key = SortKey::parse("Pre-NBA");

        assert_eq!(compare(item(0), item(1), &key, SortDirection::Ascending), Ordering::Less);
        assert_eq!(compare(item(1), item(2), &key, SortDirection::Ascending), Ordering::Less);
        assert_eq!(compare(item(0), item(2), &key, SortDirection::Ascending), Ordering::Less);
        assert_eq!(compare(item(2), item(0), &key, SortDirection::Ascending), Ordering::Greater);

        let names = sorted_names(&prospects, &key, SortDirection::Ascending);
        assert_eq!(names, vec!["D", "A", "B", "C", "E"]);
    }

    #[test]
    fn test_rank_uses_list_position() {
        let prospects = create_test_prospects("Name\nX\nY\nZ\n");
        assert_eq!(sorted_names(&prospects, &SortKey::Rank, SortDirection::Ascending), vec!["X", "Y", "Z"]);
        assert_eq!(sorted_names(&prospects, &SortKey::Rank, SortDirection::Descending), vec!["Z", "Y", "X"]);
    }
}
