//! Header-based CSV parsing.
//!
//! Turns CSV text into a table of text cells addressed by header name. All
//! coercion and validation happen later; this layer only splits text.

use std::collections::HashMap;

use crate::error::{RegistryError, Result};

/// Parsed CSV: header row plus data rows, all cells as text
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

/// Borrowed view of one data row
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    cells: &'a [String],
}

/// Parse CSV text whose first row names the columns.
///
/// Short rows are padded with empty cells on access and a leading byte-order
/// mark is dropped from the first header.
pub fn parse_csv_text(text: &str) -> Result<CsvTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| if i == 0 { h.trim_start_matches('\u{feff}').to_string() } else { h.to_string() })
        .collect();

    let mut index = HashMap::with_capacity(headers.len());
    for (i, header) in headers.iter().enumerate() {
        if !header.is_empty() {
            index.entry(header.clone()).or_insert(i);
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(CsvTable { headers, index, rows })
}

impl CsvTable {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fail unless the named column is present
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(RegistryError::MissingColumn(name.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<CsvRow<'_>> {
        self.rows.get(i).map(|cells| CsvRow { table: self, cells })
    }

    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.rows.iter().map(move |cells| CsvRow { table: self, cells })
    }
}

impl<'a> CsvRow<'a> {
    /// Cell under the named column; missing trailing cells read as ""
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let i = *self.table.index.get(column)?;
        Some(self.cells.get(i).map(String::as_str).unwrap_or(""))
    }

    /// `(header, cell)` pairs in header order, skipping unnamed columns
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        let cells = self.cells;
        let table = self.table;
        table.headers.iter().enumerate().filter_map(move |(i, header)| {
            if header.is_empty() || table.index.get(header) != Some(&i) {
                return None;
            }
            Some((header.as_str(), cells.get(i).map(String::as_str).unwrap_or("")))
        })
    }
}
