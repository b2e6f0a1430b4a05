//! Category × quarter pivot of announcement records.
//!
//! ```text
//!                 Q3 FY2024   Q4 FY2024   Q1 FY2025
//! Results         [pdf]       [pdf, pdf]  [pdf]
//! Presentation    [pdf]       []          [pdf]
//! Transcript      []          [pdf]       []
//! ```
//!
//! Rows are config names in the order they first appear in the config list (never
//! alphabetical), columns are quarter labels in fiscal order, and each cell lists the
//! `(link, headline)` pairs of the matching records in fetch order.

use std::collections::{HashMap, HashSet};

use super::options::FilterConfig;
use super::quarter::label_sort_key;
use super::record::AnnouncementRecord;

static EMPTY_CELL: PivotCell = PivotCell {
    links: Vec::new(),
    headlines: Vec::new(),
};

/// Documents for one (config name, quarter) pair.
///
/// `links` and `headlines` are parallel: position `i` of each describes the same record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotCell {
    links: Vec<Option<String>>,
    headlines: Vec<String>,
}

impl PivotCell {
    fn push(&mut self, link: Option<String>, headline: String) {
        self.links.push(link);
        self.headlines.push(headline);
    }

    pub fn links(&self) -> &[Option<String>] {
        &self.links
    }

    pub fn headlines(&self) -> &[String] {
        &self.headlines
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// `(link, headline)` pairs in fetch order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &str)> {
        self.links
            .iter()
            .map(Option::as_deref)
            .zip(self.headlines.iter().map(String::as_str))
    }

    /// Only the pairs that actually carry a document link.
    pub fn documents(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter()
            .filter_map(|(link, headline)| link.map(|l| (l, headline)))
    }
}

/// Lookup structure keyed by (config name, quarter label).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotTable {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: HashMap<(String, String), PivotCell>,
}

impl PivotTable {
    /// Config names, in config order.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Quarter labels, ascending by `(fiscal_year, quarter)`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell for `row` and `column`; empty when nothing matched.
    pub fn cell(&self, row: &str, column: &str) -> &PivotCell {
        self.cells
            .get(&(row.to_string(), column.to_string()))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Cells of one row, paired with their column label, in column order.
    pub fn row_cells<'a>(&'a self, row: &'a str) -> impl Iterator<Item = (&'a str, &'a PivotCell)> {
        self.columns
            .iter()
            .map(move |column| (column.as_str(), self.cell(row, column)))
    }
}

/// Reshapes fetched records into a [`PivotTable`].
///
/// Records whose config name is not in `configs` have no row and are ignored. Config
/// names without records produce no row. Pivoting the same input twice yields equal
/// tables.
pub fn pivot(records: &[AnnouncementRecord], configs: &[FilterConfig]) -> PivotTable {
    let mut config_order: Vec<&str> = Vec::new();
    for config in configs {
        if !config_order.contains(&config.name.as_str()) {
            config_order.push(config.name.as_str());
        }
    }
    let known: HashSet<&str> = config_order.iter().copied().collect();

    let mut cells: HashMap<(String, String), PivotCell> = HashMap::new();
    let mut present_rows: HashSet<&str> = HashSet::new();
    let mut columns: Vec<String> = Vec::new();

    for record in records {
        let name = record.config_name.as_str();
        if !known.contains(name) {
            tracing::debug!("Ignoring record for unknown config {:?}", name);
            continue;
        }

        let label = record.quarter_label();
        if !columns.contains(&label) {
            columns.push(label.clone());
        }
        present_rows.insert(name);

        cells
            .entry((name.to_string(), label))
            .or_default()
            .push(record.document_link.clone(), record.headline.clone());
    }

    columns.sort_by_key(|label| label_sort_key(label));

    let rows = config_order
        .into_iter()
        .filter(|name| present_rows.contains(name))
        .map(str::to_string)
        .collect();

    PivotTable {
        rows,
        columns,
        cells,
    }
}
