//! FILENAME: core/pivot-engine/src/view.rs
//! Table View - Renderable output for the front end.
//!
//! Everything in here is derived: rebuilt from scratch on every change to
//! the evaluation result, the metadata or the view options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::definition::TableMode;

// ============================================================================
// ROWS AND COLUMNS
// ============================================================================

/// Display strings for a document row. Empty when metadata is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDisplay {
    pub title: String,
    pub authors: String,
    pub year: String,
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// A DocumentId in document mode, a word-group name in pivoted mode.
    pub id: String,

    /// Column value key -> count. In pivoted mode the value key is the year
    /// bin label; percent columns are computed, never stored.
    pub values: BTreeMap<String, f64>,

    /// Sum of `values`, computed once when the row is built.
    pub total: f64,

    /// Title/authors/year in document mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<RowDisplay>,
}

impl TableRow {
    /// Builds a row and caches its total.
    pub fn new(id: String, values: BTreeMap<String, f64>, display: Option<RowDisplay>) -> Self {
        let total = values.values().sum();
        TableRow { id, values, total, display }
    }

    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

/// What a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Count,
    Percent,
}

/// A dynamic column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Unique key; also the sort key for this column.
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
    /// Year bin label in pivoted mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl ColumnDef {
    pub fn count(key: impl Into<String>, label: impl Into<String>) -> Self {
        ColumnDef { key: key.into(), label: label.into(), kind: ColumnKind::Count, year: None }
    }

    /// The key this column reads from `TableRow::values`.
    pub fn value_key(&self) -> &str {
        self.year.as_deref().unwrap_or(&self.key)
    }
}

/// `100 * count / denominator`, or 0 when the denominator is 0.
pub fn percent_of(count: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        100.0 * count / denominator
    }
}

// ============================================================================
// BUILT TABLE
// ============================================================================

/// Output of the row/column builders, before sorting and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltTable {
    pub mode: TableMode,
    pub rows: Vec<TableRow>,
    pub columns: Vec<ColumnDef>,
    /// Year bin label -> sum of all counts in that bin (pivoted mode).
    pub year_totals: Option<BTreeMap<String, f64>>,
    /// Documents left out of the pivot because they have no usable year.
    pub dropped_documents: usize,
}

impl BuiltTable {
    pub fn year_total(&self, year: &str) -> f64 {
        self.year_totals
            .as_ref()
            .and_then(|t| t.get(year))
            .copied()
            .unwrap_or(0.0)
    }

    /// The displayed value of `row` in `column`.
    pub fn cell_value(&self, row: &TableRow, column: &ColumnDef) -> f64 {
        cell_value(self.year_totals.as_ref(), row, column)
    }
}

pub(crate) fn cell_value(
    year_totals: Option<&BTreeMap<String, f64>>,
    row: &TableRow,
    column: &ColumnDef,
) -> f64 {
    let count = row.value(column.value_key());
    match column.kind {
        ColumnKind::Count => count,
        ColumnKind::Percent => {
            let denominator = year_totals
                .and_then(|t| t.get(column.value_key()))
                .copied()
                .unwrap_or(0.0);
            percent_of(count, denominator)
        }
    }
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// Paging state of a document table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page_index: usize,
    /// 0 means all rows on one page.
    pub page_size: usize,
    pub page_count: usize,
}

/// Summary statistics over the whole derivation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub document_count: usize,
    pub topic_count: usize,
    /// Sum of every count in the evaluation result.
    pub grand_total: f64,
    pub dropped_documents: usize,
    /// Rows before the threshold filter.
    pub built_row_count: usize,
    /// Rows after the threshold filter.
    pub filtered_row_count: usize,
}

/// The table handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub mode: TableMode,
    /// The visible rows: one page in document mode, all rows when pivoted.
    pub rows: Vec<TableRow>,
    pub columns: Vec<ColumnDef>,
    /// Rows after filtering, before paging.
    pub total_row_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_totals: Option<BTreeMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
    pub summary: TableSummary,
}

impl TableView {
    /// The displayed value of `row` in `column`.
    pub fn cell_value(&self, row: &TableRow, column: &ColumnDef) -> f64 {
        cell_value(self.year_totals.as_ref(), row, column)
    }

    /// The year bin labels of a pivoted table, in column order.
    pub fn year_labels(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Count)
            .filter_map(|c| c.year.clone())
            .collect()
    }
}

// ============================================================================
// CHART
// ============================================================================

/// One line in the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    /// One value per year label.
    pub values: Vec<f64>,
}

/// Line chart data for a pivoted table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub years: Vec<String>,
    pub series: Vec<Series>,
    pub max_value: f64,
    /// Whether `values` are percentages of the year totals.
    pub percent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_total_is_cached_sum() {
        let values = BTreeMap::from([("a".to_string(), 2.0), ("b".to_string(), 5.0)]);
        let row = TableRow::new("doc".to_string(), values, None);
        assert_eq!(row.total, 7.0);
        assert_eq!(row.value("missing"), 0.0);
    }

    #[test]
    fn test_percent_of_zero_denominator() {
        assert_eq!(percent_of(5.0, 0.0), 0.0);
        assert_eq!(percent_of(0.0, 0.0), 0.0);
        assert_eq!(percent_of(3.0, 3.0), 100.0);
    }

    #[test]
    fn test_percent_cell_reads_year_total() {
        let table = BuiltTable {
            mode: TableMode::ByYear,
            rows: Vec::new(),
            columns: Vec::new(),
            year_totals: Some(BTreeMap::from([("1990".to_string(), 8.0)])),
            dropped_documents: 0,
        };
        let row = TableRow::new("nature".to_string(), BTreeMap::from([("1990".to_string(), 2.0)]), None);
        let column = ColumnDef {
            key: "1990__percent".to_string(),
            label: "1990 %".to_string(),
            kind: ColumnKind::Percent,
            year: Some("1990".to_string()),
        };
        assert_eq!(table.cell_value(&row, &column), 25.0);
    }
}
