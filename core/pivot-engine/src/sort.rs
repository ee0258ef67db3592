//! FILENAME: core/pivot-engine/src/sort.rs
//! Row ordering for a built table.
//!
//! A sort key is resolved against the table's mode and columns into a
//! `SortTarget`, each row is reduced to one comparable key, and the rows are
//! stably sorted on it. Keys that resolve to nothing leave the order alone.

use std::cmp::Ordering;

use corpus::year_bin::UNKNOWN_YEAR_SENTINEL;
use corpus::{CollationKey, MetadataIndex};

use crate::definition::{SortDirection, SortKey, TableMode, COUNT_SUFFIX, PERCENT_SUFFIX};
use crate::view::{percent_of, BuiltTable, ColumnKind, TableRow};

/// What a sort key addresses in a given table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortTarget {
    /// The row id (document id or word-group name).
    Identity,
    Total,
    Title,
    Authors,
    Year,
    /// A count column; holds the `TableRow::values` key.
    Count(String),
    /// A percent column; holds the year bin label.
    Percent(String),
    Unsorted,
}

/// Resolves `key` for `table`, in precedence order: identity, total,
/// title/authors, year, dynamic columns.
pub fn resolve_sort_target(key: &SortKey, table: &BuiltTable) -> SortTarget {
    let key = key.as_str();
    let by_document = table.mode == TableMode::ByDocument;

    let is_identity = match table.mode {
        TableMode::ByYear => key == SortKey::ROW,
        TableMode::ByDocument => key == SortKey::DHLABID || key == SortKey::URN,
    };
    if is_identity {
        return SortTarget::Identity;
    }
    if key == SortKey::TOTAL {
        return SortTarget::Total;
    }
    if by_document {
        match key {
            SortKey::TITLE => return SortTarget::Title,
            SortKey::AUTHORS => return SortTarget::Authors,
            SortKey::YEAR => return SortTarget::Year,
            _ => {}
        }
    }

    if let Some(column) = table.columns.iter().find(|c| c.key == key) {
        return match column.kind {
            ColumnKind::Count => SortTarget::Count(column.value_key().to_string()),
            ColumnKind::Percent => SortTarget::Percent(column.value_key().to_string()),
        };
    }

    // A bare year label addresses its count column.
    if !by_document && !key.ends_with(COUNT_SUFFIX) && !key.ends_with(PERCENT_SUFFIX) {
        if let Some(column) = table
            .columns
            .iter()
            .find(|c| c.kind == ColumnKind::Count && c.year.as_deref() == Some(key))
        {
            return SortTarget::Count(column.value_key().to_string());
        }
    }

    SortTarget::Unsorted
}

/// Comparable reduction of one row for one target.
#[derive(Debug, Clone)]
enum RowKey {
    Text(CollationKey),
    Number(f64),
    Integer(i64),
}

impl RowKey {
    fn compare(&self, other: &RowKey) -> Ordering {
        match (self, other) {
            (RowKey::Text(a), RowKey::Text(b)) => a.cmp(b),
            (RowKey::Number(a), RowKey::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (RowKey::Integer(a), RowKey::Integer(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

fn row_key(target: &SortTarget, row: &TableRow, table: &BuiltTable, meta: &MetadataIndex) -> RowKey {
    match target {
        SortTarget::Identity => RowKey::Text(CollationKey::new(&row.id)),
        SortTarget::Total => RowKey::Number(row.total),
        SortTarget::Title => {
            let title = meta.lookup(&row.id).and_then(|m| m.title.as_deref()).unwrap_or("");
            RowKey::Text(CollationKey::new(title))
        }
        SortTarget::Authors => {
            let authors = meta.lookup(&row.id).and_then(|m| m.authors.as_deref()).unwrap_or("");
            RowKey::Text(CollationKey::new(authors))
        }
        SortTarget::Year => RowKey::Integer(
            meta.lookup(&row.id)
                .and_then(|m| m.year_value())
                .unwrap_or(UNKNOWN_YEAR_SENTINEL),
        ),
        SortTarget::Count(key) => RowKey::Number(row.value(key)),
        SortTarget::Percent(year) => RowKey::Number(percent_of(row.value(year), table.year_total(year))),
        SortTarget::Unsorted => RowKey::Integer(0),
    }
}

/// Stably sorts `table.rows` by `key` in `direction`.
pub fn sort_rows(table: &mut BuiltTable, meta: &MetadataIndex, key: &SortKey, direction: SortDirection) {
    let target = resolve_sort_target(key, table);
    if target == SortTarget::Unsorted {
        log::debug!("sort key '{}' matches no column, keeping order", key.as_str());
        return;
    }

    let rows = std::mem::take(&mut table.rows);
    let mut keyed: Vec<(RowKey, TableRow)> = rows
        .into_iter()
        .map(|row| (row_key(&target, &row, table, meta), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| direction.apply(a.compare(b)));
    table.rows = keyed.into_iter().map(|(_, row)| row).collect();
}
