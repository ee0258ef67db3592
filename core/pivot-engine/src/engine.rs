//! FILENAME: core/pivot-engine/src/engine.rs
//! Table Engine - The calculation core that turns evaluation counts into a
//! renderable view.
//!
//! This module takes an EvaluationResult (data), a MetadataIndex (display
//! metadata) and ViewOptions (configuration) and produces a TableView.
//!
//! Algorithm:
//! 1. Derive the topic universe (union of word-group names)
//! 2. Build rows: one per document, or one per word-group pivoted by year bin
//! 3. Sort rows for the requested key and direction
//! 4. Drop rows below the total threshold
//! 5. Slice the document table into a page

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use corpus::{EvaluationResult, MetadataIndex, YearBin};

use crate::definition::{TableMode, ViewOptions, COUNT_SUFFIX, PERCENT_SUFFIX};
use crate::page::{apply_threshold, paginate};
use crate::sort::sort_rows;
use crate::view::{
    BuiltTable, ColumnDef, ColumnKind, RowDisplay, TableRow, TableSummary, TableView,
};

// ============================================================================
// BY DOCUMENT
// ============================================================================

/// One row per document, one count column per word-group.
/// Word-groups a document does not report count as zero.
pub fn build_document_table(result: &EvaluationResult, meta: &MetadataIndex) -> BuiltTable {
    let topics = result.topic_universe();

    let rows: Vec<TableRow> = result
        .iter()
        .map(|(doc, counts)| {
            let values: BTreeMap<String, f64> = topics
                .iter()
                .map(|t| (t.clone(), counts.get(t).copied().unwrap_or(0) as f64))
                .collect();
            TableRow::new(doc.clone(), values, Some(row_display(meta, doc)))
        })
        .collect();

    let columns = topics.iter().map(|t| ColumnDef::count(t.clone(), t.clone())).collect();

    BuiltTable {
        mode: TableMode::ByDocument,
        rows,
        columns,
        year_totals: None,
        dropped_documents: 0,
    }
}

/// Display strings for a document; empty placeholders when the metadata
/// lookup misses.
fn row_display(meta: &MetadataIndex, doc: &str) -> RowDisplay {
    match meta.lookup(doc) {
        Some(m) => RowDisplay {
            title: m.title.clone().unwrap_or_default(),
            authors: m.authors.clone().unwrap_or_default(),
            year: m.year.clone().unwrap_or_default(),
        },
        None => RowDisplay::default(),
    }
}

// ============================================================================
// PIVOT BY YEAR
// ============================================================================

/// One row per word-group, one column per year bin in chronological order.
///
/// Documents without a usable year are left out entirely and counted in
/// `dropped_documents`. Each bin also accumulates the sum of all counts in
/// it, the denominator of the percent columns.
pub fn build_year_pivot(
    result: &EvaluationResult,
    meta: &MetadataIndex,
    bin_size: u32,
    show_percent: bool,
) -> BuiltTable {
    let topics = result.topic_universe();
    let row_index: FxHashMap<&str, usize> =
        topics.iter().enumerate().map(|(i, t)| (t.as_str(), i)).collect();

    let mut values: Vec<FxHashMap<YearBin, f64>> = vec![FxHashMap::default(); topics.len()];
    let mut year_totals: FxHashMap<YearBin, f64> = FxHashMap::default();
    let mut dropped = 0usize;

    for (doc, counts) in result.iter() {
        let Some(year) = meta.lookup(doc).and_then(|m| m.year_value()) else {
            dropped += 1;
            continue;
        };
        let bin = YearBin::for_year(Some(year), bin_size);
        let bin_total = year_totals.entry(bin).or_insert(0.0);

        for (topic, &count) in counts {
            let count = count as f64;
            *bin_total += count;
            if let Some(&idx) = row_index.get(topic.as_str()) {
                *values[idx].entry(bin).or_insert(0.0) += count;
            }
        }
    }

    if dropped > 0 {
        log::debug!("year pivot: {} documents without a usable year left out", dropped);
    }

    let mut bins: Vec<YearBin> = year_totals.keys().copied().collect();
    bins.sort();
    let labels: Vec<String> = bins.iter().map(YearBin::label).collect();

    let rows: Vec<TableRow> = topics
        .iter()
        .zip(values)
        .map(|(topic, per_bin)| {
            let row_values: BTreeMap<String, f64> = bins
                .iter()
                .zip(&labels)
                .map(|(bin, label)| (label.clone(), per_bin.get(bin).copied().unwrap_or(0.0)))
                .collect();
            TableRow::new(topic.clone(), row_values, None)
        })
        .collect();

    let mut columns = Vec::with_capacity(labels.len() * if show_percent { 2 } else { 1 });
    for label in &labels {
        columns.push(ColumnDef {
            key: format!("{}{}", label, COUNT_SUFFIX),
            label: label.clone(),
            kind: ColumnKind::Count,
            year: Some(label.clone()),
        });
        if show_percent {
            columns.push(ColumnDef {
                key: format!("{}{}", label, PERCENT_SUFFIX),
                label: format!("{} %", label),
                kind: ColumnKind::Percent,
                year: Some(label.clone()),
            });
        }
    }

    let year_totals: BTreeMap<String, f64> = bins
        .iter()
        .zip(&labels)
        .map(|(bin, label)| (label.clone(), year_totals[bin]))
        .collect();

    BuiltTable {
        mode: TableMode::ByYear,
        rows,
        columns,
        year_totals: Some(year_totals),
        dropped_documents: dropped,
    }
}

/// Builds the unsorted table for the options' mode.
pub fn build_table(result: &EvaluationResult, meta: &MetadataIndex, options: &ViewOptions) -> BuiltTable {
    match options.mode() {
        TableMode::ByDocument => build_document_table(result, meta),
        TableMode::ByYear => build_year_pivot(result, meta, options.bin_size(), options.show_percent),
    }
}

// ============================================================================
// FULL DERIVATION
// ============================================================================

/// Derives the renderable table: build, sort, filter, then page (document
/// mode only). Never fails; degraded input yields a degraded table.
pub fn derive_view(result: &EvaluationResult, meta: &MetadataIndex, options: &ViewOptions) -> TableView {
    let mut table = build_table(result, meta, options);
    let built_row_count = table.rows.len();

    sort_rows(&mut table, meta, &options.sort_key, options.sort_dir);

    let rows = apply_threshold(std::mem::take(&mut table.rows), options.total_threshold);
    let total_row_count = rows.len();

    let (rows, page) = match table.mode {
        TableMode::ByDocument => {
            let (rows, page) = paginate(rows, options.page_size, options.page_index);
            (rows, Some(page))
        }
        TableMode::ByYear => (rows, None),
    };

    let summary = TableSummary {
        document_count: result.len(),
        topic_count: result.topic_universe().len(),
        grand_total: result.grand_total() as f64,
        dropped_documents: table.dropped_documents,
        built_row_count,
        filtered_row_count: total_row_count,
    };

    log::debug!(
        "derived {:?} table: {} built, {} after threshold {}, {} shown",
        table.mode,
        built_row_count,
        total_row_count,
        options.total_threshold,
        rows.len()
    );

    TableView {
        mode: table.mode,
        rows,
        columns: table.columns,
        total_row_count,
        year_totals: table.year_totals,
        page,
        summary,
    }
}
