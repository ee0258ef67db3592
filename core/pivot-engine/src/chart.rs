//! FILENAME: core/pivot-engine/src/chart.rs
//! Line chart series for a pivoted table.

use std::collections::BTreeSet;

use crate::definition::{TableMode, CHART_SERIES_LIMIT};
use crate::view::{percent_of, ChartSeries, Series, TableView};

/// Picks the highest-total visible word-groups of a pivoted view and lays
/// out one value per year column.
///
/// Ranking runs over the view's (already filtered) rows by total, highest
/// first; hidden word-groups are then skipped and at most
/// `CHART_SERIES_LIMIT` are kept. Values are percentages of the year totals
/// when `percent` is set, matching the table's percent columns.
pub fn extract_chart(view: &TableView, hidden: &BTreeSet<String>, percent: bool) -> ChartSeries {
    if view.mode != TableMode::ByYear {
        return ChartSeries::default();
    }

    let years = view.year_labels();

    let mut ranked: Vec<_> = view.rows.iter().collect();
    ranked.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    let series: Vec<Series> = ranked
        .into_iter()
        .filter(|row| !hidden.contains(&row.id))
        .take(CHART_SERIES_LIMIT)
        .map(|row| Series {
            id: row.id.clone(),
            values: years
                .iter()
                .map(|year| {
                    let count = row.value(year);
                    if percent {
                        let total = view
                            .year_totals
                            .as_ref()
                            .and_then(|t| t.get(year))
                            .copied()
                            .unwrap_or(0.0);
                        percent_of(count, total)
                    } else {
                        count
                    }
                })
                .collect(),
        })
        .collect();

    let max_value = series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);

    ChartSeries { years, series, max_value, percent }
}
