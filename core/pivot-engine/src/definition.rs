//! FILENAME: core/pivot-engine/src/definition.rs
//! View Options - The serializable description of how to derive a table.
//!
//! This module contains all the types needed to DESCRIBE a table view.
//! These structures are designed to be:
//! - Serializable (sent from the front end as camelCase JSON)
//! - Immutable snapshots of user intent: a new value is built for every
//!   change and the whole table is derived again from it

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of document rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Maximum number of word-groups drawn in the chart.
pub const CHART_SERIES_LIMIT: usize = 5;

/// Suffix of year count column keys in pivoted mode ("1990-1999__count").
pub const COUNT_SUFFIX: &str = "__count";

/// Suffix of year percent column keys in pivoted mode ("1990-1999__percent").
pub const PERCENT_SUFFIX: &str = "__percent";

// ============================================================================
// TABLE MODE
// ============================================================================

/// Which way the table is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableMode {
    /// One row per document, one column per word-group.
    ByDocument,
    /// One row per word-group, one column per year bin.
    ByYear,
}

// ============================================================================
// SORTING
// ============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Applies the direction to an ascending comparison.
    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A sort key as sent by the front end: a fixed column name or a dynamic
/// column key (word-group name, or "label__count" / "label__percent").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortKey(String);

impl SortKey {
    /// Row identity column in pivoted mode.
    pub const ROW: &'static str = "row";
    /// Row identity column in document mode.
    pub const DHLABID: &'static str = "dhlabid";
    /// Row identity column in document mode for URN-keyed sessions.
    pub const URN: &'static str = "urn";
    pub const TOTAL: &'static str = "total";
    pub const TITLE: &'static str = "title";
    pub const AUTHORS: &'static str = "authors";
    pub const YEAR: &'static str = "year";

    pub fn new(key: impl Into<String>) -> Self {
        SortKey(key.into())
    }

    pub fn total() -> Self {
        SortKey::new(Self::TOTAL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Keys compared as text. Everything else is numeric.
    pub fn is_lexical(&self) -> bool {
        matches!(
            self.0.as_str(),
            Self::TITLE | Self::AUTHORS | Self::DHLABID | Self::URN | Self::ROW
        )
    }

    /// Lexical keys start ascending, numeric keys descending.
    pub fn default_direction(&self) -> SortDirection {
        if self.is_lexical() {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::total()
    }
}

impl From<&str> for SortKey {
    fn from(key: &str) -> Self {
        SortKey::new(key)
    }
}

// ============================================================================
// VIEW OPTIONS
// ============================================================================

/// Everything that controls how a table is derived from an evaluation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptions {
    pub sort_key: SortKey,

    pub sort_dir: SortDirection,

    /// Rows with a total below this are dropped. `<= 0` disables filtering.
    pub total_threshold: f64,

    /// Pivot to one row per word-group with one column per year bin.
    pub pivot_by_year: bool,

    /// Years per bin. Non-positive or fractional values are treated as 1.
    pub year_bin_size: f64,

    /// Add a percent column per year bin (pivoted mode only).
    pub show_percent: bool,

    /// Document rows per page. 0 shows all rows.
    pub page_size: usize,

    pub page_index: usize,

    /// Word-groups left out of the chart.
    pub hidden_series: BTreeSet<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            sort_key: SortKey::total(),
            sort_dir: SortDirection::Desc,
            total_threshold: 0.0,
            pivot_by_year: false,
            year_bin_size: 1.0,
            show_percent: false,
            page_size: DEFAULT_PAGE_SIZE,
            page_index: 0,
            hidden_series: BTreeSet::new(),
        }
    }
}

impl ViewOptions {
    pub fn mode(&self) -> TableMode {
        if self.pivot_by_year {
            TableMode::ByYear
        } else {
            TableMode::ByDocument
        }
    }

    /// The effective year bin size.
    pub fn bin_size(&self) -> u32 {
        coerce_bin_size(self.year_bin_size)
    }

    /// Selects a sort column the way a header click does: the same key flips
    /// direction, a new key starts in its default direction.
    pub fn select_sort(&self, key: SortKey) -> ViewOptions {
        let mut next = self.clone();
        if key == self.sort_key {
            next.sort_dir = self.sort_dir.flip();
        } else {
            next.sort_dir = key.default_direction();
            next.sort_key = key;
        }
        next
    }

    /// Toggles a word-group's visibility in the chart.
    pub fn toggle_series(&self, id: &str) -> ViewOptions {
        let mut next = self.clone();
        if !next.hidden_series.remove(id) {
            next.hidden_series.insert(id.to_string());
        }
        next
    }
}

/// Coerces a requested bin size to a positive integer.
pub fn coerce_bin_size(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 || raw.fract() != 0.0 || raw > u32::MAX as f64 {
        1
    } else {
        raw as u32
    }
}
