//! FILENAME: app/src/api_types.rs
// PURPOSE: Request/response types for the command layer.
// CONTEXT: All structs use camelCase serialization; responses are printed as JSON.

use serde::{Deserialize, Serialize};

use corpus::IdNamespace;
use pivot_engine::{ChartSeries, SortDirection, TableView, ViewOptions};

/// What is currently loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub namespace: IdNamespace,
    pub document_count: usize,
    /// Documents addressable in the current namespace.
    pub indexed_count: usize,
    pub wordbag_names: Vec<String>,
    pub has_result: bool,
    /// Documents in the evaluation result.
    pub evaluated_count: usize,
    /// Unified log file of this run, if one is open.
    pub log_file: Option<String>,
}

/// Partial update of the view options. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewOptionsUpdate {
    pub sort_key: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub total_threshold: Option<f64>,
    pub pivot_by_year: Option<bool>,
    pub year_bin_size: Option<f64>,
    pub show_percent: Option<bool>,
    pub page_size: Option<usize>,
    pub page_index: Option<usize>,
    /// Replaces the hidden chart series.
    pub hidden_series: Option<Vec<String>>,
}

impl ViewOptionsUpdate {
    pub fn apply(&self, options: &ViewOptions) -> ViewOptions {
        let mut next = options.clone();
        if let Some(key) = &self.sort_key {
            next.sort_key = pivot_engine::SortKey::new(key.clone());
            // a new key starts in its natural direction unless told otherwise
            if key.as_str() != options.sort_key.as_str() && self.sort_dir.is_none() {
                next.sort_dir = next.sort_key.default_direction();
            }
        }
        if let Some(dir) = self.sort_dir {
            next.sort_dir = dir;
        }
        if let Some(threshold) = self.total_threshold {
            next.total_threshold = threshold;
        }
        if let Some(pivot) = self.pivot_by_year {
            next.pivot_by_year = pivot;
        }
        if let Some(size) = self.year_bin_size {
            next.year_bin_size = size;
        }
        if let Some(percent) = self.show_percent {
            next.show_percent = percent;
        }
        if let Some(size) = self.page_size {
            next.page_size = size;
        }
        if let Some(index) = self.page_index {
            next.page_index = index;
        }
        if let Some(hidden) = &self.hidden_series {
            next.hidden_series = hidden.iter().cloned().collect();
        }
        next
    }
}

/// A derived table together with the options that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse {
    pub options: ViewOptions,
    pub view: TableView,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub options: ViewOptions,
    pub chart: ChartSeries,
}
