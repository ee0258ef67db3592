//! FILENAME: core/pivot-engine/src/page.rs
//! Threshold filtering and paging of sorted rows.

use crate::view::{PageInfo, TableRow};

/// Drops rows whose total is below `threshold`. A threshold `<= 0` keeps
/// every row, including all-zero rows. Order is preserved.
pub fn apply_threshold(rows: Vec<TableRow>, threshold: f64) -> Vec<TableRow> {
    if !(threshold > 0.0) {
        return rows;
    }
    rows.into_iter().filter(|r| r.total >= threshold).collect()
}

/// Number of pages for `row_count` rows. A page size of 0 is one page.
pub fn page_count(row_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    row_count.div_ceil(page_size)
}

/// Snaps a page index into `[0, page_count - 1]`.
pub fn clamp_page_index(page_index: usize, row_count: usize, page_size: usize) -> usize {
    let pages = page_count(row_count, page_size);
    page_index.min(pages.saturating_sub(1))
}

/// Cuts page `page_index` out of `rows`. A page past the end is empty.
pub fn paginate(rows: Vec<TableRow>, page_size: usize, page_index: usize) -> (Vec<TableRow>, PageInfo) {
    let info = PageInfo {
        page_index,
        page_size,
        page_count: page_count(rows.len(), page_size),
    };

    if page_size == 0 {
        return (rows, info);
    }

    let start = page_index.saturating_mul(page_size);
    if start >= rows.len() {
        return (Vec::new(), info);
    }
    let end = (start + page_size).min(rows.len());
    let page = rows.into_iter().skip(start).take(end - start).collect();
    (page, info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn rows(totals: &[f64]) -> Vec<TableRow> {
        totals
            .iter()
            .enumerate()
            .map(|(i, t)| TableRow::new(format!("r{}", i), BTreeMap::from([("n".to_string(), *t)]), None))
            .collect()
    }

    #[test]
    fn test_threshold_disabled_keeps_zero_rows() {
        assert_eq!(apply_threshold(rows(&[0.0, 3.0]), 0.0).len(), 2);
        assert_eq!(apply_threshold(rows(&[0.0, 3.0]), -1.0).len(), 2);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let kept = apply_threshold(rows(&[3.0, 5.0, 4.0]), 4.0);
        let ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[test]
    fn test_paginate() {
        let (page, info) = paginate(rows(&[1.0; 5]), 2, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "r4");
        assert_eq!(info.page_count, 3);
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let (page, info) = paginate(rows(&[1.0; 5]), 2, 3);
        assert!(page.is_empty());
        assert_eq!(info.page_index, 3);
        assert_eq!(clamp_page_index(3, 5, 2), 2);
    }

    #[test]
    fn test_page_size_zero_shows_all() {
        let (page, info) = paginate(rows(&[1.0; 5]), 0, 4);
        assert_eq!(page.len(), 5);
        assert_eq!(info.page_count, 1);
    }

    #[test]
    fn test_clamp_on_empty() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(clamp_page_index(7, 0, 10), 0);
    }
}
