//! FILENAME: core/corpus/src/year_bin.rs
//! PURPOSE: Year bins used as pivot columns.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort position of the Unknown bin: below any real year.
pub const UNKNOWN_YEAR_SENTINEL: i64 = i64::MIN;

/// A (possibly multi-year) bucket a publication year is mapped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearBin {
    /// Years `start ..= start + size - 1`.
    Range { start: i64, size: u32 },
    /// Missing or non-numeric year.
    Unknown,
}

impl YearBin {
    /// Bins `year` into a bucket of `size` years aligned to multiples of
    /// `size` (1994 with size 10 -> 1990-1999). A size of 0 is treated as 1.
    pub fn for_year(year: Option<i64>, size: u32) -> YearBin {
        let size = size.max(1);
        match year {
            Some(y) => YearBin::Range {
                start: y.div_euclid(size as i64) * size as i64,
                size,
            },
            None => YearBin::Unknown,
        }
    }

    /// Display label: the literal year for single-year bins, "start-end"
    /// otherwise, "Unknown" for the unknown bin.
    pub fn label(&self) -> String {
        match *self {
            YearBin::Range { start, size: 1 } => start.to_string(),
            YearBin::Range { start, size } => {
                format!("{}-{}", start, start.saturating_add(size as i64 - 1))
            }
            YearBin::Unknown => "Unknown".to_string(),
        }
    }

    /// Chronological sort position (bin start, or the sentinel).
    pub fn sort_key(&self) -> i64 {
        match *self {
            YearBin::Range { start, .. } => start,
            YearBin::Unknown => UNKNOWN_YEAR_SENTINEL,
        }
    }

}

impl Ord for YearBin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.label().cmp(&other.label()))
    }
}

impl PartialOrd for YearBin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
