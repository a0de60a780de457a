//! Grid walk from parsed sheet rows to assignment records.
//!
//! Row 0 holds one week header per column. Every other row holds compact
//! cells for that week. Columns are walked in order and each column is read
//! top to bottom, so output order is column-major and deterministic.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cell;
use crate::csv::{self, Grid};
use crate::dates::DateTransliterator;
use crate::models::AssignmentRecord;

/// Which slot numbers become records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SlotFilter {
    All,
    /// Inclusive on both ends.
    Range { min: u32, max: u32 },
}

impl Default for SlotFilter {
    fn default() -> Self {
        SlotFilter::Range { min: 3, max: 7 }
    }
}

impl SlotFilter {
    pub fn accepts(&self, slot: u32) -> bool {
        match *self {
            SlotFilter::All => true,
            SlotFilter::Range { min, max } => (min..=max).contains(&slot),
        }
    }
}

/// Extract records with an arbitrary slot predicate and default date style.
pub fn extract(grid: &Grid, slot_filter: impl Fn(u32) -> bool) -> Vec<AssignmentRecord> {
    extract_with(grid, &DateTransliterator::default(), slot_filter)
}

fn extract_with(
    grid: &Grid,
    dates: &DateTransliterator,
    slot_filter: impl Fn(u32) -> bool,
) -> Vec<AssignmentRecord> {
    let Some(header_row) = grid.first() else {
        return Vec::new();
    };

    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (col, header) in header_row.iter().enumerate() {
        if header.trim().is_empty() {
            continue;
        }
        let localized_date = dates.transliterate(header);

        for row in 1..grid.len() {
            let text = csv::cell(grid, row, col);
            if text.trim().is_empty() {
                continue;
            }
            let Some(fragment) = cell::decode(text) else {
                skipped += 1;
                continue;
            };
            if !slot_filter(fragment.slot_number) {
                skipped += 1;
                continue;
            }
            records.push(AssignmentRecord::from_fragment(
                header,
                localized_date.clone(),
                fragment,
            ));
        }
    }

    debug!(records = records.len(), skipped, "Extracted assignments");
    records
}

/// Extractor configured with a slot filter and a date style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extractor {
    pub slot_filter: SlotFilter,
    pub dates: DateTransliterator,
}

impl Extractor {
    pub fn new(slot_filter: SlotFilter, dates: DateTransliterator) -> Self {
        Self { slot_filter, dates }
    }

    pub fn extract(&self, grid: &Grid) -> Vec<AssignmentRecord> {
        let filter = self.slot_filter;
        extract_with(grid, &self.dates, move |slot| filter.accepts(slot))
    }
}
