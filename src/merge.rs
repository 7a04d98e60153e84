//! Merge-region lookup.
//!
//! Regions are kept as descriptors and resolved by containment, so lookup cost
//! depends on the number of regions and not on how many positions they cover.

use crate::coords::{to_index, Coordinate};
use crate::error::{GridError, Result};
use crate::types::MergedCell;

/// Information about one position inside a merge region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeInfo {
    /// True if this position is the region's top-left anchor
    pub is_origin: bool,
    /// Anchor of the region
    pub origin: Coordinate,
    /// Number of rows in the region
    pub row_span: i32,
    /// Number of columns in the region
    pub col_span: i32,
}

/// Lookup table built from a list of [`MergedCell`] descriptors.
#[derive(Debug, Clone, Default)]
pub struct MergeIndex {
    regions: Vec<MergedCell>,
}

impl MergeIndex {
    /// Index `merges` without validation. Later regions win where two overlap.
    #[must_use]
    pub fn new(merges: &[MergedCell]) -> Self {
        Self {
            regions: merges.to_vec(),
        }
    }

    /// Index `merges`, rejecting regions that leave the column range, are
    /// anchored at negative positions, or overlap another region.
    ///
    /// # Errors
    /// Returns the first offending region as a configuration error.
    pub fn validated(merges: &[MergedCell], columns: usize) -> Result<Self> {
        for (i, merge) in merges.iter().enumerate() {
            if !merge.anchor().is_positive() {
                return Err(GridError::MergeOutOfBounds {
                    row_index: merge.row_index,
                    col_index: merge.col_index,
                    reason: "anchor is negative".into(),
                });
            }
            let end = merge.col_index.saturating_add(merge.cols_spanned());
            if end > to_index(columns) {
                return Err(GridError::SpanExceedsColumns {
                    col_index: merge.col_index,
                    span: merge.cols_spanned(),
                    columns,
                });
            }
            if let Some(other) = merges.iter().take(i).find(|m| overlaps(m, merge)) {
                return Err(GridError::MergeOutOfBounds {
                    row_index: merge.row_index,
                    col_index: merge.col_index,
                    reason: format!("overlaps region anchored at {}", other.anchor()),
                });
            }
        }
        Ok(Self::new(merges))
    }

    fn region_at(&self, coords: Coordinate) -> Option<&MergedCell> {
        self.regions.iter().rev().find(|m| m.contains(coords))
    }

    /// True if `coords` lies inside a region but is not its anchor.
    #[must_use]
    pub fn is_merged(&self, coords: Coordinate) -> bool {
        self.get_merge_parent_coords(coords).is_some()
    }

    /// Anchor of the region containing `coords`, or `None` if not merged.
    #[must_use]
    pub fn get_merge_parent_coords(&self, coords: Coordinate) -> Option<Coordinate> {
        self.region_at(coords)
            .map(MergedCell::anchor)
            .filter(|origin| *origin != coords)
    }

    /// Merge information for any covered position, anchors included.
    #[must_use]
    pub fn info(&self, coords: Coordinate) -> Option<MergeInfo> {
        self.region_at(coords).map(|m| MergeInfo {
            is_origin: m.anchor() == coords,
            origin: m.anchor(),
            row_span: m.rows_spanned(),
            col_span: m.cols_spanned(),
        })
    }

    fn anchored_at(&self, coords: Coordinate) -> Option<&MergedCell> {
        self.region_at(coords).filter(|m| m.anchor() == coords)
    }

    /// Rows spanned by the region anchored at `coords`, `1` otherwise.
    #[must_use]
    pub fn row_span_at(&self, coords: Coordinate) -> i32 {
        self.anchored_at(coords).map_or(1, MergedCell::rows_spanned)
    }

    /// Columns spanned by the region anchored at `coords`, `1` otherwise.
    #[must_use]
    pub fn col_span_at(&self, coords: Coordinate) -> i32 {
        self.anchored_at(coords).map_or(1, MergedCell::cols_spanned)
    }

    #[must_use]
    pub fn regions(&self) -> &[MergedCell] {
        &self.regions
    }
}

fn overlaps(a: &MergedCell, b: &MergedCell) -> bool {
    let a_rows = a.row_index..a.row_index.saturating_add(a.rows_spanned());
    let a_cols = a.col_index..a.col_index.saturating_add(a.cols_spanned());
    let b_rows_end = b.row_index.saturating_add(b.rows_spanned());
    let b_cols_end = b.col_index.saturating_add(b.cols_spanned());
    a_rows.start < b_rows_end
        && b.row_index < a_rows.end
        && a_cols.start < b_cols_end
        && b.col_index < a_cols.end
}
