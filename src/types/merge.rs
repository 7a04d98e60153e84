use serde::{Deserialize, Serialize};

use crate::coords::Coordinate;

/// A declared merge region, anchored at its top-left position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedCell {
    pub row_index: i32,
    pub col_index: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<i32>,
}

impl MergedCell {
    #[must_use]
    pub fn new(row_index: i32, col_index: i32, row_span: i32, col_span: i32) -> Self {
        Self {
            row_index,
            col_index,
            row_span: Some(row_span),
            col_span: Some(col_span),
        }
    }

    #[must_use]
    pub fn anchor(&self) -> Coordinate {
        Coordinate::new(self.row_index, self.col_index)
    }

    #[must_use]
    pub fn rows_spanned(&self) -> i32 {
        self.row_span.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn cols_spanned(&self) -> i32 {
        self.col_span.unwrap_or(1).max(1)
    }

    /// True if `coords` falls anywhere inside the region, anchor included.
    #[must_use]
    pub fn contains(&self, coords: Coordinate) -> bool {
        coords.row_index >= self.row_index
            && coords.row_index < self.row_index.saturating_add(self.rows_spanned())
            && coords.col_index >= self.col_index
            && coords.col_index < self.col_index.saturating_add(self.cols_spanned())
    }
}
