//! Grid coordinates and boundary checks.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in the physical grid, 0-indexed.
///
/// [`Coordinate::NONE`] (`{-1, -1}`) is the "nothing selected" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub row_index: i32,
    pub col_index: i32,
}

impl Coordinate {
    /// No selection.
    pub const NONE: Coordinate = Coordinate {
        row_index: -1,
        col_index: -1,
    };

    #[must_use]
    pub const fn new(row_index: i32, col_index: i32) -> Self {
        Self {
            row_index,
            col_index,
        }
    }

    /// True for the `{-1, -1}` sentinel.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// True when both axes are non-negative.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.row_index >= 0 && self.col_index >= 0
    }

    /// Row as a slice index, if non-negative.
    #[must_use]
    pub fn row(&self) -> Option<usize> {
        usize::try_from(self.row_index).ok()
    }

    #[must_use]
    pub fn with_row(self, row_index: i32) -> Self {
        Self { row_index, ..self }
    }

    #[must_use]
    pub fn with_col(self, col_index: i32) -> Self {
        Self { col_index, ..self }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row_index, self.col_index)
    }
}

/// True iff `index` lies outside the inclusive range `[min, max]`.
#[must_use]
pub fn is_index_out_of_boundaries(index: i32, min: i32, max: i32) -> bool {
    index < min || index > max
}

/// Convert a length or slice index to the signed coordinate space.
///
/// Saturates at `i32::MAX`; grids that large are not renderable anyway.
#[must_use]
pub fn to_index(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Largest valid index for `len` items (`-1` when empty).
#[must_use]
pub fn last_index(len: usize) -> i32 {
    to_index(len).saturating_sub(1)
}
