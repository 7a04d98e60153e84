//! Merged-cell layout engine.
//!
//! This module handles:
//! - Expanding a logical grid with row/column spans into a physical grid
//! - Buffering row-span continuations until their row is laid out

mod expander;
mod span_buffer;

pub use expander::{check_row_spans, expand_row, expand_rows};
pub use span_buffer::{SpanBuffer, SpanBufferEntry};

use crate::error::Result;
use crate::types::GridCell;

/// Expand a JSON logical matrix (`GridCell[][]`) into the physical matrix, as JSON.
///
/// # Errors
/// Returns an error if the input is not a valid cell matrix.
pub fn expand_layout_json(json: &str) -> Result<String> {
    let rows: Vec<Vec<GridCell>> = serde_json::from_str(json)?;
    Ok(serde_json::to_string(&expand_rows(&rows))?)
}
