//! Logical-to-physical grid expansion.
//!
//! Every cell that declares a span is followed (column span) or continued in
//! later rows (row span) by dummy placeholders, so every physical row lines up
//! position by position.

use super::span_buffer::{SpanBuffer, SpanBufferEntry};
use crate::coords::to_index;
use crate::error::{GridError, Result};
use crate::types::{DummyFor, GridCell};

/// Expand a logical matrix into the physical matrix handed to rendering.
#[must_use]
pub fn expand_rows(rows: &[Vec<GridCell>]) -> Vec<Vec<GridCell>> {
    let mut buffer = SpanBuffer::new();
    rows.iter()
        .map(|row| expand_row(row, &mut buffer))
        .collect()
}

/// Expand one logical row, consuming and feeding `buffer`.
pub fn expand_row(row: &[GridCell], buffer: &mut SpanBuffer) -> Vec<GridCell> {
    let mut out = Vec::with_capacity(row.len());
    let mut final_cell_index: usize = 0;
    let mut last_row_span_index: Option<usize> = None;
    let mut previous_spans_rows = false;

    for cell in row {
        let emitted_before = out.len();

        // Continuations of row spans opened in earlier rows.
        out.extend(buffer.extract(final_cell_index));

        if cell.spans_rows() {
            // Adjacent row-spanning cells share one slot so the next row
            // extracts their placeholders together.
            let key = match last_row_span_index {
                Some(key) if previous_spans_rows => key,
                _ => {
                    last_row_span_index = Some(final_cell_index);
                    final_cell_index
                }
            };
            let width = usize::try_from(cell.cols_spanned()).unwrap_or(0);
            buffer.insert(
                key,
                std::iter::repeat_with(|| SpanBufferEntry::new(cell.clone())).take(width),
            );
        }

        out.push(cell.clone());

        if cell.spans_cols() {
            let count = cell.cols_spanned() - 1;
            out.extend(
                (0..count).map(|i| cell.dummy_copy(DummyFor::ColSpan, i == 0, i == count - 1)),
            );
        }

        final_cell_index += out.len() - emitted_before;
        previous_spans_rows = cell.spans_rows();
    }

    // Row spans anchored at the last column.
    out.extend(buffer.extract(final_cell_index));
    out
}

/// Reject logical rows whose declared column spans need more than `columns`.
///
/// Continuations of row spans from earlier rows are not counted; this catches
/// configuration mistakes, not every malformed layout.
pub fn check_row_spans(rows: &[Vec<GridCell>], columns: usize) -> Result<()> {
    for row in rows {
        let mut col_index: i32 = 0;
        for cell in row {
            let span = cell.cols_spanned().max(1);
            let end = col_index.saturating_add(span);
            if end > to_index(columns) {
                return Err(GridError::SpanExceedsColumns {
                    col_index,
                    span,
                    columns,
                });
            }
            col_index = end;
        }
    }
    Ok(())
}
