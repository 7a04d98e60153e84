//! Cut, copy and paste.
//!
//! Clipboard access is asynchronous in the browser, so each operation is split
//! in two: the key handler returns a [`ClipboardRequest`], the host performs
//! the I/O, then reports the result through `finish_cut` / `finish_paste`.
//! Input keeps flowing in between; if the selection moved meanwhile, the
//! change still targets the cell the operation started on.

use serde_json::Value;
use tracing::{debug, error};

use super::keys::KeyOutcome;
use super::{GridHost, Navigator};
use crate::columns::{Column, Predicate};
use crate::coords::Coordinate;
use crate::error::Result;
use crate::types::{ChangeSource, RowData};
use crate::values::{
    default_value_for, paste_value, stringify_value, truncate_chars, validate_paste,
};

/// Cut awaiting its clipboard write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCut {
    pub coords: Coordinate,
}

/// Paste awaiting its clipboard read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPaste {
    pub coords: Coordinate,
}

/// Clipboard I/O the host must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardRequest {
    /// Write `text`; for a cut, report back with `finish_cut`.
    Write {
        text: String,
        cut: Option<PendingCut>,
    },
    /// Read the clipboard text and report back with `finish_paste`.
    Read(PendingPaste),
}

impl<E> Navigator<E> {
    fn clipboard_cell<'r>(
        &'r self,
        rows: &'r [RowData],
        op: &str,
        disabled: impl Fn(&Column) -> &Predicate,
    ) -> Option<(&'r RowData, &'r Column)> {
        let coords = self.coords;
        let (row, column) = self.cell_at(rows, coords)?;
        let ctx = Self::cell_context(row, column, coords);
        if disabled(column).resolve(&ctx) {
            debug!(column = %column.id, op, "clipboard operation disabled");
            return None;
        }
        Some((row, column))
    }

    pub(crate) fn request_copy(&self, rows: &[RowData]) -> KeyOutcome {
        let Some((row, column)) = self.clipboard_cell(rows, "copy", |c| &c.disable_copy) else {
            return KeyOutcome::Handled;
        };
        let text = column.value(row).map(stringify_value).unwrap_or_default();
        KeyOutcome::Clipboard(ClipboardRequest::Write { text, cut: None })
    }

    pub(crate) fn request_cut(&self, rows: &[RowData]) -> KeyOutcome {
        let Some((row, column)) = self.clipboard_cell(rows, "cut", |c| &c.disable_cut) else {
            return KeyOutcome::Handled;
        };
        let text = column.value(row).map(stringify_value).unwrap_or_default();
        KeyOutcome::Clipboard(ClipboardRequest::Write {
            text,
            cut: Some(PendingCut {
                coords: self.coords,
            }),
        })
    }

    pub(crate) fn request_paste(&self, rows: &[RowData]) -> KeyOutcome {
        if self.clipboard_cell(rows, "paste", |c| &c.disable_paste).is_none() {
            return KeyOutcome::Handled;
        }
        KeyOutcome::Clipboard(ClipboardRequest::Read(PendingPaste {
            coords: self.coords,
        }))
    }

    /// Complete a cut once the clipboard write settled.
    ///
    /// On success the cell is reset to its empty value, if it is not already.
    pub fn finish_cut<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        cut: PendingCut,
        written: Result<()>,
    ) where
        H: GridHost<Element = E>,
    {
        if let Err(e) = written {
            error!(coords = %cut.coords, "clipboard write failed: {e}");
            return;
        }
        let Some((row, column)) = self.cell_at(rows, cut.coords) else {
            return;
        };
        let current = column.value(row).cloned().unwrap_or(Value::Null);
        let reset = default_value_for(column, &current);
        self.emit_change(host, rows, cut.coords, reset, ChangeSource::Cut);
    }

    /// Complete a paste with the text read from the clipboard.
    ///
    /// Text is truncated to the column's `max_length` and validated; rejected
    /// text is dropped without an event.
    pub fn finish_paste<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        paste: PendingPaste,
        read: Result<String>,
    ) where
        H: GridHost<Element = E>,
    {
        let text = match read {
            Ok(text) => text,
            Err(e) => {
                error!(coords = %paste.coords, "clipboard read failed: {e}");
                return;
            }
        };
        let Some((_, column)) = self.cell_at(rows, paste.coords) else {
            return;
        };
        let text = truncate_chars(&text, column.max_length);
        if !validate_paste(column, text) {
            debug!(column = %column.id, "pasted text rejected");
            return;
        }
        let value = paste_value(column, text);
        self.emit_change(host, rows, paste.coords, value, ChangeSource::Paste);
    }
}
