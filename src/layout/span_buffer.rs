//! Deferred row-span placeholders, keyed by physical column.

use std::collections::HashMap;

use crate::types::{DummyFor, GridCell};

/// One pending row-span continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanBufferEntry {
    /// Rows still waiting for a placeholder from this entry.
    pub remaining_rows: i32,
    /// The spanning cell. Its `row_span` fixes the run length.
    pub parent: GridCell,
}

impl SpanBufferEntry {
    #[must_use]
    pub fn new(parent: GridCell) -> Self {
        Self {
            remaining_rows: parent.rows_spanned() - 1,
            parent,
        }
    }
}

/// Accumulates row-span continuations until the row they belong to is laid out.
///
/// Entries are consumed by extraction: each one yields exactly one placeholder
/// per remaining row and is never read again once exhausted.
#[derive(Debug, Default)]
pub struct SpanBuffer {
    slots: HashMap<usize, Vec<SpanBufferEntry>>,
}

impl SpanBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entries` to the slot at physical column `key`.
    pub fn insert(&mut self, key: usize, entries: impl IntoIterator<Item = SpanBufferEntry>) {
        self.slots.entry(key).or_default().extend(entries);
    }

    /// Take one placeholder from every live entry at `key`, in insertion order.
    pub fn extract(&mut self, key: usize) -> Vec<GridCell> {
        let Some(slot) = self.slots.get_mut(&key) else {
            return Vec::new();
        };

        let mut dummies = Vec::with_capacity(slot.len());
        for entry in slot.iter_mut().filter(|e| e.remaining_rows > 0) {
            let row_span = entry.parent.rows_spanned();
            let total = row_span - 1;
            let index = row_span - 1 - entry.remaining_rows;
            dummies.push(
                entry
                    .parent
                    .dummy_copy(DummyFor::RowSpan, index == 0, index == total - 1),
            );
            entry.remaining_rows -= 1;
        }

        if slot.iter().all(|e| e.remaining_rows <= 0) {
            self.slots.remove(&key);
        }
        dummies
    }

    /// Number of entries at `key` that will still produce placeholders.
    #[must_use]
    pub fn pending(&self, key: usize) -> usize {
        self.slots
            .get(&key)
            .map_or(0, |slot| slot.iter().filter(|e| e.remaining_rows > 0).count())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
