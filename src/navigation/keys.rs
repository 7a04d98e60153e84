//! Key-down dispatch and arrow/tab movement.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::clipboard::ClipboardRequest;
use super::{EditorState, GridHost, Navigator};
use crate::columns::ColumnType;
use crate::coords::{is_index_out_of_boundaries, last_index, Coordinate};
use crate::types::{ChangeSource, GridEvent, RowData};
use crate::values::default_value_for;

/// A key press, as reported by a `keydown` event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyInput {
    /// DOM `KeyboardEvent.key` value, e.g. `"ArrowDown"`, `"a"`, `"F2"`.
    pub key: String,
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub meta_key: bool,
    pub alt_key: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    #[must_use]
    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    /// Control on most platforms, Command on macOS.
    #[must_use]
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl_key || self.meta_key
    }

    /// A single printable character typed without modifiers.
    #[must_use]
    pub fn is_printable(&self) -> bool {
        let mut chars = self.key.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_control())
            && !self.ctrl_key
            && !self.meta_key
            && !self.alt_key
    }

    fn is_digit(&self) -> bool {
        self.key.len() == 1 && self.key.bytes().all(|b| b.is_ascii_digit())
    }

    fn is_navigation(&self) -> bool {
        matches!(
            self.key.as_str(),
            "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Tab"
        )
    }
}

/// What the navigator did with a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// Not handled; the host should let the event through.
    Ignored,
    /// Handled; the host should prevent the default action.
    Handled,
    /// Handled, and the host must perform clipboard I/O and report back.
    Clipboard(ClipboardRequest),
}

impl KeyOutcome {
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, KeyOutcome::Ignored)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn step(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

impl<E> Navigator<E> {
    /// Handle a key-down event.
    ///
    /// Branches are tried in priority order; the first that applies wins.
    pub fn handle_key_down<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        editor: Option<&EditorState>,
        input: &KeyInput,
    ) -> KeyOutcome
    where
        H: GridHost<Element = E>,
    {
        if self.is_suppressed(editor) {
            debug!(key = %input.key, "controls suppressed");
            return KeyOutcome::Ignored;
        }

        if editor.is_some() {
            let save = match input.key.as_str() {
                "Enter" => true,
                "Escape" => false,
                _ => return KeyOutcome::Ignored,
            };
            host.dispatch(GridEvent::StopEdit { save: Some(save) });
            return KeyOutcome::Handled;
        }

        let coords = self.coords;
        if coords.is_none() {
            return KeyOutcome::Ignored;
        }
        let Some(column) = self.columns.get(coords.col_index) else {
            warn!(col_index = coords.col_index, "selected column not found");
            return KeyOutcome::Ignored;
        };
        let is_row_selection = self
            .options
            .row_selection_column
            .as_deref()
            .is_some_and(|id| id == column.id);
        let column_type = column.column_type;

        match input.key.as_str() {
            "F2" => {
                self.begin_edit(host, coords, None, None);
                return KeyOutcome::Handled;
            }
            "Enter" if self.options.can_create_rows && !is_row_selection => {
                host.dispatch(GridEvent::CreateRow {
                    row_index: coords.row_index,
                });
                return KeyOutcome::Handled;
            }
            _ => {}
        }

        if input.is_navigation() {
            self.navigate(host, rows, input);
            return KeyOutcome::Handled;
        }

        if is_row_selection && input.key == "Enter" {
            host.dispatch(GridEvent::ToggleRowSelection {
                row_index: coords.row_index,
            });
            return KeyOutcome::Handled;
        }

        if input.has_command_modifier() {
            return match input.key.to_ascii_lowercase().as_str() {
                "x" => self.request_cut(rows),
                "c" => self.request_copy(rows),
                "v" => self.request_paste(rows),
                _ => KeyOutcome::Ignored,
            };
        }

        let source = match input.key.as_str() {
            "Backspace" => Some(ChangeSource::Backspace),
            "Delete" => Some(ChangeSource::Delete),
            _ => None,
        };
        if let Some(source) = source {
            self.reset_cell(host, rows, coords, source);
            return KeyOutcome::Handled;
        }

        let seeds_editor = match column_type {
            Some(ColumnType::Number) => input.is_digit(),
            None => input.is_printable(),
            Some(_) => false,
        };
        if seeds_editor {
            self.begin_edit(host, coords, None, Some(input.key.clone()));
            return KeyOutcome::Handled;
        }

        KeyOutcome::Ignored
    }

    /// Reset the cell at `coords` to its type's empty value.
    fn reset_cell<H>(
        &self,
        host: &mut H,
        rows: &[RowData],
        coords: Coordinate,
        source: ChangeSource,
    ) where
        H: GridHost<Element = E>,
    {
        let Some((row, column)) = self.cell_at(rows, coords) else {
            return;
        };
        let ctx = Self::cell_context(row, column, coords);
        if column.disable_backspace.resolve(&ctx) {
            debug!(column = %column.id, "backspace disabled");
            return;
        }
        let current = column.value(row).cloned().unwrap_or(Value::Null);
        let reset = default_value_for(column, &current);
        self.emit_change(host, rows, coords, reset, source);
    }

    fn navigate<H>(&mut self, host: &mut H, rows: &[RowData], input: &KeyInput)
    where
        H: GridHost<Element = E>,
    {
        let current = self.coords;
        let target = match (input.key.as_str(), input.shift_key) {
            ("ArrowDown", _) => {
                let next = current
                    .row_index
                    .saturating_add(self.merges.row_span_at(current).max(1));
                if is_index_out_of_boundaries(next, 0, last_index(rows.len())) {
                    debug!(row_index = next, row_count = rows.len(), "already at last row");
                    return;
                }
                current.with_row(next)
            }
            ("ArrowUp", _) => {
                let next = current.row_index - 1;
                if next < 0 {
                    debug!("already at first row");
                    return;
                }
                current.with_row(next)
            }
            ("ArrowRight", _) | ("Tab", false) => {
                let step = self.merges.col_span_at(current).max(1);
                let Some(next) = self.horizontal_target(rows, current, step, Direction::Forward)
                else {
                    return;
                };
                current.with_col(next)
            }
            ("ArrowLeft", _) | ("Tab", true) => {
                let Some(next) = self.horizontal_target(rows, current, 1, Direction::Backward)
                else {
                    return;
                };
                current.with_col(next)
            }
            _ => return,
        };

        let target = self.resolve_merge_parent(target);
        self.select_cell(host, rows, target, false, None);
    }

    /// Column reached by moving `distance` columns, skipping disabled ones.
    fn horizontal_target(
        &self,
        rows: &[RowData],
        current: Coordinate,
        distance: i32,
        direction: Direction,
    ) -> Option<i32> {
        let next = current
            .col_index
            .saturating_add(distance * direction.step());
        if is_index_out_of_boundaries(next, 0, last_index(self.columns.len())) {
            debug!(
                col_index = next,
                col_count = self.columns.len(),
                "no column in that direction"
            );
            return None;
        }
        Some(
            self.next_enabled_column(rows, current.row_index, next, direction)
                .unwrap_or(next),
        )
    }

    /// First column from `col_index` onwards (in `direction`) that allows
    /// navigation, or `None` if the walk runs off the column list.
    fn next_enabled_column(
        &self,
        rows: &[RowData],
        row_index: i32,
        col_index: i32,
        direction: Direction,
    ) -> Option<i32> {
        let column = self.columns.get(col_index)?;
        let coords = Coordinate::new(row_index, col_index);
        if !self.is_navigation_disabled(column, rows, coords) {
            return Some(col_index);
        }
        self.next_enabled_column(rows, row_index, col_index + direction.step(), direction)
    }
}
