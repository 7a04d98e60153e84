//! Active-cell state machine.
//!
//! `Navigator` owns the selected coordinate and turns keyboard and mouse input
//! into navigation, edit requests, clipboard requests and cell changes:
//! - `select_cell` is the only place the coordinate is mutated
//! - Merge regions redirect to their anchor, disabled columns are skipped
//! - A per-column delayed editor open is debounced through the host's timers
//!
//! Nothing here fails loudly. Out-of-range targets, missing rows or columns and
//! merge inconsistencies are logged and the action is dropped.

mod clipboard;
mod keys;

pub use clipboard::{ClipboardRequest, PendingCut, PendingPaste};
pub use keys::{KeyInput, KeyOutcome};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::columns::{CellContext, Column, ColumnRegistry};
use crate::config::GridOptions;
use crate::coords::{is_index_out_of_boundaries, last_index, Coordinate};
use crate::merge::MergeIndex;
use crate::types::{CellChange, ChangeSource, GridEvent, RowData};
use crate::values::values_equal;

/// Handle of a timer armed through [`GridHost::set_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// The environment a [`Navigator`] runs in.
///
/// The browser binding implements this over the DOM; tests record calls.
pub trait GridHost {
    /// Handle to a rendered cell (a DOM element in the browser).
    type Element;

    /// Deliver an outbound event.
    fn dispatch(&mut self, event: GridEvent<Self::Element>);

    /// Arm a one-shot timer. When it fires the host must call
    /// [`Navigator::on_delayed_edit_elapsed`] with the returned id.
    fn set_timeout(&mut self, delay_ms: u32) -> TimerId;

    fn clear_timeout(&mut self, id: TimerId);

    /// Look up the rendered cell at `coords`.
    fn cell_element(&self, coords: Coordinate) -> Option<Self::Element>;
}

/// External editor state. Its presence means a cell editor is open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    /// The editor is a popup; all grid key handling is suspended.
    #[serde(default)]
    pub is_popup: bool,
}

struct PendingEdit<E> {
    timer: TimerId,
    coords: Coordinate,
    target: Option<E>,
}

/// The navigation and editing state machine for one grid instance.
pub struct Navigator<E = ()> {
    coords: Coordinate,
    columns: ColumnRegistry,
    merges: MergeIndex,
    options: GridOptions,
    initialised: bool,
    pending_edit: Option<PendingEdit<E>>,
}

impl<E> Navigator<E> {
    #[must_use]
    pub fn new(columns: ColumnRegistry, merges: MergeIndex, options: GridOptions) -> Self {
        Self {
            coords: Coordinate::NONE,
            columns,
            merges,
            options,
            initialised: true,
            pending_edit: None,
        }
    }

    /// The selected coordinate, or [`Coordinate::NONE`].
    #[must_use]
    pub fn coords(&self) -> Coordinate {
        self.coords
    }

    #[must_use]
    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnRegistry {
        &mut self.columns
    }

    #[must_use]
    pub fn merges(&self) -> &MergeIndex {
        &self.merges
    }

    /// Replace the merge regions (after the host's layout changed).
    pub fn set_merges(&mut self, merges: MergeIndex) {
        self.merges = merges;
    }

    #[must_use]
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn set_suppress_controls(&mut self, suppress: bool) {
        self.options.suppress_controls = suppress;
    }

    pub fn set_initialised(&mut self, initialised: bool) {
        self.initialised = initialised;
    }

    /// Timer of the pending delayed editor open, if one is armed.
    #[must_use]
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending_edit.as_ref().map(|p| p.timer)
    }

    /// True while key input must be ignored.
    #[must_use]
    pub fn is_suppressed(&self, editor: Option<&EditorState>) -> bool {
        !self.initialised
            || self.options.suppress_controls
            || editor.is_some_and(|e| e.is_popup)
    }

    pub(crate) fn is_navigation_disabled(
        &self,
        column: &Column,
        rows: &[RowData],
        coords: Coordinate,
    ) -> bool {
        let ctx = CellContext {
            coords,
            row: coords.row().and_then(|r| rows.get(r)),
            column,
        };
        column.disable_navigation.resolve(&ctx)
    }

    /// Redirect a position inside a merge region to the region's anchor.
    pub(crate) fn resolve_merge_parent(&self, coords: Coordinate) -> Coordinate {
        if !self.merges.is_merged(coords) {
            return coords;
        }
        match self.merges.get_merge_parent_coords(coords) {
            Some(parent) => parent,
            None => {
                warn!(%coords, "merged cell has no parent region");
                coords
            }
        }
    }

    /// Single mutation point for the selected coordinate.
    ///
    /// The sentinel and `force` bypass validation. Otherwise the target must
    /// differ from the current coordinate, lie inside the live row and column
    /// counts and not be in a navigation-disabled column. Returns whether the
    /// coordinate was committed.
    pub fn select_cell<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        coords: Coordinate,
        force: bool,
        target: Option<E>,
    ) -> bool
    where
        H: GridHost<Element = E>,
    {
        if !force && !coords.is_none() {
            if coords == self.coords {
                return false;
            }
            let max_row = last_index(rows.len());
            if is_index_out_of_boundaries(coords.row_index, 0, max_row) {
                warn!(
                    row_index = coords.row_index,
                    row_count = rows.len(),
                    "row index out of boundaries"
                );
                return false;
            }
            let max_col = last_index(self.columns.len());
            if is_index_out_of_boundaries(coords.col_index, 0, max_col) {
                warn!(
                    col_index = coords.col_index,
                    col_count = self.columns.len(),
                    "column index out of boundaries"
                );
                return false;
            }
            let Some(column) = self.columns.get(coords.col_index) else {
                error!(col_index = coords.col_index, "column missing from registry");
                return false;
            };
            if self.is_navigation_disabled(column, rows, coords) {
                debug!(column = %column.id, %coords, "navigation disabled");
                return false;
            }
        }

        self.cancel_pending_edit(host);
        let delay = self
            .columns
            .get(coords.col_index)
            .and_then(|c| c.delay_editor_open);
        if let Some(delay_ms) = delay.filter(|_| coords.is_positive()) {
            let timer = host.set_timeout(delay_ms);
            self.pending_edit = Some(PendingEdit {
                timer,
                coords,
                target,
            });
        }

        self.coords = coords;
        host.dispatch(GridEvent::NavigationChanged { coords });
        true
    }

    /// Clear the selection.
    pub fn deselect<H>(&mut self, host: &mut H, rows: &[RowData]) -> bool
    where
        H: GridHost<Element = E>,
    {
        self.select_cell(host, rows, Coordinate::NONE, false, None)
    }

    /// Called by the host when the delayed editor-open timer fires.
    ///
    /// The element is looked up again for the armed coordinate, since the
    /// grid may have re-rendered since arming.
    pub fn on_delayed_edit_elapsed<H>(&mut self, host: &mut H, timer: TimerId)
    where
        H: GridHost<Element = E>,
    {
        let pending = match self.pending_edit.take() {
            Some(p) if p.timer == timer => p,
            other => {
                self.pending_edit = other;
                debug!(?timer, "stale delayed edit timer");
                return;
            }
        };
        if !pending.coords.is_positive() {
            return;
        }
        let target = host.cell_element(pending.coords).or(pending.target);
        host.dispatch(GridEvent::BeginEdit {
            coords: pending.coords,
            target,
            seed_key: None,
        });
    }

    /// Cancel the delayed editor open, if armed.
    pub fn cancel_pending_edit<H>(&mut self, host: &mut H)
    where
        H: GridHost<Element = E>,
    {
        if let Some(pending) = self.pending_edit.take() {
            host.clear_timeout(pending.timer);
        }
    }

    /// Release host resources. Call when the grid is torn down.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: GridHost<Element = E>,
    {
        self.cancel_pending_edit(host);
    }

    /// Ask the host to open the editor at `coords`.
    pub fn begin_edit<H>(
        &mut self,
        host: &mut H,
        coords: Coordinate,
        target: Option<E>,
        seed_key: Option<String>,
    ) where
        H: GridHost<Element = E>,
    {
        if !coords.is_positive() {
            debug!(%coords, "no cell to edit");
            return;
        }
        self.cancel_pending_edit(host);
        let target = target.or_else(|| host.cell_element(coords));
        host.dispatch(GridEvent::BeginEdit {
            coords,
            target,
            seed_key,
        });
    }

    /// A cell was clicked.
    pub fn handle_cell_click<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        coords: Coordinate,
        target: Option<E>,
    ) -> bool
    where
        H: GridHost<Element = E>,
    {
        let coords = self.resolve_merge_parent(coords);
        self.select_cell(host, rows, coords, false, target)
    }

    /// A cell was double-clicked: select it and open the editor.
    pub fn handle_cell_double_click<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        editor: Option<&EditorState>,
        coords: Coordinate,
        target: Option<E>,
    ) where
        H: GridHost<Element = E>,
    {
        if self.is_suppressed(editor) || editor.is_some() {
            debug!(%coords, "double click ignored");
            return;
        }
        let coords = self.resolve_merge_parent(coords);
        self.select_cell(host, rows, coords, false, None);
        if self.coords == coords {
            self.begin_edit(host, coords, target, None);
        }
    }

    /// Write a value produced by the external editor.
    ///
    /// Emits a change with source `editor` only if the value differs.
    pub fn commit_edit<H>(
        &mut self,
        host: &mut H,
        rows: &[RowData],
        coords: Coordinate,
        value: Value,
    ) where
        H: GridHost<Element = E>,
    {
        self.emit_change(host, rows, coords, value, ChangeSource::Editor);
    }

    /// Build and dispatch a change for `coords`, skipping no-op changes.
    pub(crate) fn emit_change<H>(
        &self,
        host: &mut H,
        rows: &[RowData],
        coords: Coordinate,
        new_value: Value,
        source: ChangeSource,
    ) -> bool
    where
        H: GridHost<Element = E>,
    {
        let Some((row, column)) = self.cell_at(rows, coords) else {
            return false;
        };
        let previous_value = column.value(row).cloned().unwrap_or(Value::Null);
        if values_equal(&previous_value, &new_value) {
            debug!(%coords, ?source, "value unchanged");
            return false;
        }
        host.dispatch(GridEvent::CellChanged(CellChange {
            coords,
            previous_value,
            new_value,
            row: row.clone(),
            column: column.id.clone(),
            accessor: column.accessor.clone(),
            source,
        }));
        true
    }

    /// Row record and column at `coords`, logging whichever is missing.
    pub(crate) fn cell_at<'r>(
        &'r self,
        rows: &'r [RowData],
        coords: Coordinate,
    ) -> Option<(&'r RowData, &'r Column)> {
        let Some(row) = coords.row().and_then(|r| rows.get(r)) else {
            warn!(
                row_index = coords.row_index,
                row_count = rows.len(),
                "row not found"
            );
            return None;
        };
        let Some(column) = self.columns.get(coords.col_index) else {
            warn!(
                col_index = coords.col_index,
                col_count = self.columns.len(),
                "column not found"
            );
            return None;
        };
        Some((row, column))
    }

    pub(crate) fn cell_context<'r>(
        row: &'r RowData,
        column: &'r Column,
        coords: Coordinate,
    ) -> CellContext<'r> {
        CellContext {
            coords,
            row: Some(row),
            column,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::columns::Column;

    #[derive(Default)]
    struct Host {
        events: Vec<GridEvent<()>>,
        next_timer: i32,
        cleared: Vec<TimerId>,
    }

    impl GridHost for Host {
        type Element = ();

        fn dispatch(&mut self, event: GridEvent<()>) {
            self.events.push(event);
        }

        fn set_timeout(&mut self, _delay_ms: u32) -> TimerId {
            self.next_timer += 1;
            TimerId(self.next_timer)
        }

        fn clear_timeout(&mut self, id: TimerId) {
            self.cleared.push(id);
        }

        fn cell_element(&self, _coords: Coordinate) -> Option<()> {
            Some(())
        }
    }

    fn navigator(columns: Vec<Column>) -> Navigator {
        Navigator::new(
            ColumnRegistry::new(columns).unwrap(),
            MergeIndex::default(),
            GridOptions::default(),
        )
    }

    fn rows(n: usize) -> Vec<RowData> {
        vec![RowData::new(); n]
    }

    #[test]
    fn select_same_cell_is_noop() {
        let mut nav = navigator(vec![Column::new("a")]);
        let mut host = Host::default();
        let rows = rows(2);
        assert!(nav.select_cell(&mut host, &rows, Coordinate::new(0, 0), false, None));
        assert!(!nav.select_cell(&mut host, &rows, Coordinate::new(0, 0), false, None));
        assert_eq!(host.events.len(), 1);
    }

    #[test]
    fn force_bypasses_validation() {
        let mut nav = navigator(vec![Column::new("a").with_disable_navigation(true)]);
        let mut host = Host::default();
        let rows = rows(1);
        assert!(!nav.select_cell(&mut host, &rows, Coordinate::new(0, 0), false, None));
        assert!(nav.select_cell(&mut host, &rows, Coordinate::new(0, 0), true, None));
        assert_eq!(nav.coords(), Coordinate::new(0, 0));
    }

    #[test]
    fn rearming_cancels_previous_timer() {
        let mut nav = navigator(vec![
            Column::new("a").with_delay_editor_open(300),
            Column::new("b").with_delay_editor_open(300),
        ]);
        let mut host = Host::default();
        let rows = rows(1);
        nav.select_cell(&mut host, &rows, Coordinate::new(0, 0), false, None);
        nav.select_cell(&mut host, &rows, Coordinate::new(0, 1), false, None);
        assert_eq!(host.cleared, vec![TimerId(1)]);
        assert_eq!(nav.pending_timer(), Some(TimerId(2)));

        // The cancelled timer firing late does nothing.
        nav.on_delayed_edit_elapsed(&mut host, TimerId(1));
        assert_eq!(nav.pending_timer(), Some(TimerId(2)));

        nav.on_delayed_edit_elapsed(&mut host, TimerId(2));
        assert!(matches!(
            host.events.last(),
            Some(GridEvent::BeginEdit { coords, .. }) if *coords == Coordinate::new(0, 1)
        ));
        assert_eq!(nav.pending_timer(), None);
    }

    #[test]
    fn suppression_sources() {
        let mut nav = navigator(vec![Column::new("a")]);
        assert!(!nav.is_suppressed(None));
        assert!(nav.is_suppressed(Some(&EditorState { is_popup: true })));
        assert!(!nav.is_suppressed(Some(&EditorState { is_popup: false })));
        nav.set_initialised(false);
        assert!(nav.is_suppressed(None));
        nav.set_initialised(true);
        nav.set_suppress_controls(true);
        assert!(nav.is_suppressed(None));
    }
}
