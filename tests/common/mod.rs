//! Common test utilities: a recording host and grid builders.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use serde_json::Value;
use sheetgrid::{
    CellChange, Column, ColumnRegistry, Coordinate, EditorState, GridEvent, GridHost, GridOptions,
    KeyInput, KeyOutcome, MergeIndex, MergedCell, Navigator, RowData, TimerId,
};

/// Host that records everything the navigator asks of it.
///
/// Elements are strings naming the cell, e.g. `"cell-1-2"`.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<GridEvent<String>>,
    /// Armed timers with their delays.
    pub armed: Vec<(TimerId, u32)>,
    pub cleared: Vec<TimerId>,
    next_timer: i32,
    /// When false, `cell_element` finds nothing (the cell is not rendered).
    pub renders_cells: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            renders_cells: true,
            ..Self::default()
        }
    }

    pub fn changes(&self) -> Vec<&CellChange> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::CellChanged(change) => Some(change),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<Coordinate> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::NavigationChanged { coords } => Some(*coords),
                _ => None,
            })
            .collect()
    }

    pub fn last(&self) -> &GridEvent<String> {
        self.events.last().expect("no events recorded")
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl GridHost for RecordingHost {
    type Element = String;

    fn dispatch(&mut self, event: GridEvent<String>) {
        self.events.push(event);
    }

    fn set_timeout(&mut self, delay_ms: u32) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.armed.push((id, delay_ms));
        id
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.cleared.push(id);
    }

    fn cell_element(&self, coords: Coordinate) -> Option<String> {
        self.renders_cells
            .then(|| format!("cell-{}-{}", coords.row_index, coords.col_index))
    }
}

/// A navigator, its host and the rows it works on.
pub struct Grid {
    pub nav: Navigator<String>,
    pub host: RecordingHost,
    pub rows: Vec<RowData>,
    pub editor: Option<EditorState>,
}

impl Grid {
    pub fn new(columns: Vec<Column>, rows: usize) -> Self {
        Self::with(columns, &[], GridOptions::default(), empty_rows(rows))
    }

    pub fn with(
        columns: Vec<Column>,
        merges: &[MergedCell],
        options: GridOptions,
        rows: Vec<RowData>,
    ) -> Self {
        let nav = Navigator::new(
            ColumnRegistry::new(columns).unwrap(),
            MergeIndex::new(merges),
            options,
        );
        Self {
            nav,
            host: RecordingHost::new(),
            rows,
            editor: None,
        }
    }

    pub fn select(&mut self, row_index: i32, col_index: i32) -> bool {
        self.nav.select_cell(
            &mut self.host,
            &self.rows,
            Coordinate::new(row_index, col_index),
            false,
            None,
        )
    }

    pub fn press(&mut self, input: KeyInput) -> KeyOutcome {
        self.nav
            .handle_key_down(&mut self.host, &self.rows, self.editor.as_ref(), &input)
    }

    pub fn key(&mut self, key: &str) -> KeyOutcome {
        self.press(KeyInput::new(key))
    }

    pub fn coords(&self) -> Coordinate {
        self.nav.coords()
    }

    /// Apply the last recorded change to the rows, as the embedding app would.
    pub fn apply_last_change(&mut self) {
        let change = self.host.changes().last().map(|c| (*c).clone()).unwrap();
        let row = &mut self.rows[change.coords.row().unwrap()];
        row.insert(change.accessor, change.new_value);
    }
}

pub fn empty_rows(n: usize) -> Vec<RowData> {
    vec![RowData::new(); n]
}

/// Build a row record from a JSON object literal.
pub fn row(value: Value) -> RowData {
    match value {
        Value::Object(map) => map,
        other => panic!("row must be a JSON object, got {other}"),
    }
}

pub fn columns(ids: &[&str]) -> Vec<Column> {
    ids.iter().map(|id| Column::new(*id)).collect()
}
