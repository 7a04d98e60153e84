//! sheetgrid - spreadsheet grid core for the web
//!
//! Two independent parts:
//! - A merged-cell layout engine that expands a logical grid with row and
//!   column spans into a rectangular physical grid of real and dummy cells
//! - A navigation state machine for keyboard movement, editing, clipboard
//!   operations and cell changes, honouring merges and per-column rules
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridWidget, expand_layout } from 'sheetgrid';
//! await init();
//! const physical = JSON.parse(expand_layout(JSON.stringify(logicalRows)));
//! const grid = new GridWidget(rootElement, JSON.stringify(config));
//! grid.setRows(rows);
//! grid.setCallback((event) => console.log(event.type, event));
//! ```

pub mod columns;
pub mod config;
pub mod coords;
pub mod error;
pub mod layout;
pub mod merge;
pub mod navigation;
pub mod types;
pub mod values;

#[cfg(target_arch = "wasm32")]
pub mod widget;

use wasm_bindgen::prelude::*;

pub use columns::{CellContext, Column, ColumnRegistry, ColumnType, PasteValidator, Predicate};
pub use config::{ColumnConfig, GridConfig, GridOptions};
pub use coords::Coordinate;
pub use error::GridError;
pub use merge::{MergeIndex, MergeInfo};
pub use navigation::{
    ClipboardRequest, EditorState, GridHost, KeyInput, KeyOutcome, Navigator, PendingCut,
    PendingPaste, TimerId,
};
pub use types::*;
#[cfg(target_arch = "wasm32")]
pub use widget::{init_logging, GridWidget};

/// Expand a logical cell matrix into the physical matrix
///
/// # Arguments
/// * `json` - A JSON array of rows, each an array of cells
///
/// # Returns
/// A JSON string containing the physical matrix, dummy cells included
///
/// # Errors
/// Returns an error if the input is not a valid cell matrix.
#[wasm_bindgen]
pub fn expand_layout(json: &str) -> Result<String, JsValue> {
    layout::expand_layout_json(json).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
