use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RowData;
use crate::coords::Coordinate;

/// What caused a cell value to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    Backspace,
    Delete,
    Editor,
    Paste,
    Cut,
}

/// A requested cell mutation, handed to the external row store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellChange {
    pub coords: Coordinate,
    pub previous_value: Value,
    pub new_value: Value,
    /// Snapshot of the row record at the time of the change.
    pub row: RowData,
    /// Id of the column being changed.
    pub column: String,
    /// Accessor key the new value should be written under.
    pub accessor: String,
    pub source: ChangeSource,
}

/// Notifications dispatched by the navigator to its host.
///
/// `E` is the host's element handle (a DOM element in the browser). It never
/// appears in the serialized form; the browser binding attaches it separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", bound(serialize = ""))]
pub enum GridEvent<E> {
    NavigationChanged {
        coords: Coordinate,
    },
    CellChanged(CellChange),
    BeginEdit {
        coords: Coordinate,
        #[serde(skip)]
        target: Option<E>,
        /// Key that opened the editor, used as the first character typed.
        #[serde(rename = "seedKey", skip_serializing_if = "Option::is_none")]
        seed_key: Option<String>,
    },
    StopEdit {
        #[serde(skip_serializing_if = "Option::is_none")]
        save: Option<bool>,
    },
    ToggleRowSelection {
        #[serde(rename = "rowIndex")]
        row_index: i32,
    },
    CreateRow {
        #[serde(rename = "rowIndex")]
        row_index: i32,
    },
}

impl<E> GridEvent<E> {
    /// The element attached to an edit request, if any.
    pub fn target(&self) -> Option<&E> {
        match self {
            GridEvent::BeginEdit { target, .. } => target.as_ref(),
            _ => None,
        }
    }
}
