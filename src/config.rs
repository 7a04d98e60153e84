//! Grid configuration as supplied by the embedding page.
//!
//! Everything here is plain data deserialized from camelCase JSON. Computed
//! flags and paste validators cannot be expressed in JSON; native callers
//! attach them through [`ColumnRegistry::by_id_mut`] after [`GridConfig::build`].

use serde::{Deserialize, Serialize};

use crate::columns::{Column, ColumnRegistry, ColumnType};
use crate::error::Result;
use crate::merge::MergeIndex;
use crate::navigation::Navigator;
use crate::types::MergedCell;

/// Grid-wide behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridOptions {
    /// Id of the checkbox column used to toggle row selection with Enter.
    pub row_selection_column: Option<String>,
    /// Enter requests a new row instead of being ignored.
    pub can_create_rows: bool,
    /// Ignore all key input.
    pub suppress_controls: bool,
}

/// One column as declared in JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnConfig {
    pub id: String,
    /// Row record key; defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessor: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<ColumnType>,
    #[serde(default)]
    pub disable_navigation: bool,
    #[serde(default)]
    pub disable_backspace: bool,
    #[serde(default)]
    pub disable_cut: bool,
    #[serde(default)]
    pub disable_copy: bool,
    #[serde(default)]
    pub disable_paste: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_editor_open: Option<u32>,
}

impl From<ColumnConfig> for Column {
    fn from(config: ColumnConfig) -> Self {
        let mut column = Column::new(config.id);
        if let Some(accessor) = config.accessor {
            column.accessor = accessor;
        }
        column.column_type = config.column_type;
        column.disable_navigation = config.disable_navigation.into();
        column.disable_backspace = config.disable_backspace.into();
        column.disable_cut = config.disable_cut.into();
        column.disable_copy = config.disable_copy.into();
        column.disable_paste = config.disable_paste.into();
        column.max_length = config.max_length;
        column.delay_editor_open = config.delay_editor_open;
        column
    }
}

/// Complete grid setup: columns, merge regions and options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub merges: Vec<MergedCell>,
    #[serde(default)]
    pub options: GridOptions,
}

impl GridConfig {
    /// # Errors
    /// Returns [`crate::GridError::Json`] if `json` is not a valid config.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the configuration and create a navigator for it.
    ///
    /// # Errors
    /// Fails on duplicate column ids and on merge regions that are negative,
    /// overlap, or extend past the last column.
    pub fn build<E>(self) -> Result<Navigator<E>> {
        let columns = ColumnRegistry::new(self.columns.into_iter().map(Column::from).collect())?;
        let merges = MergeIndex::validated(&self.merges, columns.len())?;
        tracing::debug!(
            col_count = columns.len(),
            merge_count = self.merges.len(),
            "grid configured"
        );
        Ok(Navigator::new(columns, merges, self.options))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::coords::Coordinate;
    use crate::error::GridError;

    const CONFIG: &str = r#"{
        "columns": [
            {"id": "select"},
            {"id": "qty", "type": "number", "maxLength": 6, "delayEditorOpen": 250},
            {"id": "note", "accessor": "comment", "disableCut": true}
        ],
        "merges": [{"rowIndex": 0, "colIndex": 1, "rowSpan": 2}],
        "options": {"rowSelectionColumn": "select", "canCreateRows": true}
    }"#;

    #[test]
    fn parses_camel_case() {
        let config = GridConfig::from_json(CONFIG).unwrap();
        assert_eq!(config.columns.len(), 3);
        assert_eq!(config.columns[1].column_type, Some(ColumnType::Number));
        assert_eq!(config.columns[1].delay_editor_open, Some(250));
        assert_eq!(config.options.row_selection_column.as_deref(), Some("select"));
        assert!(config.options.can_create_rows);
        assert!(!config.options.suppress_controls);
    }

    #[test]
    fn build_applies_column_settings() {
        let nav: Navigator = GridConfig::from_json(CONFIG).unwrap().build().unwrap();
        let note = nav.columns().by_id("note").unwrap();
        assert_eq!(note.accessor, "comment");
        assert!(matches!(note.disable_cut, crate::columns::Predicate::Static(true)));
        assert_eq!(nav.columns().by_id("select").unwrap().accessor, "select");
        assert_eq!(nav.merges().row_span_at(Coordinate::new(0, 1)), 2);
    }

    #[test]
    fn build_rejects_bad_merges() {
        let json = r#"{
            "columns": [{"id": "a"}],
            "merges": [{"rowIndex": 0, "colIndex": 0, "colSpan": 2}]
        }"#;
        let result = GridConfig::from_json(json).unwrap().build::<()>();
        assert!(matches!(
            result,
            Err(GridError::SpanExceedsColumns { columns: 1, .. })
        ));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GridConfig::from_json("{\"columns\": 3}"),
            Err(GridError::Json(_))
        ));
    }
}
