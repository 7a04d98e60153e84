//! Structured error types for sheetgrid.
//!
//! Only setup-time problems (bad configuration, unreadable input) surface as
//! errors. Runtime navigation and editing problems are logged and swallowed
//! so the grid stays interactive.

/// All errors that can occur while configuring or driving a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two columns were registered under the same identifier.
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(String),

    /// A declared column span reaches past the last column.
    #[error("Column span of {span} at column {col_index} exceeds {columns} available columns")]
    SpanExceedsColumns {
        col_index: i32,
        span: i32,
        columns: usize,
    },

    /// A merge region is anchored outside the grid or overlaps another one.
    #[error("Invalid merge region at ({row_index}, {col_index}): {reason}")]
    MergeOutOfBounds {
        row_index: i32,
        col_index: i32,
        reason: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Clipboard read or write failure reported by the host.
    #[error("Clipboard: {0}")]
    Clipboard(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn read() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/sheetgrid/rows.json")?)
        }
        let err = read().err();
        assert!(matches!(err, Some(GridError::Io(_))));
        assert!(err.is_some_and(|e| e.to_string().starts_with("I/O error: ")));
    }

    #[test]
    fn span_error_message() {
        let err = GridError::SpanExceedsColumns {
            col_index: 2,
            span: 3,
            columns: 4,
        };
        assert_eq!(
            err.to_string(),
            "Column span of 3 at column 2 exceeds 4 available columns"
        );
    }
}
