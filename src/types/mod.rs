//! Data types shared by the layout engine and the navigator.

mod cell;
mod event;
mod merge;

pub use cell::*;
pub use event::*;
pub use merge::*;

/// A row record, keyed by column accessor.
pub type RowData = serde_json::Map<String, serde_json::Value>;
