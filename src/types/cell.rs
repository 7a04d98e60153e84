use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Border value written into a dummy cell's style to hide that edge.
pub const BORDER_NONE: &str = "none";

/// Which kind of span a dummy cell continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DummyFor {
    ColSpan,
    RowSpan,
}

/// Cell style. Borders are modelled explicitly so dummy cells can hide the
/// edges that fall inside a merged region; everything else is carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_top: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_right: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_left: Option<String>,
    /// Any other style properties, untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl CellStyle {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A cell of the logical grid, or a dummy placeholder in the physical grid.
///
/// Spans of `None` or `1` mean "no span". Spans are not validated here: zero or
/// negative values produce odd layouts, never a panic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "CellStyle::is_empty")]
    pub style: CellStyle,
    /// True for synthetic placeholders emitted by the layout expander.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dummy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dummy_for: Option<DummyFor>,
    /// First placeholder of its span run.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub first: bool,
    /// Last placeholder of its span run.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub last: bool,
    /// Rendering hints and any other payload, propagated verbatim into dummies.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GridCell {
    /// A plain cell holding `value`.
    #[must_use]
    pub fn with_value(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn row_span(mut self, span: i32) -> Self {
        self.row_span = Some(span);
        self
    }

    #[must_use]
    pub fn col_span(mut self, span: i32) -> Self {
        self.col_span = Some(span);
        self
    }

    /// Declared row span, `1` when unset.
    #[must_use]
    pub fn rows_spanned(&self) -> i32 {
        self.row_span.unwrap_or(1)
    }

    /// Declared column span, `1` when unset.
    #[must_use]
    pub fn cols_spanned(&self) -> i32 {
        self.col_span.unwrap_or(1)
    }

    #[must_use]
    pub fn spans_rows(&self) -> bool {
        self.rows_spanned() > 1
    }

    #[must_use]
    pub fn spans_cols(&self) -> bool {
        self.cols_spanned() > 1
    }

    /// Clone this cell as a placeholder continuing one of its spans.
    ///
    /// Column-span placeholders drop the value; row-span placeholders keep it.
    #[must_use]
    pub fn dummy_copy(&self, dummy_for: DummyFor, first: bool, last: bool) -> Self {
        let mut dummy = self.clone();
        dummy.dummy = true;
        dummy.dummy_for = Some(dummy_for);
        dummy.first = first;
        dummy.last = last;

        let hidden = || Some(BORDER_NONE.to_string());
        match dummy_for {
            DummyFor::RowSpan => {
                dummy.style.border_top = hidden();
                if !last {
                    dummy.style.border_bottom = hidden();
                }
            }
            DummyFor::ColSpan => {
                dummy.value = None;
                dummy.style.border_left = hidden();
                if !last {
                    dummy.style.border_right = hidden();
                }
            }
        }
        dummy
    }
}
