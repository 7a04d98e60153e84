//! Merge region tests for sheetgrid
//!
//! Tests for the merge index: anchor lookup, spans at the anchor, JSON
//! descriptors with omitted spans, and validation against the grid bounds.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use sheetgrid::{Coordinate, GridError, MergeIndex, MergedCell};
use test_case::test_case;

fn region() -> MergeIndex {
    MergeIndex::new(&[MergedCell::new(1, 1, 2, 2), MergedCell::new(0, 4, 3, 1)])
}

#[test_case(2, 2 => Some(Coordinate::new(1, 1)) ; "bottom right of square")]
#[test_case(1, 2 => Some(Coordinate::new(1, 1)) ; "right of anchor")]
#[test_case(2, 4 => Some(Coordinate::new(0, 4)) ; "bottom of column strip")]
#[test_case(1, 1 => None ; "anchor itself")]
#[test_case(0, 0 => None ; "outside")]
fn parent_coords(row: i32, col: i32) -> Option<Coordinate> {
    region().get_merge_parent_coords(Coordinate::new(row, col))
}

#[test]
fn spans_are_reported_at_anchor_only() {
    let idx = region();
    assert_eq!(idx.row_span_at(Coordinate::new(0, 4)), 3);
    assert_eq!(idx.col_span_at(Coordinate::new(0, 4)), 1);
    assert_eq!(idx.col_span_at(Coordinate::new(1, 1)), 2);
    assert_eq!(idx.col_span_at(Coordinate::new(2, 1)), 1);

    let info = idx.info(Coordinate::new(2, 2)).unwrap();
    assert!(!info.is_origin);
    assert_eq!((info.row_span, info.col_span), (2, 2));
}

#[test]
fn descriptors_default_missing_spans() {
    let merges: Vec<MergedCell> =
        serde_json::from_str(r#"[{"rowIndex": 3, "colIndex": 0, "colSpan": 3}]"#).unwrap();
    assert_eq!(merges[0].rows_spanned(), 1);
    assert_eq!(merges[0].cols_spanned(), 3);
    assert!(merges[0].contains(Coordinate::new(3, 2)));
    assert!(!merges[0].contains(Coordinate::new(4, 0)));

    let idx = MergeIndex::new(&merges);
    assert!(idx.is_merged(Coordinate::new(3, 1)));
    assert_eq!(idx.regions().len(), 1);
}

#[test]
fn empty_index() {
    let idx = MergeIndex::default();
    assert!(idx.regions().is_empty());
    assert!(!idx.is_merged(Coordinate::new(0, 0)));
    assert_eq!(idx.row_span_at(Coordinate::new(0, 0)), 1);
}

#[test]
fn validation_rejects_negative_anchor() {
    let result = MergeIndex::validated(&[MergedCell::new(-1, 0, 2, 1)], 3);
    assert!(matches!(
        result,
        Err(GridError::MergeOutOfBounds { row_index: -1, .. })
    ));
}

#[test]
fn validation_accepts_touching_regions() {
    let merges = [MergedCell::new(0, 0, 2, 2), MergedCell::new(2, 0, 2, 2)];
    let idx = MergeIndex::validated(&merges, 2).unwrap();
    assert_eq!(
        idx.get_merge_parent_coords(Coordinate::new(3, 1)),
        Some(Coordinate::new(2, 0))
    );
}
