//! Cell value helpers: reset defaults, clipboard text, paste validation.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde_json::{Number, Value};

use crate::columns::{Column, ColumnType};

/// The "empty" value of the same shape as `value`.
///
/// Arrays reset to `[]`, strings to `""`, numbers to `0`, everything else to
/// `null`.
#[must_use]
pub fn default_value_from_value(value: &Value) -> Value {
    match value {
        Value::Array(_) => Value::Array(Vec::new()),
        Value::String(_) => Value::String(String::new()),
        Value::Number(_) => Value::from(0),
        _ => Value::Null,
    }
}

/// Reset value for a cell of `column` currently holding `value`.
///
/// A declared number or string type takes precedence over the value's shape,
/// so `"5"` in a number column resets to `0`.
#[must_use]
pub fn default_value_for(column: &Column, value: &Value) -> Value {
    match column.column_type {
        Some(ColumnType::Number) => Value::from(0),
        Some(ColumnType::String) => Value::String(String::new()),
        Some(ColumnType::Date) | None => default_value_from_value(value),
    }
}

/// Exact equality that treats `0` and `0.0` as the same number.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_equal(x, y),
        _ => a == b,
    }
}

fn as_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if let (Some(x), Some(y)) = (as_integer(x), as_integer(y)) {
        return x == y;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y) == Some(Ordering::Equal),
        _ => false,
    }
}

/// Text written to the clipboard for `value`.
#[must_use]
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Cut `text` down to at most `max_length` characters.
#[must_use]
pub fn truncate_chars(text: &str, max_length: Option<usize>) -> &str {
    match max_length.and_then(|max| text.char_indices().nth(max)) {
        Some((byte_index, _)) => text.get(..byte_index).unwrap_or(text),
        None => text,
    }
}

/// True for a strict `YYYY-MM-DD` calendar date.
///
/// The shape is checked byte by byte first; chrono alone accepts padding
/// spaces, unpadded fields and a signed year.
#[must_use]
pub fn is_calendar_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    shaped && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

fn parse_number(text: &str) -> Option<Number> {
    let n: f64 = text.trim().parse().ok()?;
    Number::from_f64(n)
}

/// Decide whether pasted `text` is acceptable for `column`.
///
/// The column's validator wins if present; otherwise number columns require a
/// finite number and date columns a `YYYY-MM-DD` date. Other columns accept
/// anything.
#[must_use]
pub fn validate_paste(column: &Column, text: &str) -> bool {
    if let Some(validator) = &column.validator {
        return validator.check(text);
    }
    match column.column_type {
        Some(ColumnType::Number) => parse_number(text).is_some(),
        Some(ColumnType::Date) => is_calendar_date(text),
        _ => true,
    }
}

/// Value stored for accepted pasted `text`.
#[must_use]
pub fn paste_value(column: &Column, text: &str) -> Value {
    if column.is_number() {
        if let Some(n) = parse_number(text) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}
