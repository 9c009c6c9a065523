//! Cell values and the text parsers shared by inference, filtering and sorting.

use std::cmp::Ordering;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::types::ColumnType;

// Date shapes are gated by regex before chrono validates the calendar.
static DATE_FORMATS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(), "%Y-%m-%d"), // ISO date
        (Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").unwrap(), "%Y/%m/%d"), // Alt ISO
        (Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(), "%m/%d/%Y"), // US date
        (Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").unwrap(), "%d-%m-%Y"), // European date
    ]
});

/// A single cell.
///
/// Cells that parsed under their column's inferred type hold the typed
/// variant. Cells that did not keep their raw text as [`Value::String`], so
/// they can still be written back out and reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    String(String),
}

impl Value {
    /// Parse raw text as the given column type.
    ///
    /// Returns `None` when the text does not parse; null tokens are the
    /// caller's concern.
    pub fn parse_as(text: &str, column_type: ColumnType) -> Option<Value> {
        match column_type {
            ColumnType::Integer => parse_integer(text).map(Value::Integer),
            ColumnType::Float => parse_float(text).map(Value::Float),
            ColumnType::Boolean => parse_boolean(text).map(Value::Boolean),
            ColumnType::Date => parse_date(text).map(Value::Date),
            ColumnType::String => Some(Value::String(text.to_string())),
            ColumnType::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value already holds the variant for `column_type`.
    pub fn matches_type(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Value::Integer(_), ColumnType::Integer)
                | (Value::Float(_), ColumnType::Float)
                | (Value::Boolean(_), ColumnType::Boolean)
                | (Value::Date(_), ColumnType::Date)
                | (Value::String(_), ColumnType::String)
        )
    }

    /// Coerce this cell to `column_type` for comparison.
    ///
    /// Nulls and cells that do not parse under the type yield `None`.
    pub fn coerce(&self, column_type: ColumnType) -> Option<Value> {
        match self {
            Value::Null => None,
            _ if self.matches_type(column_type) => Some(self.clone()),
            _ if column_type == ColumnType::String => Some(Value::String(self.to_text())),
            Value::Integer(i) if column_type == ColumnType::Float => Some(Value::Float(*i as f64)),
            Value::String(s) => Value::parse_as(s.trim(), column_type),
            _ => None,
        }
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Compare two coerced values.
    ///
    /// Integers and floats compare numerically with each other; any other
    /// mix of variants is incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    /// Text form used by text encoders. Null becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Boolean(b) => b.to_string(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::String(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Parse a whole number.
pub fn parse_integer(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Parse a finite floating-point number. `nan` and `inf` are rejected.
pub fn parse_float(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Parse one of the boolean tokens `true`, `false`, `yes`, `no`.
pub fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" => Some(true),
        "false" | "no" => Some(false),
        _ => None,
    }
}

/// Parse one of the recognized date patterns.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    DATE_FORMATS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(trimmed))
        .find_map(|(_, format)| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Floats keep a fractional part in text so they re-infer as floats.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
