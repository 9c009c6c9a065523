//! A named, typed column of cells.

use super::types::ColumnType;
use super::value::Value;

/// One column of a [`Table`](super::Table).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Type inferred from the column's values.
    pub inferred_type: ColumnType,
    /// One cell per row.
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, inferred_type: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            inferred_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-null cells in row order.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Whether every non-null cell holds the inferred type's variant.
    ///
    /// Typed encoders fall back to text when this is false.
    pub fn is_uniform(&self) -> bool {
        self.non_null().all(|v| v.matches_type(self.inferred_type))
    }

    /// The cells at `indices`, in that order.
    pub(crate) fn select(&self, indices: &[usize]) -> Column {
        Column {
            name: self.name.clone(),
            inferred_type: self.inferred_type,
            values: indices.iter().map(|&i| self.values[i].clone()).collect(),
        }
    }
}
