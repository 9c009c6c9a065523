//! The in-memory table every operation reads and derives.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Result, TabulaError};

use super::column::Column;
use super::value::Value;

/// A row keyed by column name, in column order.
pub type Row = IndexMap<String, Value>;

/// Ordered columns of equal length plus the path they were loaded from.
///
/// Construction checks that column lengths agree and names are unique, so
/// every `Table` in hand satisfies both.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    source_path: PathBuf,
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table, validating column lengths and names.
    pub fn new(source_path: impl Into<PathBuf>, columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(TabulaError::InvalidArgument(format!(
                    "column '{}' has {} values, expected {}",
                    column.name,
                    column.len(),
                    row_count
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(TabulaError::InvalidArgument(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }

        Ok(Self {
            source_path: source_path.into(),
            columns,
            row_count,
        })
    }

    /// Path the table was loaded from.
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// File name without directories.
    pub fn filename(&self) -> String {
        self.source_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TabulaError::ColumnNotFound {
                column: name.to_string(),
                available: self.column_names(),
            })
    }

    /// A single row, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<Row> {
        if index >= self.row_count {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[index].clone()))
                .collect(),
        )
    }

    /// Up to `n` rows from the top, in order.
    pub fn head(&self, n: usize) -> Vec<Row> {
        (0..n.min(self.row_count))
            .filter_map(|i| self.row(i))
            .collect()
    }

    /// A new table holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            source_path: self.source_path.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
            row_count: indices.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|&v| Value::Integer(v)).collect()
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let columns = vec![
            Column::new("a", ColumnType::Integer, ints(&[1, 2])),
            Column::new("b", ColumnType::Integer, ints(&[1])),
        ];
        assert!(Table::new("t.csv", columns).is_err());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let columns = vec![
            Column::new("a", ColumnType::Integer, ints(&[1])),
            Column::new("a", ColumnType::Integer, ints(&[2])),
        ];
        assert!(Table::new("t.csv", columns).is_err());
    }

    #[test]
    fn test_empty_table_has_zero_rows() {
        let table = Table::new("empty.csv", Vec::new()).unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
        assert!(table.head(5).is_empty());
    }

    #[test]
    fn test_select_rows_and_row_order() {
        let columns = vec![
            Column::new("id", ColumnType::Integer, ints(&[10, 20, 30])),
            Column::new(
                "name",
                ColumnType::String,
                vec![
                    Value::String("a".into()),
                    Value::String("b".into()),
                    Value::String("c".into()),
                ],
            ),
        ];
        let table = Table::new("dir/people.csv", columns).unwrap();
        let picked = table.select_rows(&[2, 0]);

        assert_eq!(picked.row_count(), 2);
        assert_eq!(picked.filename(), "people.csv");
        let row = picked.row(0).unwrap();
        let keys: Vec<_> = row.keys().cloned().collect();
        assert_eq!(keys, vec!["id", "name"]);
        assert_eq!(row["id"], Value::Integer(30));
    }

    #[test]
    fn test_column_not_found() {
        let table = Table::new(
            "t.csv",
            vec![Column::new("a", ColumnType::Integer, ints(&[1]))],
        )
        .unwrap();
        let err = table.column("b").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ColumnNotFound);
    }
}
