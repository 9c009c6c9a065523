//! Derives new tables from existing ones and writes them out.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::Result;
use crate::format::FormatRegistry;
use crate::input::Loader;
use crate::table::{ColumnType, Table, Value};

use super::operations::FilterSpec;

/// Outcome of a format conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub rows_converted: usize,
    pub destination_path: PathBuf,
    /// Identifier of the format written.
    pub format: &'static str,
}

/// Filtering, sorting and format conversion.
///
/// Input tables are never mutated; every operation returns a new table.
#[derive(Debug, Clone)]
pub struct Transformer {
    registry: Arc<FormatRegistry>,
    loader: Loader,
}

impl Transformer {
    pub fn new(registry: Arc<FormatRegistry>, loader: Loader) -> Self {
        Self { registry, loader }
    }

    /// Keep rows whose cell satisfies `spec`, in their original order.
    ///
    /// Null cells and cells that do not coerce to the column's type never
    /// match.
    pub fn filter(&self, table: &Table, spec: &FilterSpec) -> Result<Table> {
        let column = table.column(&spec.column)?;
        spec.operator
            .check_applicable(&column.name, column.inferred_type)?;

        if column.inferred_type == ColumnType::Null {
            return Ok(table.select_rows(&[]));
        }

        let operand = spec.coerce_operand(column.inferred_type)?;
        let matching: Vec<usize> = column
            .values
            .iter()
            .enumerate()
            .filter(|(_, cell)| {
                cell.coerce(column.inferred_type)
                    .is_some_and(|cell| spec.operator.evaluate(&cell, &operand))
            })
            .map(|(index, _)| index)
            .collect();

        debug!(
            filter = %spec,
            matched = matching.len(),
            total = table.row_count(),
            "applied filter"
        );
        Ok(table.select_rows(&matching))
    }

    /// Stable sort by `column`.
    ///
    /// Nulls and cells that do not coerce sort after every other value in
    /// both directions.
    pub fn sort(&self, table: &Table, column: &str, descending: bool) -> Result<Table> {
        let column = table.column(column)?;
        let keys: Vec<Option<Value>> = column
            .values
            .iter()
            .map(|v| v.coerce(column.inferred_type))
            .collect();

        let mut order: Vec<usize> = (0..table.row_count()).collect();
        order.sort_by(|&a, &b| match (&keys[a], &keys[b]) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = x.compare(y).unwrap_or(Ordering::Equal);
                if descending { ordering.reverse() } else { ordering }
            }
        });

        Ok(table.select_rows(&order))
    }

    /// Load `source` and write it to `destination` in the format named by
    /// the hint or the destination's extension.
    pub fn convert(
        &self,
        source: impl AsRef<Path>,
        destination: impl AsRef<Path>,
        format_hint: Option<&str>,
    ) -> Result<Conversion> {
        let destination = destination.as_ref();
        // Fail on an unwritable destination before paying for the load.
        let format = self
            .registry
            .resolve_for_write(destination, format_hint)?
            .identifier;

        let table = self.loader.load(source, None)?;
        self.write(&table, destination, format_hint)?;

        Ok(Conversion {
            rows_converted: table.row_count(),
            destination_path: destination.to_path_buf(),
            format,
        })
    }

    /// Encode `table` to `path`.
    pub fn write(&self, table: &Table, path: &Path, format_hint: Option<&str>) -> Result<()> {
        let descriptor = self.registry.resolve_for_write(path, format_hint)?;
        descriptor.codec.encode(table, path)?;

        info!(
            path = %path.display(),
            format = descriptor.identifier,
            rows = table.row_count(),
            "wrote table"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::table::Column;
    use crate::transform::FilterOperator;

    fn transformer() -> Transformer {
        let registry = Arc::new(FormatRegistry::new());
        Transformer::new(registry.clone(), Loader::new(registry))
    }

    fn table() -> Table {
        Table::new(
            "t.csv",
            vec![
                Column::new(
                    "id",
                    ColumnType::Integer,
                    (1..=5).map(Value::Integer).collect(),
                ),
                Column::new(
                    "score",
                    ColumnType::Integer,
                    vec![
                        Value::Integer(3),
                        Value::Null,
                        Value::Integer(1),
                        Value::String("n.a.".into()),
                        Value::Integer(3),
                    ],
                ),
            ],
        )
        .unwrap()
    }

    fn ids(table: &Table) -> Vec<Value> {
        table.column("id").unwrap().values.clone()
    }

    #[test]
    fn test_filter_excludes_null_and_uncoercible() {
        let spec = FilterSpec::new("score", FilterOperator::NotEquals, "1");
        let result = transformer().filter(&table(), &spec).unwrap();
        assert_eq!(ids(&result), vec![Value::Integer(1), Value::Integer(5)]);
    }

    #[test]
    fn test_filter_unsupported_pairing() {
        let spec = FilterSpec::new("score", FilterOperator::Contains, "3");
        let err = transformer().filter(&table(), &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedOperator);
    }

    #[test]
    fn test_sort_nulls_last_both_directions() {
        let t = transformer();

        let ascending = t.sort(&table(), "score", false).unwrap();
        assert_eq!(
            ids(&ascending),
            [3, 1, 5, 2, 4].map(Value::Integer).to_vec()
        );

        let descending = t.sort(&table(), "score", true).unwrap();
        assert_eq!(
            ids(&descending),
            [1, 5, 3, 2, 4].map(Value::Integer).to_vec()
        );
    }

    #[test]
    fn test_sort_missing_column() {
        let err = transformer().sort(&table(), "nope", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ColumnNotFound);
    }
}
