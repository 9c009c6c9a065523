//! Read-only views over a table.

use crate::error::{Result, TabulaError};
use crate::table::{ColumnType, Row, Table, Value};

use super::statistics::ColumnStatistics;

/// First rows of a table plus its dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub total_rows: usize,
    pub total_columns: usize,
    pub rows: Vec<Row>,
}

/// Structure of one column as reported by [`Inspector::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub inferred_type: ColumnType,
    /// First non-null values, in row order.
    pub examples: Vec<Value>,
}

/// Structure of a whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnSummary>,
}

/// Sampling, structural analysis and column statistics.
#[derive(Debug, Clone)]
pub struct Inspector {
    example_values: usize,
}

impl Inspector {
    /// Create an inspector that reports up to `example_values` examples per column.
    pub fn new(example_values: usize) -> Self {
        Self { example_values }
    }

    /// Up to `n` rows from the top. `n` must be at least 1.
    pub fn sample(&self, table: &Table, n: usize) -> Result<Sample> {
        if n == 0 {
            return Err(TabulaError::InvalidArgument(
                "sample size must be at least 1".to_string(),
            ));
        }

        Ok(Sample {
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            rows: table.head(n),
        })
    }

    pub fn analyze(&self, table: &Table) -> Analysis {
        let columns = table
            .columns()
            .iter()
            .map(|column| ColumnSummary {
                name: column.name.clone(),
                inferred_type: column.inferred_type,
                examples: column
                    .non_null()
                    .take(self.example_values)
                    .cloned()
                    .collect(),
            })
            .collect();

        Analysis {
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            columns,
        }
    }

    pub fn column_stats(&self, table: &Table, column: &str) -> Result<ColumnStatistics> {
        Ok(ColumnStatistics::compute(table.column(column)?))
    }
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new(3)
    }
}
