//! Column type inference over a bounded prefix of values.

use serde::{Deserialize, Serialize};

use crate::input::RawTable;
use crate::table::{
    parse_boolean, parse_date, parse_float, parse_integer, Column, ColumnType, Value,
};

/// Inference configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum non-null values scanned per column.
    pub scan_limit: usize,
    /// Share of scanned values that must parse for a numeric type to win.
    pub match_threshold: f64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            scan_limit: 1000,
            match_threshold: 0.9,
        }
    }
}

/// Outcome of inferring one column's type.
#[derive(Debug, Clone, PartialEq)]
pub struct InferredType {
    pub column_type: ColumnType,
    /// Share of scanned values that parse under `column_type`.
    pub confidence: f64,
    /// Null tokens seen across the whole column.
    pub null_count: usize,
}

/// Infers column types and coerces raw cells into typed columns.
#[derive(Debug, Clone, Default)]
pub struct TypeInferrer {
    config: InferenceConfig,
}

impl TypeInferrer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Infer the type of a sequence of raw cells.
    ///
    /// Integer wins at the match threshold unless some scanned value is
    /// fractional, then float at the same threshold. A single fractional
    /// value makes the column float even when 90% of it is integral, so no
    /// decimal is truncated on coercion. Boolean and date need every
    /// scanned value to match. Null tokens are skipped.
    pub fn infer<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> InferredType {
        let mut null_count = 0usize;
        let mut scanned = 0usize;
        let mut integers = 0usize;
        let mut floats = 0usize;
        let mut booleans = 0usize;
        let mut dates = 0usize;

        for value in values {
            if RawTable::is_null_value(value) {
                null_count += 1;
                continue;
            }
            if scanned >= self.config.scan_limit {
                continue;
            }
            scanned += 1;

            if parse_integer(value).is_some() {
                integers += 1;
                floats += 1;
            } else if parse_float(value).is_some() {
                floats += 1;
            } else if parse_boolean(value).is_some() {
                booleans += 1;
            } else if parse_date(value).is_some() {
                dates += 1;
            }
        }

        if scanned == 0 {
            return InferredType {
                column_type: ColumnType::Null,
                confidence: 1.0,
                null_count,
            };
        }

        let total = scanned as f64;
        let threshold = self.config.match_threshold;
        // one fractional value outranks the integer threshold
        let fractional = floats > integers;

        let (column_type, matched) = if integers as f64 / total >= threshold && !fractional {
            (ColumnType::Integer, integers)
        } else if floats as f64 / total >= threshold {
            (ColumnType::Float, floats)
        } else if booleans == scanned {
            (ColumnType::Boolean, booleans)
        } else if dates == scanned {
            (ColumnType::Date, dates)
        } else {
            (ColumnType::String, scanned)
        };

        InferredType {
            column_type,
            confidence: matched as f64 / total,
            null_count,
        }
    }

    /// Infer every column of a raw table and build typed columns.
    pub fn build_columns(&self, raw: &RawTable) -> Vec<Column> {
        raw.headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let inferred = self.infer(raw.column_values(index));
                tracing::debug!(
                    column = %name,
                    column_type = %inferred.column_type,
                    confidence = inferred.confidence,
                    nulls = inferred.null_count,
                    "inferred column type"
                );
                let values = raw
                    .column_values(index)
                    .map(|cell| coerce_cell(cell, inferred.column_type))
                    .collect();
                Column::new(name.clone(), inferred.column_type, values)
            })
            .collect()
    }
}

/// Convert one raw cell; cells that do not parse keep their text.
fn coerce_cell(cell: &str, column_type: ColumnType) -> Value {
    if RawTable::is_null_value(cell) {
        return Value::Null;
    }
    match column_type {
        ColumnType::String => Value::String(cell.to_string()),
        _ => Value::parse_as(cell, column_type).unwrap_or_else(|| Value::String(cell.to_string())),
    }
}
