//! Per-column statistics.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::table::{Column, ColumnType, Value};

/// Streaming mean/variance accumulator using Welford's algorithm.
#[derive(Debug, Clone, Default)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
}

impl StreamingStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    /// Population variance.
    fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }

    fn std(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// Statistics for numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericStatistics {
    /// Smallest value, integer-typed for integer columns.
    pub min: Value,
    /// Largest value, integer-typed for integer columns.
    pub max: Value,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
}

/// Statistics computed for a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    pub column: String,
    pub inferred_type: ColumnType,
    /// Total number of values (including nulls).
    pub total_values: usize,
    pub null_count: usize,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Present only for numeric columns with at least one numeric cell.
    pub numeric: Option<NumericStatistics>,
}

impl ColumnStatistics {
    pub fn compute(column: &Column) -> Self {
        let unique_count = column
            .non_null()
            .map(Value::to_text)
            .collect::<HashSet<_>>()
            .len();

        let numeric = if column.inferred_type.is_numeric() {
            numeric_statistics(column)
        } else {
            None
        };

        Self {
            column: column.name.clone(),
            inferred_type: column.inferred_type,
            total_values: column.len(),
            null_count: column.null_count(),
            unique_count,
            numeric,
        }
    }
}

fn numeric_statistics(column: &Column) -> Option<NumericStatistics> {
    let cells: Vec<&Value> = column.values.iter().filter(|v| v.as_f64().is_some()).collect();

    let min = cells
        .iter()
        .copied()
        .min_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal))?;
    let max = cells
        .iter()
        .copied()
        .max_by(|a, b| a.compare(b).unwrap_or(Ordering::Equal))?;

    let mut stats = StreamingStats::default();
    let mut sorted: Vec<f64> = Vec::with_capacity(cells.len());
    for value in cells.iter().filter_map(|v| v.as_f64()) {
        stats.add(value);
        sorted.push(value);
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(NumericStatistics {
        min: min.clone(),
        max: max.clone(),
        mean: stats.mean,
        median: median(&sorted),
        std: stats.std(),
    })
}

/// Median of an ascending, non-empty slice.
fn median(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
