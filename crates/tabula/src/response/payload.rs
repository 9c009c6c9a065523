//! Wire payloads, one per tool.
//!
//! Field names here are the public contract; the internal types they are
//! built from are free to change.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::format::FormatRegistry;
use crate::inspect::{Analysis, ColumnStatistics, Sample};
use crate::table::{ColumnType, Row, Table, Value};
use crate::transform::{Conversion, FilterSpec};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub inferred_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResponse {
    pub filename: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<ColumnInfo>,
}

impl From<&Table> for LoadResponse {
    fn from(table: &Table) -> Self {
        Self {
            filename: table.filename(),
            total_rows: table.row_count(),
            total_columns: table.column_count(),
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnInfo {
                    name: c.name.clone(),
                    inferred_type: c.inferred_type,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleResponse {
    pub filename: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub data: Vec<Row>,
}

impl SampleResponse {
    pub fn new(table: &Table, sample: Sample) -> Self {
        Self {
            filename: table.filename(),
            total_rows: sample.total_rows,
            total_columns: sample.total_columns,
            data: sample.rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub sample_values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub filename: String,
    pub total_rows: usize,
    pub total_columns: usize,
    pub columns: Vec<AnalyzedColumn>,
}

impl AnalyzeResponse {
    pub fn new(table: &Table, analysis: Analysis) -> Self {
        Self {
            filename: table.filename(),
            total_rows: analysis.total_rows,
            total_columns: analysis.total_columns,
            columns: analysis
                .columns
                .into_iter()
                .map(|c| AnalyzedColumn {
                    name: c.name,
                    column_type: c.inferred_type,
                    sample_values: c.examples,
                })
                .collect(),
        }
    }
}

/// Column statistics. Numeric fields are absent, not zeroed, for
/// non-numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStatsResponse {
    pub column: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub total_values: usize,
    pub null_count: usize,
    pub unique_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
}

impl From<ColumnStatistics> for ColumnStatsResponse {
    fn from(stats: ColumnStatistics) -> Self {
        let numeric = stats.numeric;
        Self {
            column: stats.column,
            column_type: stats.inferred_type,
            total_values: stats.total_values,
            null_count: stats.null_count,
            unique_count: stats.unique_count,
            min: numeric.as_ref().map(|n| n.min.clone()),
            max: numeric.as_ref().map(|n| n.max.clone()),
            mean: numeric.as_ref().map(|n| n.mean),
            median: numeric.as_ref().map(|n| n.median),
            std: numeric.as_ref().map(|n| n.std),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResponse {
    pub original_rows: usize,
    pub filtered_rows: usize,
    pub filter_applied: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    /// Matching rows, returned inline when nothing was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
}

impl FilterResponse {
    pub fn new(original: &Table, filtered: &Table, spec: &FilterSpec, saved_to: Option<&Path>) -> Self {
        Self {
            original_rows: original.row_count(),
            filtered_rows: filtered.row_count(),
            filter_applied: spec.to_string(),
            saved_to: saved_to.map(|p| p.display().to_string()),
            data: inline_rows(filtered, saved_to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortResponse {
    pub sorted_by: String,
    pub descending: bool,
    pub total_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
    /// Sorted rows, returned inline when nothing was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
}

impl SortResponse {
    pub fn new(sorted: &Table, column: &str, descending: bool, saved_to: Option<&Path>) -> Self {
        Self {
            sorted_by: column.to_string(),
            descending,
            total_rows: sorted.row_count(),
            saved_to: saved_to.map(|p| p.display().to_string()),
            data: inline_rows(sorted, saved_to),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertResponse {
    pub rows_converted: usize,
    pub destination_path: String,
    pub format: String,
}

impl From<Conversion> for ConvertResponse {
    fn from(conversion: Conversion) -> Self {
        Self {
            rows_converted: conversion.rows_converted,
            destination_path: conversion.destination_path.display().to_string(),
            format: conversion.format.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatsResponse {
    pub total_formats: usize,
    /// Identifier to description, in registration order.
    pub supported_formats: IndexMap<String, String>,
}

impl From<&FormatRegistry> for FormatsResponse {
    fn from(registry: &FormatRegistry) -> Self {
        let supported_formats: IndexMap<String, String> = registry
            .describe_formats()
            .iter()
            .map(|d| (d.identifier.to_string(), d.description.to_string()))
            .collect();

        Self {
            total_formats: supported_formats.len(),
            supported_formats,
        }
    }
}

fn inline_rows(table: &Table, saved_to: Option<&Path>) -> Option<Vec<Row>> {
    match saved_to {
        Some(_) => None,
        None => Some(table.head(table.row_count())),
    }
}
