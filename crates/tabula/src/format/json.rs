//! JSON (array of objects) and JSON Lines.

use std::io::Write;
use std::path::Path;

use indexmap::IndexSet;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::input::RawTable;
use crate::table::Table;

use super::{create_output, read_source};

/// Decode a JSON document.
///
/// A top-level array holds one object per row and a lone object is a
/// single row. Documents that fail to parse whole are retried as JSON
/// Lines before reporting the original error.
pub fn decode(path: &Path) -> Result<RawTable> {
    let contents = read_source(path)?;

    let document: JsonValue = match serde_json::from_slice(&contents) {
        Ok(document) => document,
        Err(err) => {
            return match parse_lines(&contents) {
                Ok(records) if !records.is_empty() => {
                    debug!(path = %path.display(), "decoded JSON document as JSON Lines");
                    Ok(records_to_raw(&records))
                }
                _ => Err(TabulaError::decode(path, err)),
            };
        }
    };

    let records = match document {
        JsonValue::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                JsonValue::Object(map) => Ok(map),
                other => Err(TabulaError::decode(
                    path,
                    format!("element {} is {}, expected an object", i, kind_of(&other)),
                )),
            })
            .collect::<Result<Vec<_>>>()?,
        JsonValue::Object(map) => vec![map],
        other => {
            return Err(TabulaError::decode(
                path,
                format!("top-level value is {}, expected an array of objects", kind_of(&other)),
            ));
        }
    };

    Ok(records_to_raw(&records))
}

/// Decode JSON Lines: one object per non-blank line.
pub fn decode_lines(path: &Path) -> Result<RawTable> {
    let contents = read_source(path)?;
    let records = parse_lines(&contents).map_err(|e| TabulaError::decode(path, e))?;
    Ok(records_to_raw(&records))
}

fn parse_lines(bytes: &[u8]) -> std::result::Result<Vec<Map<String, JsonValue>>, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| match serde_json::from_str::<JsonValue>(line) {
            Ok(JsonValue::Object(map)) => Ok(map),
            Ok(other) => Err(format!("line {} is {}, expected an object", i + 1, kind_of(&other))),
            Err(e) => Err(format!("line {}: {}", i + 1, e)),
        })
        .collect()
}

/// Columns are the union of keys in first-seen order.
fn records_to_raw(records: &[Map<String, JsonValue>]) -> RawTable {
    let mut headers: IndexSet<&str> = IndexSet::new();
    for record in records {
        headers.extend(record.keys().map(|k| k.as_str()));
    }

    let rows = records
        .iter()
        .map(|record| {
            headers
                .iter()
                .map(|h| record.get(*h).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    RawTable::new(headers.into_iter().map(String::from).collect(), rows)
}

fn cell_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

/// Write a pretty-printed array of row objects.
pub fn encode(table: &Table, path: &Path) -> Result<()> {
    let mut writer = create_output(path)?;
    let rows = table.head(table.row_count());

    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|e| TabulaError::encode(path, e))?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| TabulaError::encode(path, e))
}

/// Write one compact row object per line.
pub fn encode_lines(table: &Table, path: &Path) -> Result<()> {
    let mut writer = create_output(path)?;

    for index in 0..table.row_count() {
        if let Some(row) = table.row(index) {
            serde_json::to_writer(&mut writer, &row).map_err(|e| TabulaError::encode(path, e))?;
            writer
                .write_all(b"\n")
                .map_err(|e| TabulaError::encode(path, e))?;
        }
    }

    writer.flush().map_err(|e| TabulaError::encode(path, e))
}
