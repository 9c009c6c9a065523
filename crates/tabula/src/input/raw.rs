//! Untyped records as they come out of a decoder.

use std::collections::HashSet;

use tracing::warn;

/// Decoded tabular text before type inference.
///
/// Every decoder produces one of these; nulls from typed formats (JSON
/// `null`, empty spreadsheet cells, Parquet nulls) arrive as empty strings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a raw table, normalizing headers and row widths.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers = unique_headers(headers);
        let width = headers.len();

        let mut padded = 0usize;
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() != width {
                    padded += 1;
                    row.resize(width, String::new());
                }
                row
            })
            .collect();

        if padded > 0 {
            warn!(rows = padded, width, "resized ragged rows to header width");
        }

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

/// Fill blank headers and suffix duplicates so names are unique.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = match header.trim() {
            "" => format!("column_{}", i + 1),
            trimmed => trimmed.to_string(),
        };

        let mut name = base.clone();
        let mut n = 2;
        while seen.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        if name != base {
            warn!(original = %base, renamed = %name, "renamed duplicate header");
        }

        seen.insert(name.clone());
        out.push(name);
    }

    out
}
