//! CSV/TSV and other delimited text.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, TabulaError};
use crate::input::RawTable;
use crate::table::Table;

use super::sniff::detect_delimiter;
use super::{create_output, read_source};

/// Decode delimited text. `None` detects the delimiter from content.
pub fn decode(path: &Path, delimiter: Option<u8>) -> Result<RawTable> {
    let contents = read_source(path)?;

    let delimiter = match delimiter {
        Some(d) => d,
        None => {
            let detected = detect_delimiter(&contents).unwrap_or(b',');
            debug!(delimiter = %(detected as char).escape_default(), "detected delimiter");
            detected
        }
    };

    parse_bytes(&contents, delimiter).map_err(|e| TabulaError::decode(path, e))
}

/// Parse bytes with a header row.
fn parse_bytes(bytes: &[u8], delimiter: u8) -> std::result::Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Write `table` with a header row.
pub fn encode(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(create_output(path)?);

    writer
        .write_record(table.columns().iter().map(|c| c.name.as_str()))
        .map_err(|e| TabulaError::encode(path, e))?;

    for row in 0..table.row_count() {
        writer
            .write_record(table.columns().iter().map(|c| c.values[row].to_text()))
            .map_err(|e| TabulaError::encode(path, e))?;
    }

    writer.flush().map_err(|e| TabulaError::encode(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv() {
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0], "Alice");
        assert_eq!(table.rows[1][1], "25");
    }

    #[test]
    fn test_parse_quoted_fields() {
        let data = b"name,note\n\"Smith, Jo\",\"said \"\"hi\"\"\"\n";
        let table = parse_bytes(data, b',').unwrap();
        assert_eq!(table.rows[0], vec!["Smith, Jo", "said \"hi\""]);
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_bytes(b"a,b\n", b',').unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let data = b"a,b\n\xff\xfe,1\n";
        assert!(parse_bytes(data, b',').is_err());
    }
}
