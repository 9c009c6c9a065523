//! Spreadsheet workbooks (first worksheet only).

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, DataType, Ods, Range, Reader, Xls, Xlsx};
use chrono::NaiveDateTime;

use crate::error::{Result, TabulaError};
use crate::input::RawTable;

use super::read_source;
use super::registry::SheetKind;

/// Decode the first worksheet; its first row is the header.
pub fn decode(path: &Path, kind: SheetKind) -> Result<RawTable> {
    let contents = read_source(path)?;

    let range = match kind {
        SheetKind::Xlsx => first_sheet::<Xlsx<Cursor<&[u8]>>>(&contents),
        SheetKind::Xls => first_sheet::<Xls<Cursor<&[u8]>>>(&contents),
        SheetKind::Ods => first_sheet::<Ods<Cursor<&[u8]>>>(&contents),
    }
    .map_err(|e| TabulaError::decode(path, e))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(cell_text).collect::<Vec<String>>());

    let headers = rows.next().unwrap_or_default();
    Ok(RawTable::new(headers, rows.collect()))
}

fn first_sheet<'a, R>(bytes: &'a [u8]) -> std::result::Result<Range<Data>, String>
where
    R: Reader<Cursor<&'a [u8]>>,
    R::Error: std::fmt::Display,
{
    let mut workbook = R::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| "workbook has no worksheets".to_string())?
        .map_err(|e| e.to_string())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(format_datetime)
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string(),
    }
}

/// Midnight timestamps are plain dates in a worksheet.
fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == chrono::NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}
