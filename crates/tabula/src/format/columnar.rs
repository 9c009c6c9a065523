//! Apache Parquet through Arrow record batches.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Result, TabulaError};
use crate::input::RawTable;
use crate::table::{Column, ColumnType, Table, Value};

use super::open_error;

/// Decode every row group into raw text cells.
pub fn decode(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| open_error(path, e))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| TabulaError::decode(path, e))?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(|e| TabulaError::decode(path, e))?;

    let options = FormatOptions::default();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for batch in reader {
        let batch = batch.map_err(|e| TabulaError::decode(path, e))?;
        let start = rows.len();
        rows.resize_with(start + batch.num_rows(), || Vec::with_capacity(headers.len()));

        for array in batch.columns() {
            let formatter = ArrayFormatter::try_new(array.as_ref(), &options)
                .map_err(|e| TabulaError::decode(path, e))?;
            for i in 0..batch.num_rows() {
                let cell = if array.is_null(i) {
                    String::new()
                } else {
                    formatter.value(i).to_string()
                };
                rows[start + i].push(cell);
            }
        }
    }

    Ok(RawTable::new(headers, rows))
}

/// Encode the table as a single row group.
///
/// Columns whose cells do not all hold their inferred type are written as
/// UTF-8 text so no value is lost.
pub fn encode(table: &Table, path: &Path) -> Result<()> {
    let (fields, arrays): (Vec<Field>, Vec<ArrayRef>) =
        table.columns().iter().map(column_to_arrow).unzip();

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    let batch = RecordBatch::try_new_with_options(schema.clone(), arrays, &options)
        .map_err(|e| TabulaError::encode(path, e))?;

    let file = File::create(path).map_err(|e| TabulaError::encode(path, e))?;
    let mut writer =
        ArrowWriter::try_new(file, schema, None).map_err(|e| TabulaError::encode(path, e))?;
    writer
        .write(&batch)
        .map_err(|e| TabulaError::encode(path, e))?;
    writer.close().map_err(|e| TabulaError::encode(path, e))?;
    Ok(())
}

fn column_to_arrow(column: &Column) -> (Field, ArrayRef) {
    let column_type = if column.is_uniform() {
        column.inferred_type
    } else {
        ColumnType::String
    };

    let array: ArrayRef = match column_type {
        ColumnType::Integer => Arc::new(Int64Array::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Float => Arc::new(Float64Array::from(
            column.values.iter().map(Value::as_f64).collect::<Vec<_>>(),
        )),
        ColumnType::Boolean => Arc::new(BooleanArray::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    Value::Boolean(b) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Date => Arc::new(Date32Array::from(
            column
                .values
                .iter()
                .map(|v| match v {
                    Value::Date(d) => Some(days_since_epoch(*d)),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::String | ColumnType::Null => Arc::new(StringArray::from(
            column
                .values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_text()))
                .collect::<Vec<_>>(),
        )),
    };

    let field = Field::new(column.name.as_str(), arrow_type(column_type), true);
    (field, array)
}

fn arrow_type(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Integer => DataType::Int64,
        ColumnType::Float => DataType::Float64,
        ColumnType::Boolean => DataType::Boolean,
        ColumnType::Date => DataType::Date32,
        ColumnType::String | ColumnType::Null => DataType::Utf8,
    }
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.signed_duration_since(NaiveDate::default()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_typed_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("people.parquet");

        let table = Table::new(
            &path,
            vec![
                Column::new(
                    "age",
                    ColumnType::Integer,
                    vec![Value::Integer(28), Value::Null],
                ),
                Column::new(
                    "hired",
                    ColumnType::Date,
                    vec![
                        Value::Date(NaiveDate::from_ymd_opt(2022, 3, 15).unwrap()),
                        Value::Date(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()),
                    ],
                ),
            ],
        )
        .unwrap();

        encode(&table, &path).unwrap();
        let raw = decode(&path).unwrap();

        assert_eq!(raw.headers, vec!["age", "hired"]);
        assert_eq!(raw.rows[0], vec!["28", "2022-03-15"]);
        assert_eq!(raw.rows[1], vec!["", "1969-12-31"]);
    }

    #[test]
    fn test_mixed_column_written_as_text() {
        let column = Column::new(
            "n",
            ColumnType::Integer,
            vec![Value::Integer(1), Value::String("ten".into())],
        );
        let (field, _) = column_to_arrow(&column);
        assert_eq!(field.data_type(), &DataType::Utf8);
    }
}
