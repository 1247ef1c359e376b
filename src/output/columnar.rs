use arrow::{
    array::{ArrayRef, Float64Array, Int64Array, StringArray, UInt64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, basic::Compression, file::properties::WriterProperties};
use std::{fs::File, io, path::Path, sync::Arc};

use super::{PulseRow, BASE_COLUMNS, THEME_COLUMN};
use crate::error::{PulseError, Result};

/// Arrow schema for the pulse table, same column order as the CSV.
pub fn pulse_schema(include_theme: bool) -> Schema {
    let types = [
        (DataType::Utf8, false),
        (DataType::Utf8, false),
        (DataType::Utf8, false),
        (DataType::UInt64, false),
        (DataType::Float64, false),
        (DataType::Float64, false),
        (DataType::Int64, true),
        (DataType::Float64, false),
    ];
    let mut fields: Vec<Field> = BASE_COLUMNS
        .iter()
        .zip(types)
        .map(|(name, (ty, nullable))| Field::new(*name, ty, nullable))
        .collect();
    if include_theme {
        fields.push(Field::new(THEME_COLUMN, DataType::Float64, false));
    }
    Schema::new(fields)
}

fn to_batch(rows: &[PulseRow], include_theme: bool) -> std::result::Result<RecordBatch, arrow::error::ArrowError> {
    let mut cols: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.date_utc.format("%Y-%m-%d").to_string()),
        )),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.region_code.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.proj_type_code.as_str()))),
        Arc::new(UInt64Array::from_iter_values(rows.iter().map(|r| r.role_count_day))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.lead_share_pct_day))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.union_share_pct_day))),
        Arc::new(Int64Array::from(
            rows.iter()
                .map(|r| r.median_rate_day_usd.map(|m| m as i64))
                .collect::<Vec<Option<i64>>>(),
        )),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.sentiment_avg_day))),
    ];
    if include_theme {
        cols.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.theme_ai_share_pct_day),
        )));
    }
    RecordBatch::try_new(Arc::new(pulse_schema(include_theme)), cols)
}

/// Write the pulse as a single Snappy-compressed Parquet file.
pub fn write_parquet(path: &Path, rows: &[PulseRow], include_theme: bool) -> Result<()> {
    let batch = to_batch(rows, include_theme).map_err(|e| other(path, e))?;
    let file = File::create(path).map_err(|e| PulseError::output(path, e))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props)).map_err(|e| other(path, e))?;
    writer.write(&batch).map_err(|e| other(path, e))?;
    writer.close().map_err(|e| other(path, e))?;
    Ok(())
}

fn other(path: &Path, e: impl std::fmt::Display) -> PulseError {
    PulseError::output(path, io::Error::other(e.to_string()))
}
