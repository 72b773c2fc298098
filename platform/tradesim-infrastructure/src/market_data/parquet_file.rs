use super::canonical::{capitalize, parse_local_time, PriceFileSchema, SeriesBuilder, PRICE_COLUMNS};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Schema, TimeUnit};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use tradesim_domain::services::data_quality::DataQualityReport;
use tradesim_domain::value_objects::bar::Bar;

pub fn load_parquet(
    path: &Path,
    schema: &PriceFileSchema,
) -> Result<(Vec<Bar>, DataQualityReport), String> {
    load_parquet_with_step(path, schema, None)
}

/// Reads an OHLC Parquet export with the same row rules as the CSV reader.
///
/// The timestamp column may be text (parsed with `timestamp_format`) or an
/// Arrow timestamp, whose stored value is used without zone conversion. Price columns are
/// cast to `f64`; cells that do not cast count as missing values.
pub fn load_parquet_with_step(
    path: &Path,
    schema: &PriceFileSchema,
    expected_step_seconds: Option<i64>,
) -> Result<(Vec<Bar>, DataQualityReport), String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open price parquet {}: {}", path.display(), err))?;
    let reader_builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|err| format!("failed to read parquet metadata {}: {}", path.display(), err))?;

    let file_schema = reader_builder.schema().clone();
    let ts_idx = field_index(&file_schema, &schema.timestamp_column).ok_or_else(|| {
        format!(
            "missing column '{}' in {}",
            schema.timestamp_column,
            path.display()
        )
    })?;
    let mut price_idx = [0usize; 4];
    for (slot, column) in price_idx.iter_mut().zip(PRICE_COLUMNS) {
        *slot = field_index(&file_schema, column).ok_or_else(|| {
            format!(
                "missing column '{}' in {}",
                capitalize(column),
                path.display()
            )
        })?;
    }

    let reader = reader_builder
        .build()
        .map_err(|err| format!("failed to read parquet {}: {}", path.display(), err))?;

    let mut builder = SeriesBuilder::default();
    let mut row = 0usize;
    for batch in reader {
        let batch =
            batch.map_err(|err| format!("failed to read parquet batch {}: {}", path.display(), err))?;
        let timestamps = timestamp_values(batch.column(ts_idx), &schema.timestamp_format)
            .map_err(|err| {
                format!(
                    "{} column '{}': {}",
                    path.display(),
                    schema.timestamp_column,
                    err
                )
            })?;
        let [open, high, low, close] = price_idx.map(|idx| float_column(batch.column(idx)));
        let (open, high, low, close) = (open?, high?, low?, close?);

        for (i, timestamp) in timestamps.into_iter().enumerate() {
            let Some(timestamp) = timestamp else {
                return Err(format!(
                    "{} row {}: empty '{}' value",
                    path.display(),
                    row + i,
                    schema.timestamp_column
                ));
            };
            builder.push(
                timestamp,
                [
                    cell(&open, i),
                    cell(&high, i),
                    cell(&low, i),
                    cell(&close, i),
                ],
            );
        }
        row += batch.num_rows();
    }

    Ok(builder.finish(expected_step_seconds))
}

fn field_index(schema: &Schema, name: &str) -> Option<usize> {
    let wanted = name.trim().to_lowercase();
    schema
        .fields()
        .iter()
        .position(|f| f.name().trim().to_lowercase() == wanted)
}

fn timestamp_values(column: &ArrayRef, format: &str) -> Result<Vec<Option<i64>>, String> {
    match column.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let text = cast(column, &DataType::Utf8).map_err(|err| err.to_string())?;
            let text = text
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| "expected a text column".to_string())?;
            (0..text.len())
                .map(|i| {
                    if text.is_null(i) {
                        Ok(None)
                    } else {
                        parse_local_time(text.value(i), format).map(Some)
                    }
                })
                .collect()
        }
        DataType::Timestamp(unit, _) => {
            let per_second = match unit {
                TimeUnit::Second => 1,
                TimeUnit::Millisecond => 1_000,
                TimeUnit::Microsecond => 1_000_000,
                TimeUnit::Nanosecond => 1_000_000_000,
            };
            let raw = cast(column, &DataType::Int64).map_err(|err| err.to_string())?;
            let raw = raw
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| "expected an integer timestamp column".to_string())?;
            Ok((0..raw.len())
                .map(|i| (!raw.is_null(i)).then(|| raw.value(i).div_euclid(per_second)))
                .collect())
        }
        other => Err(format!("unsupported timestamp type {other}")),
    }
}

fn float_column(column: &ArrayRef) -> Result<Float64Array, String> {
    let values = cast(column, &DataType::Float64)
        .map_err(|err| format!("unsupported price column type {}: {}", column.data_type(), err))?;
    values
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| "expected a float price column".to_string())
}

fn cell(values: &Float64Array, i: usize) -> Option<f64> {
    (!values.is_null(i)).then(|| values.value(i))
}

#[cfg(test)]
mod tests {
    use super::{load_parquet, load_parquet_with_step};
    use crate::market_data::canonical::PriceFileSchema;
    use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampSecondArray};
    use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::arrow_writer::ArrowWriter;
    use std::fs::{self, File};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_tmp_path(name: &str) -> PathBuf {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("tradesim_{name}_{}_{}", std::process::id(), now))
    }

    fn write_parquet(path: &Path, fields: Vec<Field>, columns: Vec<ArrayRef>) {
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("batch");
        let file = File::create(path).expect("create parquet");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");
    }

    fn price_fields() -> Vec<Field> {
        ["Open", "High", "Low", "Close"]
            .into_iter()
            .map(|name| Field::new(name, DataType::Float64, true))
            .collect()
    }

    #[test]
    fn load_parquet_reads_text_timestamps_and_canonicalizes() {
        let path = unique_tmp_path("xauusd_text.parquet");
        let mut fields = vec![Field::new("Local time", DataType::Utf8, true)];
        fields.extend(price_fields());
        write_parquet(
            &path,
            fields,
            vec![
                Arc::new(StringArray::from(vec![
                    "01.03.2021 10:01:00",
                    "01.03.2021 10:00:00",
                    "01.03.2021 10:02:00",
                    "01.03.2021 10:01:00",
                ])),
                Arc::new(Float64Array::from(vec![Some(1800.0), Some(1799.5), Some(1801.0), Some(1800.5)])),
                Arc::new(Float64Array::from(vec![Some(1801.0), Some(1800.2), None, Some(1802.0)])),
                Arc::new(Float64Array::from(vec![Some(1799.0), Some(1799.4), Some(1800.0), Some(1800.0)])),
                Arc::new(Float64Array::from(vec![Some(1800.5), Some(1800.0), Some(1801.5), Some(1801.0)])),
            ],
        );

        let (bars, report) = load_parquet(&path, &PriceFileSchema::default()).expect("load parquet");
        let _ = fs::remove_file(&path);

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.missing_values, 1);
        assert_eq!(report.out_of_order, 1);
        assert_eq!(report.duplicates, 1);
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_614_592_800);
        assert!((bars[1].close - 1801.0).abs() < 1e-9);
    }

    #[test]
    fn load_parquet_accepts_arrow_timestamps() {
        let path = unique_tmp_path("xauusd_ts.parquet");
        let mut fields = vec![Field::new(
            "Local time",
            DataType::Timestamp(TimeUnit::Second, None),
            false,
        )];
        fields.extend(price_fields());
        let closes = vec![1800.0, 1801.0, 1802.0];
        write_parquet(
            &path,
            fields,
            vec![
                Arc::new(TimestampSecondArray::from(vec![
                    1_614_592_800,
                    1_614_592_860,
                    1_614_593_100,
                ])),
                Arc::new(Float64Array::from(closes.clone())),
                Arc::new(Float64Array::from(closes.clone())),
                Arc::new(Float64Array::from(closes.clone())),
                Arc::new(Float64Array::from(closes)),
            ],
        );

        let (bars, report) = load_parquet_with_step(&path, &PriceFileSchema::default(), Some(60))
            .expect("load parquet");
        let _ = fs::remove_file(&path);

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1].timestamp, 1_614_592_860);
        assert_eq!(report.gaps, 1);
        assert_eq!(report.missing_bars, 3);
    }

    #[test]
    fn load_parquet_reports_missing_price_column() {
        let path = unique_tmp_path("xauusd_no_close.parquet");
        write_parquet(
            &path,
            vec![
                Field::new("Local time", DataType::Utf8, false),
                Field::new("Open", DataType::Float64, false),
                Field::new("High", DataType::Float64, false),
                Field::new("Low", DataType::Float64, false),
            ],
            vec![
                Arc::new(StringArray::from(vec!["01.03.2021 10:00:00"])),
                Arc::new(Float64Array::from(vec![1.0])),
                Arc::new(Float64Array::from(vec![1.0])),
                Arc::new(Float64Array::from(vec![1.0])),
            ],
        );

        let err = load_parquet(&path, &PriceFileSchema::default()).expect_err("missing column");
        let _ = fs::remove_file(&path);
        assert!(err.contains("missing column 'Close'"), "{err}");
    }
}
