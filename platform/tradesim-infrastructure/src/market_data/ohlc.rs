use super::canonical::{capitalize, parse_local_time, PriceFileSchema, SeriesBuilder, PRICE_COLUMNS};
use csv::StringRecord;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tradesim_domain::services::data_quality::DataQualityReport;
use tradesim_domain::value_objects::bar::Bar;

#[derive(Debug, Deserialize)]
struct OhlcRecord {
    #[serde(default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
}

impl OhlcRecord {
    fn prices(&self) -> [Option<f64>; 4] {
        [self.open, self.high, self.low, self.close]
    }
}

pub fn load_csv(
    path: &Path,
    schema: &PriceFileSchema,
) -> Result<(Vec<Bar>, DataQualityReport), String> {
    load_csv_with_step(path, schema, None)
}

/// Reads a headered OHLC export into ascending, de-duplicated bars.
///
/// Rows with a missing or non-numeric price are dropped (`missing_values`),
/// rows whose prices break the high/low envelope are dropped (`invalid_bars`).
/// A timestamp that does not parse is a hard error.
pub fn load_csv_with_step(
    path: &Path,
    schema: &PriceFileSchema,
    expected_step_seconds: Option<i64>,
) -> Result<(Vec<Bar>, DataQualityReport), String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open price CSV {}: {}", path.display(), err))?;
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read CSV header {}: {}", path.display(), err))?
        .clone();
    let normalized: StringRecord = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let ts_idx = column_index(&normalized, &schema.timestamp_column.to_lowercase())
        .ok_or_else(|| {
            format!(
                "missing column '{}' in {}",
                schema.timestamp_column,
                path.display()
            )
        })?;
    for column in PRICE_COLUMNS {
        if column_index(&normalized, column).is_none() {
            return Err(format!(
                "missing column '{}' in {}",
                capitalize(column),
                path.display()
            ));
        }
    }

    let mut builder = SeriesBuilder::default();
    for result in reader.records() {
        let record = result.map_err(|err| format!("failed to parse CSV row: {}", err))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let raw_ts = record.get(ts_idx).unwrap_or("");
        let timestamp = parse_local_time(raw_ts, &schema.timestamp_format)
            .map_err(|err| format!("{} line {}: {}", path.display(), line, err))?;

        let fields: OhlcRecord = record
            .deserialize(Some(&normalized))
            .map_err(|err| format!("failed to parse CSV row at line {}: {}", line, err))?;
        builder.push(timestamp, fields.prices());
    }

    Ok(builder.finish(expected_step_seconds))
}

fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}
