use chrono::{NaiveDateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use tradesim_domain::services::data_quality::DataQualityReport;
use tradesim_domain::value_objects::bar::Bar;

pub const DEFAULT_TIMESTAMP_COLUMN: &str = "Local time";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

pub(crate) const PRICE_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];

/// Column layout of a price export, shared by the CSV and Parquet readers.
/// Price columns are always `Open, High, Low, Close` (case-insensitive);
/// extra columns are ignored. `timestamp_format` applies to text timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFileSchema {
    pub timestamp_column: String,
    pub timestamp_format: String,
}

impl Default for PriceFileSchema {
    fn default() -> Self {
        Self {
            timestamp_column: DEFAULT_TIMESTAMP_COLUMN.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Parses a wall-clock timestamp with `format`, dropping a trailing
/// ` GMT+hhmm` marker. The value is kept as-is and stored as if it were UTC.
pub fn parse_local_time(value: &str, format: &str) -> Result<i64, String> {
    let trimmed = value.trim();
    let without_zone = match trimmed.find(" GMT") {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    let naive = NaiveDateTime::parse_from_str(without_zone, format)
        .map_err(|err| format!("unsupported timestamp '{}' (expected {}): {}", value, format, err))?;
    Ok(Utc.from_utc_datetime(&naive).timestamp())
}

pub(crate) fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accumulates raw rows into ascending, de-duplicated bars while counting
/// what had to be dropped. The last row for a timestamp wins.
#[derive(Debug, Default)]
pub(crate) struct SeriesBuilder {
    bars_by_ts: BTreeMap<i64, Bar>,
    report: DataQualityReport,
    last_seen_ts: Option<i64>,
}

impl SeriesBuilder {
    /// `prices` is `[open, high, low, close]`; `None` marks a missing or
    /// unreadable cell.
    pub(crate) fn push(&mut self, timestamp: i64, prices: [Option<f64>; 4]) {
        self.report.rows_read += 1;

        let [Some(open), Some(high), Some(low), Some(close)] = prices else {
            self.report.missing_values += 1;
            return;
        };
        if ![open, high, low, close].iter().all(|v| v.is_finite()) {
            self.report.missing_values += 1;
            return;
        }
        let bar = Bar {
            timestamp,
            open,
            high,
            low,
            close,
        };
        if !bar.is_well_formed() {
            self.report.invalid_bars += 1;
            return;
        }

        if self.last_seen_ts.is_some_and(|prev| timestamp < prev) {
            self.report.out_of_order += 1;
            self.report.first_out_of_order.get_or_insert(timestamp);
        }
        self.last_seen_ts = Some(timestamp);

        if self.bars_by_ts.insert(timestamp, bar).is_some() {
            self.report.duplicates += 1;
            self.report.first_duplicate.get_or_insert(timestamp);
        }
    }

    pub(crate) fn finish(self, expected_step_seconds: Option<i64>) -> (Vec<Bar>, DataQualityReport) {
        let bars: Vec<Bar> = self.bars_by_ts.into_values().collect();
        let mut report = self.report;
        report.record_coverage(&bars, expected_step_seconds);
        (bars, report)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_local_time, SeriesBuilder};

    #[test]
    fn parse_local_time_accepts_gmt_suffix() {
        let plain = parse_local_time("01.03.2021 10:00:00", "%d.%m.%Y %H:%M:%S").expect("plain");
        let zoned = parse_local_time("01.03.2021 10:00:00.000 GMT+0200", "%d.%m.%Y %H:%M:%S%.f")
            .expect("zoned");
        assert_eq!(plain, 1_614_592_800);
        assert_eq!(zoned, plain);
        assert!(parse_local_time("2021-03-01 10:00", "%d.%m.%Y %H:%M:%S").is_err());
    }

    #[test]
    fn builder_counts_every_dropped_row_kind() {
        let mut builder = SeriesBuilder::default();
        builder.push(120, [Some(2.0), Some(3.0), Some(1.0), Some(2.0)]);
        builder.push(60, [Some(1.0), None, Some(1.0), Some(1.0)]);
        builder.push(60, [Some(1.0), Some(f64::NAN), Some(1.0), Some(1.0)]);
        builder.push(60, [Some(1.0), Some(0.5), Some(1.0), Some(1.0)]);
        builder.push(0, [Some(1.0), Some(1.0), Some(1.0), Some(1.0)]);
        builder.push(0, [Some(1.5), Some(2.0), Some(1.0), Some(1.5)]);

        let (bars, report) = builder.finish(Some(60));
        assert_eq!(report.rows_read, 6);
        assert_eq!(report.missing_values, 2);
        assert_eq!(report.invalid_bars, 1);
        assert_eq!(report.out_of_order, 1);
        assert_eq!(report.first_out_of_order, Some(0));
        assert_eq!(report.duplicates, 1);
        assert_eq!(bars.iter().map(|b| b.timestamp).collect::<Vec<_>>(), vec![0, 120]);
        assert!((bars[0].close - 1.5).abs() < 1e-12);
        assert_eq!(report.gaps, 1);
    }
}
