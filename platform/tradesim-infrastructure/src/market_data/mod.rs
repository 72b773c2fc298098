pub mod canonical;
pub mod discovery;
pub mod ohlc;
pub mod parquet_file;

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tradesim_domain::aggregates::price_series::PriceSeries;
use tradesim_domain::repositories::market_data::{MarketDataRepository, SeriesQuery};
use tradesim_domain::services::data_quality::DataQualityReport;
use tradesim_domain::value_objects::bar::Bar;

pub use canonical::{parse_local_time, PriceFileSchema};
pub use discovery::find_instrument_file;
pub use ohlc::{load_csv, load_csv_with_step};
pub use parquet_file::{load_parquet, load_parquet_with_step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceFileFormat {
    Csv,
    Parquet,
}

impl PriceFileFormat {
    /// `.parquet` (any case) selects Parquet; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        let is_parquet = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"));
        if is_parquet {
            Self::Parquet
        } else {
            Self::Csv
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

pub fn load_price_file(
    path: &Path,
    schema: &PriceFileSchema,
    expected_step_seconds: Option<i64>,
) -> Result<(Vec<Bar>, DataQualityReport), String> {
    match PriceFileFormat::from_path(path) {
        PriceFileFormat::Csv => load_csv_with_step(path, schema, expected_step_seconds),
        PriceFileFormat::Parquet => load_parquet_with_step(path, schema, expected_step_seconds),
    }
}

/// Price files on the local filesystem. `path` is either a CSV/Parquet file
/// or a directory searched for the query's symbol.
#[derive(Debug, Clone)]
pub struct FileMarketDataRepository {
    path: PathBuf,
    schema: PriceFileSchema,
}

impl FileMarketDataRepository {
    pub fn new(path: impl Into<PathBuf>, schema: PriceFileSchema) -> Self {
        Self {
            path: path.into(),
            schema,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &PriceFileSchema {
        &self.schema
    }
}

impl MarketDataRepository for FileMarketDataRepository {
    fn load_series(&self, query: &SeriesQuery) -> Result<(PriceSeries, DataQualityReport), String> {
        let start = Instant::now();
        let mut format = PriceFileFormat::Csv;
        let result = find_instrument_file(&self.path, &query.symbol).and_then(|file| {
            format = PriceFileFormat::from_path(&file);
            let (bars, report) = load_price_file(&file, &self.schema, query.expected_step_seconds)?;
            let series = PriceSeries::new(bars)
                .map_err(|err| format!("failed to build price series from {}: {}", file.display(), err))?;
            info!(
                file = %file.display(),
                format = format.label(),
                symbol = %query.symbol,
                bars = series.len(),
                duplicates = report.duplicates,
                gaps = report.gaps,
                "loaded price series"
            );
            if report.dropped_rows() > 0 {
                warn!(
                    file = %file.display(),
                    missing_values = report.missing_values,
                    invalid_bars = report.invalid_bars,
                    "dropped unusable price rows"
                );
            }
            Ok((series, report))
        });

        let result_label = if result.is_ok() { "ok" } else { "err" };
        metrics::counter!(
            "tradesim.infra.price_file.load.calls_total",
            "result" => result_label,
            "format" => format.label()
        )
        .increment(1);
        metrics::histogram!("tradesim.infra.price_file.load_ms", "result" => result_label)
            .record(start.elapsed().as_millis() as f64);
        result
    }
}
