use crate::config::Config;
use crate::monitoring::load_series;
use tracing::info_span;
use tradesim_domain::repositories::market_data::MarketDataRepository;
use tradesim_domain::services::data_quality::DataQualityReport;

pub const STRICT_FAILURE: &str = "strict validation failed: data quality limits exceeded";

/// Loads the configured series and reports its data-quality counts.
/// With `strict`, any count above its configured limit is an error.
pub fn validate(
    config: &Config,
    strict: bool,
    market_data: &dyn MarketDataRepository,
) -> Result<serde_json::Value, String> {
    let instrument = config.instrument()?;
    let _span = info_span!(
        "validate",
        strict = strict,
        symbol = %instrument.symbol,
        data = %config.data_path()
    )
    .entered();

    let (series, report) = load_series(config, &instrument, market_data)?;

    let limits = config.data_quality.as_ref();
    let max_duplicates = limits.and_then(|l| l.max_duplicates).unwrap_or(0);
    let max_out_of_order = limits.and_then(|l| l.max_out_of_order).unwrap_or(0);
    let max_invalid_bars = limits.and_then(|l| l.max_invalid_bars).unwrap_or(0);
    let max_missing_values = limits.and_then(|l| l.max_missing_values);
    let max_gaps = limits.and_then(|l| l.max_gaps);

    let exceeded = report.duplicates > max_duplicates
        || report.out_of_order > max_out_of_order
        || report.invalid_bars > max_invalid_bars
        || max_missing_values.is_some_and(|max| report.missing_values > max)
        || max_gaps.is_some_and(|max| report.gaps > max);
    if strict && exceeded {
        return Err(STRICT_FAILURE.to_string());
    }

    metrics::gauge!("tradesim.validate.bars").set(series.len() as f64);
    metrics::gauge!("tradesim.validate.gaps").set(report.gaps as f64);
    metrics::gauge!("tradesim.validate.duplicates").set(report.duplicates as f64);
    metrics::gauge!("tradesim.validate.out_of_order").set(report.out_of_order as f64);
    metrics::gauge!("tradesim.validate.dropped_rows").set(report.dropped_rows() as f64);

    Ok(serde_json::json!({
        "symbol": instrument.symbol,
        "series": data_quality_json(&report, series.len()),
        "limits": {
            "max_duplicates": max_duplicates,
            "max_out_of_order": max_out_of_order,
            "max_invalid_bars": max_invalid_bars,
            "max_missing_values": max_missing_values,
            "max_gaps": max_gaps,
        },
        "within_limits": !exceeded,
        "strict": strict
    }))
}

fn data_quality_json(report: &DataQualityReport, bars: usize) -> serde_json::Value {
    serde_json::json!({
        "bars": bars,
        "rows_read": report.rows_read,
        "duplicates": report.duplicates,
        "out_of_order": report.out_of_order,
        "missing_values": report.missing_values,
        "invalid_bars": report.invalid_bars,
        "gaps": report.gaps,
        "missing_bars": report.missing_bars,
        "first_timestamp": report.first_timestamp,
        "last_timestamp": report.last_timestamp,
        "first_gap": report.first_gap,
        "first_duplicate": report.first_duplicate,
        "first_out_of_order": report.first_out_of_order,
        "max_gap_seconds": report.max_gap_seconds,
    })
}
