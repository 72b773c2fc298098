use std::path::Path;
use tradesim_application::config::{load_config, Config};
use tradesim_application::monitoring::Levels;

pub(super) fn load_optional_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => load_config(path),
        None => Ok(Config::default()),
    }
}

pub(super) fn log_config_summary(command: &str, config: &Config, data: &Path) {
    tracing::info!(
        command,
        data = %data.display(),
        timestamp_column = config.timestamp_column(),
        timestamp_format = config.timestamp_format(),
        output = ?config.output_format(),
        "tradesim cli"
    );
}

/// Exactly one of the two level pairs must be given, and completely.
pub(super) fn resolve_levels(
    sl: Option<f64>,
    tp: Option<f64>,
    sl_pips: Option<f64>,
    tp_pips: Option<f64>,
) -> Result<Levels, String> {
    match (sl, tp, sl_pips, tp_pips) {
        (Some(stop_loss), Some(take_profit), None, None) => Ok(Levels::Prices {
            stop_loss,
            take_profit,
        }),
        (None, None, Some(stop_loss_pips), Some(take_profit_pips)) => Ok(Levels::Pips {
            stop_loss_pips,
            take_profit_pips,
        }),
        _ => Err("invalid input: pass either --sl and --tp, or --sl-pips and --tp-pips".to_string()),
    }
}
