use std::path::{Path, PathBuf};
use tradesim_application::config::Config;
use tradesim_domain::repositories::market_data::MarketDataRepository;
use tradesim_infrastructure::market_data::{FileMarketDataRepository, PriceFileSchema};

/// `--data` wins over `[data].path`.
pub fn resolve_data_path(config: &Config, data_override: Option<&Path>) -> PathBuf {
    data_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(config.data_path()))
}

pub fn build_market_data_repo(
    config: &Config,
    data_override: Option<&Path>,
) -> Box<dyn MarketDataRepository> {
    let schema = PriceFileSchema {
        timestamp_column: config.timestamp_column().to_string(),
        timestamp_format: config.timestamp_format().to_string(),
    };
    Box::new(FileMarketDataRepository::new(
        resolve_data_path(config, data_override),
        schema,
    ))
}
