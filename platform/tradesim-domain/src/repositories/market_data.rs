use crate::aggregates::price_series::PriceSeries;
use crate::services::data_quality::DataQualityReport;

#[derive(Debug, Clone)]
pub struct SeriesQuery {
    pub symbol: String,
    pub expected_step_seconds: Option<i64>,
}

pub trait MarketDataRepository {
    fn load_series(&self, query: &SeriesQuery) -> Result<(PriceSeries, DataQualityReport), String>;
}
