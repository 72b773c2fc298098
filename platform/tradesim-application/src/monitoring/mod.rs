use crate::config::Config;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, info_span};
use tradesim_domain::aggregates::price_series::PriceSeries;
use tradesim_domain::entities::instrument::Instrument;
use tradesim_domain::repositories::market_data::{MarketDataRepository, SeriesQuery};
use tradesim_domain::services::data_quality::DataQualityReport;
use tradesim_domain::services::simulator::Simulator;
use tradesim_domain::value_objects::outcome::{SimulationOutcome, TradeResult};
use tradesim_domain::value_objects::side::Side;
use tradesim_domain::value_objects::trade_request::{ScanPolicy, TradeRequest};

/// Stop-loss and take-profit as absolute prices or as pip distances from the
/// entry close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Levels {
    Prices {
        stop_loss: f64,
        take_profit: f64,
    },
    Pips {
        stop_loss_pips: f64,
        take_profit_pips: f64,
    },
}

impl Levels {
    /// Absolute `(stop_loss, take_profit)` for a trade entered at `entry_price`.
    pub fn resolve(
        &self,
        side: Side,
        entry_price: f64,
        instrument: &Instrument,
    ) -> Result<(f64, f64), String> {
        match *self {
            Levels::Prices {
                stop_loss,
                take_profit,
            } => {
                if !stop_loss.is_finite() || !take_profit.is_finite() {
                    return Err("invalid input: SL and TP prices must be finite".to_string());
                }
                Ok((stop_loss, take_profit))
            }
            Levels::Pips {
                stop_loss_pips,
                take_profit_pips,
            } => {
                for (name, pips) in [("SL", stop_loss_pips), ("TP", take_profit_pips)] {
                    if !pips.is_finite() || pips < 0.0 {
                        return Err(format!(
                            "invalid input: {name} pips must be finite and >= 0 (got {pips})"
                        ));
                    }
                }
                let dir = side.direction();
                Ok((
                    entry_price - dir * instrument.pips_to_price(stop_loss_pips),
                    entry_price + dir * instrument.pips_to_price(take_profit_pips),
                ))
            }
        }
    }
}

/// One manually specified trade, as entered by a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeTicket {
    pub side: Side,
    pub entry_time: i64,
    pub levels: Levels,
    /// `None` runs the plain race only; `Some(_)` adds the 3R scan.
    pub breakeven: Option<bool>,
}

impl TradeTicket {
    pub fn policy(&self) -> ScanPolicy {
        ScanPolicy::from_breakeven(self.breakeven)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeReport {
    pub symbol: String,
    pub ticket: TradeTicket,
    pub outcome: SimulationOutcome,
}

/// Loads the configured series once and simulates `ticket` against it.
pub fn monitor_trade(
    config: &Config,
    ticket: &TradeTicket,
    market_data: &dyn MarketDataRepository,
) -> Result<TradeReport, String> {
    let instrument = config.instrument()?;
    let _span = info_span!(
        "monitor_trade",
        symbol = %instrument.symbol,
        side = %ticket.side,
        entry_time = ticket.entry_time,
        policy = ?ticket.policy()
    )
    .entered();

    let (series, _report) = load_series(config, &instrument, market_data)?;
    evaluate_ticket(&Simulator::new(instrument), &series, ticket)
}

pub fn load_series(
    config: &Config,
    instrument: &Instrument,
    market_data: &dyn MarketDataRepository,
) -> Result<(PriceSeries, DataQualityReport), String> {
    let stage_start = Instant::now();
    let loaded = market_data.load_series(&SeriesQuery {
        symbol: instrument.symbol.clone(),
        expected_step_seconds: Some(config.expected_step_seconds()?),
    })?;
    metrics::histogram!("tradesim.load_series_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    Ok(loaded)
}

/// Resolves the ticket against an already loaded series and runs the scan.
pub fn evaluate_ticket(
    simulator: &Simulator,
    series: &PriceSeries,
    ticket: &TradeTicket,
) -> Result<TradeReport, String> {
    let instrument = simulator.instrument();
    let Some(entry_bar) = series.lookup_exact(ticket.entry_time) else {
        return Ok(finish(
            instrument,
            ticket,
            SimulationOutcome::rejected(ticket.policy(), TradeResult::NoDataAtEntry),
        ));
    };
    let (stop_loss, take_profit) = ticket
        .levels
        .resolve(ticket.side, entry_bar.close, instrument)?;

    let request = TradeRequest {
        side: ticket.side,
        entry_time: ticket.entry_time,
        stop_loss,
        take_profit,
        breakeven: ticket.breakeven,
    };

    let sim_start = Instant::now();
    let outcome = simulator.simulate(series, &request);
    metrics::histogram!("tradesim.simulate_us").record(sim_start.elapsed().as_micros() as f64);

    for event in &outcome.events {
        debug!(
            kind = ?event.kind,
            phase = ?event.phase,
            price = event.price,
            timestamp = event.timestamp,
            runtime = %event.runtime(),
            "trade event"
        );
    }

    Ok(finish(instrument, ticket, outcome))
}

fn finish(instrument: &Instrument, ticket: &TradeTicket, outcome: SimulationOutcome) -> TradeReport {
    let label = outcome.result.label();
    metrics::counter!("tradesim.simulations_total", "result" => label).increment(1);
    info!(result = label, events = outcome.events.len(), "simulation finished");
    TradeReport {
        symbol: instrument.symbol.clone(),
        ticket: ticket.clone(),
        outcome,
    }
}
