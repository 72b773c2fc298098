//! Single-trade outcome simulation over an immutable price series.
//!
//! The primary pass races take-profit against stop-loss. The 3R policies run
//! a second, independent pass over the same bars looking for the 3R target,
//! with an optional breakeven stop. Both passes share one loop driven by a
//! per-phase rule table; rules are evaluated in table order on every bar and
//! the first terminal rule ends the pass.
//!
//! Intrabar ordering is an approximation: an OHLC bar cannot say which
//! extreme traded first, so same-bar ties resolve in table order (take-profit
//! before stop-loss in the race; stop-loss, breakeven, 3R in the secondary
//! pass).

mod levels;

pub use levels::{validate_levels, THREE_R_MULTIPLE};

use crate::aggregates::price_series::PriceSeries;
use crate::entities::instrument::Instrument;
use crate::value_objects::bar::Bar;
use crate::value_objects::outcome::{SimulationOutcome, TradeResult};
use crate::value_objects::trade_event::{EventKind, Phase, TradeEvent};
use crate::value_objects::trade_request::{ScanPolicy, TradeRequest};
use levels::TradeLevels;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    TakeProfit,
    StopLoss,
    ArmBreakeven,
    BreakevenRetrace,
    ThreeR,
}

const RACE_RULES: &[Rule] = &[Rule::TakeProfit, Rule::StopLoss];
const BREAKEVEN_THREE_R_RULES: &[Rule] = &[
    Rule::StopLoss,
    Rule::ArmBreakeven,
    Rule::BreakevenRetrace,
    Rule::ThreeR,
];
const THREE_R_ONLY_RULES: &[Rule] = &[Rule::StopLoss, Rule::ThreeR];

fn secondary_rules(policy: ScanPolicy) -> Option<&'static [Rule]> {
    match policy {
        ScanPolicy::PlainRace => None,
        ScanPolicy::BreakevenThreeR => Some(BREAKEVEN_THREE_R_RULES),
        ScanPolicy::ThreeROnly => Some(THREE_R_ONLY_RULES),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    BreakevenArmed,
    Resolved(EventKind),
}

#[derive(Debug, Clone, Default)]
pub struct Simulator {
    instrument: Instrument,
}

impl Simulator {
    pub fn new(instrument: Instrument) -> Self {
        Self { instrument }
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn simulate(&self, series: &PriceSeries, request: &TradeRequest) -> SimulationOutcome {
        let policy = request.policy();

        let Some(entry_bar) = series.lookup_exact(request.entry_time) else {
            return SimulationOutcome::rejected(policy, TradeResult::NoDataAtEntry);
        };
        let entry_price = entry_bar.close;

        if let Err(failure) = validate_levels(
            request.side,
            entry_price,
            request.stop_loss,
            request.take_profit,
        ) {
            return SimulationOutcome::rejected(policy, failure.into());
        }

        let levels = TradeLevels::new(
            request.side,
            request.entry_time,
            entry_price,
            request.stop_loss,
            request.take_profit,
            &self.instrument,
        );

        let remaining = series.after(request.entry_time);
        let Some(last_bar) = remaining.last() else {
            return SimulationOutcome {
                policy,
                entry: Some(levels.context()),
                events: Vec::new(),
                result: TradeResult::NoDataAfterEntry,
            };
        };

        let mut events = Vec::new();
        let primary = run_pass(remaining, RACE_RULES, Phase::Primary, &levels, &mut events);
        let terminal = match secondary_rules(policy) {
            None => primary,
            Some(rules) => run_pass(remaining, rules, Phase::Secondary, &levels, &mut events),
        };

        let result = match terminal.and_then(TradeResult::from_terminal) {
            Some(result) => result,
            None => {
                let phase = if policy.has_secondary_phase() {
                    Phase::Secondary
                } else {
                    Phase::Primary
                };
                events.push(TradeEvent {
                    kind: EventKind::Unresolved,
                    phase,
                    price: last_bar.close,
                    timestamp: last_bar.timestamp,
                    elapsed_seconds: last_bar.timestamp - levels.entry_time,
                    risk_multiple: None,
                });
                TradeResult::Unresolved
            }
        };

        SimulationOutcome {
            policy,
            entry: Some(levels.context()),
            events,
            result,
        }
    }
}

/// Convenience entry point using the default (XAUUSD) instrument.
pub fn simulate(series: &PriceSeries, request: &TradeRequest) -> SimulationOutcome {
    Simulator::default().simulate(series, request)
}

/// One forward pass; stops at the first terminal rule and returns its kind.
fn run_pass(
    bars: &[Bar],
    rules: &[Rule],
    phase: Phase,
    levels: &TradeLevels,
    events: &mut Vec<TradeEvent>,
) -> Option<EventKind> {
    let mut state = ScanState::Scanning;
    for bar in bars {
        for rule in rules {
            state = apply_rule(*rule, state, bar, phase, levels, events);
            if let ScanState::Resolved(kind) = state {
                return Some(kind);
            }
        }
    }
    None
}

fn apply_rule(
    rule: Rule,
    state: ScanState,
    bar: &Bar,
    phase: Phase,
    levels: &TradeLevels,
    events: &mut Vec<TradeEvent>,
) -> ScanState {
    let fired = match rule {
        Rule::TakeProfit => levels
            .reached_in_favor(bar, levels.take_profit)
            .then(|| (EventKind::TakeProfitHit, levels.take_profit, Some(levels.reward_multiple()))),
        Rule::StopLoss => levels
            .reached_against(bar, levels.stop_loss)
            .then(|| (EventKind::StopLossHit, levels.stop_loss, Some(-1.0))),
        Rule::ArmBreakeven => (state == ScanState::Scanning
            && levels.reached_in_favor(bar, levels.breakeven_trigger))
        .then(|| (EventKind::BreakevenArmed, levels.entry_price, None)),
        Rule::BreakevenRetrace => (state == ScanState::BreakevenArmed
            && levels.reached_against(bar, levels.entry_price))
        .then(|| (EventKind::BreakevenHit, levels.entry_price, None)),
        Rule::ThreeR => levels
            .reached_in_favor(bar, levels.three_r_target)
            .then(|| (EventKind::ThreeRHit, levels.three_r_target, Some(levels.three_r_multiple()))),
    };

    let Some((kind, price, risk_multiple)) = fired else {
        return state;
    };

    events.push(TradeEvent {
        kind,
        phase,
        price,
        timestamp: bar.timestamp,
        elapsed_seconds: bar.timestamp - levels.entry_time,
        risk_multiple,
    });

    if kind.is_terminal() {
        ScanState::Resolved(kind)
    } else {
        ScanState::BreakevenArmed
    }
}
