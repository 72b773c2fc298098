use crate::value_objects::side::Side;
use crate::value_objects::trade_event::{EventKind, Phase, TradeEvent};
use crate::value_objects::trade_request::ScanPolicy;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    StopLoss,
    TakeProfit,
}

/// The stop-loss or take-profit level sits on the wrong side of the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub side: Side,
    pub leg: Leg,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (leg, direction) = match (self.side, self.leg) {
            (Side::Buy, Leg::StopLoss) => ("SL", "below"),
            (Side::Buy, Leg::TakeProfit) => ("TP", "above"),
            (Side::Sell, Leg::StopLoss) => ("SL", "above"),
            (Side::Sell, Leg::TakeProfit) => ("TP", "below"),
        };
        write!(
            f,
            "For a {} trade, {} should be {} the entry price.",
            self.side, leg, direction
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TradeResult {
    Unresolved,
    StopLossHit,
    TakeProfitHit,
    BreakevenHit,
    ThreeRHit,
    NoDataAfterEntry,
    NoDataAtEntry,
    ValidationFailed { side: Side, leg: Leg },
}

impl TradeResult {
    pub fn label(&self) -> &'static str {
        match self {
            TradeResult::Unresolved => "unresolved",
            TradeResult::StopLossHit => "stop_loss_hit",
            TradeResult::TakeProfitHit => "take_profit_hit",
            TradeResult::BreakevenHit => "breakeven_hit",
            TradeResult::ThreeRHit => "three_r_hit",
            TradeResult::NoDataAfterEntry => "no_data_after_entry",
            TradeResult::NoDataAtEntry => "no_data_at_entry",
            TradeResult::ValidationFailed { .. } => "validation_failed",
        }
    }

    /// True when the request never reached the market scan.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TradeResult::NoDataAtEntry
                | TradeResult::NoDataAfterEntry
                | TradeResult::ValidationFailed { .. }
        )
    }

    pub fn validation_failure(&self) -> Option<ValidationFailure> {
        match *self {
            TradeResult::ValidationFailed { side, leg } => Some(ValidationFailure { side, leg }),
            _ => None,
        }
    }

    pub fn from_terminal(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::TakeProfitHit => Some(TradeResult::TakeProfitHit),
            EventKind::StopLossHit => Some(TradeResult::StopLossHit),
            EventKind::BreakevenHit => Some(TradeResult::BreakevenHit),
            EventKind::ThreeRHit => Some(TradeResult::ThreeRHit),
            EventKind::Unresolved => Some(TradeResult::Unresolved),
            EventKind::BreakevenArmed => None,
        }
    }
}

impl From<ValidationFailure> for TradeResult {
    fn from(failure: ValidationFailure) -> Self {
        TradeResult::ValidationFailed {
            side: failure.side,
            leg: failure.leg,
        }
    }
}

/// Levels derived once the entry price is known. Fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryContext {
    pub side: Side,
    pub entry_time: i64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_pips: f64,
    pub reward_pips: f64,
    pub three_r_target: f64,
    pub three_r_pips: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub policy: ScanPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<EntryContext>,
    pub events: Vec<TradeEvent>,
    pub result: TradeResult,
}

impl SimulationOutcome {
    /// Outcome for a request that never reached the bar scan.
    pub fn rejected(policy: ScanPolicy, result: TradeResult) -> Self {
        Self {
            policy,
            entry: None,
            events: Vec::new(),
            result,
        }
    }

    pub fn events_in(&self, phase: Phase) -> impl Iterator<Item = &TradeEvent> {
        self.events.iter().filter(move |event| event.phase == phase)
    }
}
