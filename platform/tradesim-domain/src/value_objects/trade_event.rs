use crate::services::runtime::format_runtime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TakeProfitHit,
    StopLossHit,
    /// Non-terminal: price moved one risk unit in favor, stop conceptually at entry.
    BreakevenArmed,
    BreakevenHit,
    ThreeRHit,
    /// Closing marker when no scan produced a terminal event; carries the last bar.
    Unresolved,
}

impl EventKind {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventKind::BreakevenArmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Stop-loss vs take-profit race.
    Primary,
    /// Independent 3R scan, with or without breakeven.
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeEvent {
    pub kind: EventKind,
    pub phase: Phase,
    pub price: f64,
    pub timestamp: i64,
    pub elapsed_seconds: i64,
    /// Realized R for profit/loss events; `None` for breakeven markers and the closing marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_multiple: Option<f64>,
}

impl TradeEvent {
    pub fn runtime(&self) -> String {
        format_runtime(self.elapsed_seconds)
    }
}
