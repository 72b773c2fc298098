use crate::value_objects::side::Side;
use serde::{Deserialize, Serialize};

/// Which scans run after the entry bar.
///
/// Every policy runs the primary stop-loss/take-profit race. The 3R policies
/// then re-scan the same bars independently for the 3R target, optionally
/// arming a breakeven stop once price has moved one risk unit in favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    PlainRace,
    BreakevenThreeR,
    ThreeROnly,
}

impl ScanPolicy {
    pub fn from_breakeven(breakeven: Option<bool>) -> Self {
        match breakeven {
            None => ScanPolicy::PlainRace,
            Some(true) => ScanPolicy::BreakevenThreeR,
            Some(false) => ScanPolicy::ThreeROnly,
        }
    }

    pub fn has_secondary_phase(&self) -> bool {
        !matches!(self, ScanPolicy::PlainRace)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeRequest {
    pub side: Side,
    /// Entry bar timestamp (epoch seconds); must match a bar exactly.
    pub entry_time: i64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub breakeven: Option<bool>,
}

impl TradeRequest {
    pub fn policy(&self) -> ScanPolicy {
        ScanPolicy::from_breakeven(self.breakeven)
    }
}

#[cfg(test)]
mod tests {
    use super::ScanPolicy;

    #[test]
    fn breakeven_flag_selects_policy() {
        assert_eq!(ScanPolicy::from_breakeven(None), ScanPolicy::PlainRace);
        assert_eq!(
            ScanPolicy::from_breakeven(Some(true)),
            ScanPolicy::BreakevenThreeR
        );
        assert_eq!(ScanPolicy::from_breakeven(Some(false)), ScanPolicy::ThreeROnly);
        assert!(!ScanPolicy::PlainRace.has_secondary_phase());
    }
}
