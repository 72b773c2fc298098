use crate::entities::instrument::Instrument;
use crate::value_objects::bar::Bar;
use crate::value_objects::outcome::{EntryContext, Leg, ValidationFailure};
use crate::value_objects::side::Side;

/// Multiple of the initial risk used for the secondary target.
pub const THREE_R_MULTIPLE: f64 = 3.0;

pub fn validate_levels(
    side: Side,
    entry_price: f64,
    stop_loss: f64,
    take_profit: f64,
) -> Result<(), ValidationFailure> {
    let fail = |leg| Err(ValidationFailure { side, leg });
    let (sl_ok, tp_ok) = match side {
        Side::Buy => (stop_loss < entry_price, take_profit > entry_price),
        Side::Sell => (stop_loss > entry_price, take_profit < entry_price),
    };
    // NaN compares false on both sides, so non-finite levels land here too.
    if !sl_ok || !stop_loss.is_finite() {
        return fail(Leg::StopLoss);
    }
    if !tp_ok || !take_profit.is_finite() {
        return fail(Leg::TakeProfit);
    }
    Ok(())
}

/// Price levels of one validated trade plus the side-aware crossing tests.
#[derive(Debug, Clone)]
pub(crate) struct TradeLevels {
    pub side: Side,
    pub entry_time: i64,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub risk_pips: f64,
    pub reward_pips: f64,
    pub breakeven_trigger: f64,
    pub three_r_target: f64,
    pub three_r_pips: f64,
    tolerance: f64,
}

impl TradeLevels {
    pub fn new(
        side: Side,
        entry_time: i64,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
        instrument: &Instrument,
    ) -> Self {
        let risk_pips = instrument.pips_between(entry_price, stop_loss);
        let reward_pips = instrument.pips_between(entry_price, take_profit);
        let one_r = instrument.pips_to_price(risk_pips);
        let three_r_target =
            entry_price + side.direction() * instrument.pips_to_price(THREE_R_MULTIPLE * risk_pips);

        Self {
            side,
            entry_time,
            entry_price,
            stop_loss,
            take_profit,
            risk_pips,
            reward_pips,
            breakeven_trigger: entry_price + side.direction() * one_r,
            three_r_target,
            three_r_pips: instrument.pips_between(entry_price, three_r_target),
            tolerance: instrument.tolerance,
        }
    }

    pub fn context(&self) -> EntryContext {
        EntryContext {
            side: self.side,
            entry_time: self.entry_time,
            entry_price: self.entry_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            risk_pips: self.risk_pips,
            reward_pips: self.reward_pips,
            three_r_target: self.three_r_target,
            three_r_pips: self.three_r_pips,
        }
    }

    /// Price traded at or beyond `level` in the trade's favor (within tolerance).
    pub fn reached_in_favor(&self, bar: &Bar, level: f64) -> bool {
        match self.side {
            Side::Buy => bar.high >= level - self.tolerance,
            Side::Sell => bar.low <= level + self.tolerance,
        }
    }

    /// Price traded at or beyond `level` against the trade (within tolerance).
    pub fn reached_against(&self, bar: &Bar, level: f64) -> bool {
        match self.side {
            Side::Buy => bar.low <= level + self.tolerance,
            Side::Sell => bar.high >= level - self.tolerance,
        }
    }

    pub fn reward_multiple(&self) -> f64 {
        self.reward_pips / self.risk_pips
    }

    pub fn three_r_multiple(&self) -> f64 {
        self.three_r_pips / self.risk_pips
    }
}
