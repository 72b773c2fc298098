use serde::Serialize;

pub const XAUUSD_SYMBOL: &str = "XAUUSD";
/// Pips per price point (1 pip = 0.1 for gold).
pub const XAUUSD_PIP_SCALE: f64 = 10.0;
/// Absolute margin, in price units, within which a level counts as touched.
pub const XAUUSD_TOLERANCE: f64 = 0.1;

/// Tick convention of the traded instrument. The simulator's pip and
/// tolerance arithmetic is only meaningful for the instrument it was built for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    pub symbol: String,
    pub pip_scale: f64,
    pub tolerance: f64,
}

impl Default for Instrument {
    fn default() -> Self {
        Self::xauusd()
    }
}

impl Instrument {
    pub fn xauusd() -> Self {
        Self {
            symbol: XAUUSD_SYMBOL.to_string(),
            pip_scale: XAUUSD_PIP_SCALE,
            tolerance: XAUUSD_TOLERANCE,
        }
    }

    pub fn new(symbol: String, pip_scale: f64, tolerance: f64) -> Result<Self, String> {
        if symbol.trim().is_empty() {
            return Err("instrument.symbol must not be empty".to_string());
        }
        if !pip_scale.is_finite() || pip_scale <= 0.0 {
            return Err("instrument.pip_scale must be finite and > 0".to_string());
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err("instrument.tolerance must be finite and >= 0".to_string());
        }
        Ok(Self {
            symbol,
            pip_scale,
            tolerance,
        })
    }

    pub fn pips_between(&self, from: f64, to: f64) -> f64 {
        (to - from).abs() * self.pip_scale
    }

    pub fn pips_to_price(&self, pips: f64) -> f64 {
        pips / self.pip_scale
    }
}

#[cfg(test)]
mod tests {
    use super::Instrument;

    #[test]
    fn xauusd_pip_arithmetic() {
        let gold = Instrument::xauusd();
        assert!((gold.pips_between(1800.0, 1795.0) - 50.0).abs() < 1e-9);
        assert!((gold.pips_to_price(50.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn new_rejects_bad_scale() {
        assert!(Instrument::new("XAUUSD".to_string(), 0.0, 0.1).is_err());
        assert!(Instrument::new("XAUUSD".to_string(), 10.0, -0.1).is_err());
        assert!(Instrument::new(" ".to_string(), 10.0, 0.1).is_err());
        assert!(Instrument::new("EURUSD".to_string(), 10_000.0, 0.00001).is_ok());
    }
}
