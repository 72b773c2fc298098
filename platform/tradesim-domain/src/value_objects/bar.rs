use serde::Serialize;

/// One OHLC sample. `timestamp` is the bar's wall-clock time in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn is_well_formed(&self) -> bool {
        let values = [self.open, self.high, self.low, self.close];
        if values.iter().any(|v| !v.is_finite()) {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

#[cfg(test)]
mod tests {
    use super::Bar;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            timestamp: 0,
            open,
            high,
            low,
            close,
        }
    }

    #[test]
    fn well_formed_accepts_flat_bar() {
        assert!(bar(1800.0, 1800.0, 1800.0, 1800.0).is_well_formed());
    }

    #[test]
    fn well_formed_rejects_broken_envelope() {
        assert!(!bar(1800.0, 1799.0, 1798.0, 1800.0).is_well_formed());
        assert!(!bar(1800.0, 1801.0, 1800.5, 1800.0).is_well_formed());
        assert!(!bar(1800.0, f64::NAN, 1799.0, 1800.0).is_well_formed());
    }
}
