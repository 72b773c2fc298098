use crate::value_objects::bar::Bar;

/// Immutable, strictly ascending series of bars.
///
/// Built once and then only read; `&PriceSeries` can be shared across threads
/// and every query borrows from the same backing storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<Bar>) -> Result<Self, String> {
        for (idx, bar) in bars.iter().enumerate() {
            if !bar.is_well_formed() {
                return Err(format!(
                    "malformed bar at index {idx} (timestamp={}): OHLC must be finite with low <= open/close <= high",
                    bar.timestamp
                ));
            }
        }
        if let Some(pair) = bars.windows(2).find(|w| w[1].timestamp <= w[0].timestamp) {
            return Err(format!(
                "bars must be strictly ascending by timestamp (found {} after {})",
                pair[1].timestamp, pair[0].timestamp
            ));
        }
        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Exact timestamp match; no interpolation between bars.
    pub fn lookup_exact(&self, timestamp: i64) -> Option<&Bar> {
        self.bars
            .binary_search_by_key(&timestamp, |bar| bar.timestamp)
            .ok()
            .map(|idx| &self.bars[idx])
    }

    /// All bars with timestamp strictly greater than `timestamp`, ascending.
    /// Empty when `timestamp` is at or past the last bar.
    pub fn after(&self, timestamp: i64) -> &[Bar] {
        let start = self.bars.partition_point(|bar| bar.timestamp <= timestamp);
        &self.bars[start..]
    }
}
