use crate::value_objects::bar::Bar;
use serde::Serialize;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct DataQualityReport {
    pub rows_read: usize,
    pub duplicates: usize,
    pub out_of_order: usize,
    pub missing_values: usize,
    pub invalid_bars: usize,
    pub gaps: usize,
    pub missing_bars: usize,
    pub first_timestamp: Option<i64>,
    pub last_timestamp: Option<i64>,
    pub first_gap: Option<i64>,
    pub first_duplicate: Option<i64>,
    pub first_out_of_order: Option<i64>,
    pub max_gap_seconds: Option<i64>,
}

impl DataQualityReport {
    pub fn dropped_rows(&self) -> usize {
        self.missing_values + self.invalid_bars
    }

    /// Fills coverage and gap statistics from canonical (ascending, unique) bars.
    pub fn record_coverage(&mut self, bars: &[Bar], expected_step_seconds: Option<i64>) {
        let step = expected_step_seconds.unwrap_or(60).max(1);
        self.first_timestamp = bars.first().map(|bar| bar.timestamp);
        self.last_timestamp = bars.last().map(|bar| bar.timestamp);

        let mut max_gap: Option<i64> = None;
        for pair in bars.windows(2) {
            let diff = pair[1].timestamp - pair[0].timestamp;
            if diff > step {
                self.gaps += 1;
                self.missing_bars += ((diff - 1) / step) as usize;
                if self.first_gap.is_none() {
                    self.first_gap = Some(pair[1].timestamp);
                }
                max_gap = Some(max_gap.map_or(diff, |current| current.max(diff)));
            }
        }
        self.max_gap_seconds = max_gap;
    }
}

#[cfg(test)]
mod tests {
    use super::DataQualityReport;
    use crate::value_objects::bar::Bar;

    fn bar(ts: i64) -> Bar {
        Bar {
            timestamp: ts,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
        }
    }

    #[test]
    fn record_coverage_counts_gaps_and_missing_bars() {
        let bars = vec![bar(0), bar(60), bar(300), bar(360)];
        let mut report = DataQualityReport::default();
        report.record_coverage(&bars, Some(60));

        assert_eq!(report.first_timestamp, Some(0));
        assert_eq!(report.last_timestamp, Some(360));
        assert_eq!(report.gaps, 1);
        assert_eq!(report.missing_bars, 3);
        assert_eq!(report.first_gap, Some(300));
        assert_eq!(report.max_gap_seconds, Some(240));
    }

    #[test]
    fn record_coverage_handles_empty_input() {
        let mut report = DataQualityReport::default();
        report.record_coverage(&[], None);
        assert_eq!(report.first_timestamp, None);
        assert_eq!(report.gaps, 0);
    }
}
