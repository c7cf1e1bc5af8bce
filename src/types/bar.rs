use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's OHLCV record for a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An ordered daily price series for a single ticker.
///
/// Invariant: dates are strictly increasing. Construction sorts incoming
/// bars and drops later duplicates of the same date, so the invariant holds
/// for any input.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySeries {
    ticker: String,
    bars: Vec<Bar>,
}

impl DailySeries {
    pub fn new(ticker: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Integer position of `date` within the series, if present.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&date, |b| b.date).ok()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> Bar {
        Bar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn test_series_sorts_bars_by_date() {
        let series = DailySeries::new(
            "SPY",
            vec![
                bar("2024-01-03", 3.0),
                bar("2024-01-01", 1.0),
                bar("2024-01-02", 2.0),
            ],
        );

        let dates: Vec<NaiveDate> = series.bars().iter().map(|b| b.date).collect();
        assert_eq!(
            dates,
            vec![
                "2024-01-01".parse().unwrap(),
                "2024-01-02".parse().unwrap(),
                "2024-01-03".parse().unwrap(),
            ]
        );
    }

    #[test]
    fn test_series_drops_duplicate_dates() {
        let series = DailySeries::new(
            "SPY",
            vec![
                bar("2024-01-01", 1.0),
                bar("2024-01-01", 99.0),
                bar("2024-01-02", 2.0),
            ],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].close, 1.0);
    }

    #[test]
    fn test_position_lookup() {
        let series = DailySeries::new(
            "SPY",
            vec![
                bar("2024-01-01", 1.0),
                bar("2024-01-02", 2.0),
                bar("2024-01-05", 3.0),
            ],
        );

        assert_eq!(series.position("2024-01-01".parse().unwrap()), Some(0));
        assert_eq!(series.position("2024-01-05".parse().unwrap()), Some(2));
        assert_eq!(series.position("2024-01-04".parse().unwrap()), None);
    }

    #[test]
    fn test_empty_series() {
        let series = DailySeries::new("SPY", vec![]);
        assert!(series.is_empty());
        assert!(series.first().is_none());
        assert!(series.last().is_none());
    }

    #[test]
    fn test_bar_serialization() {
        let b = bar("2024-03-15", 412.5);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"date\":\"2024-03-15\""));
        assert!(json.contains("\"close\":412.5"));
        assert!(json.contains("\"volume\":1000"));
    }
}
