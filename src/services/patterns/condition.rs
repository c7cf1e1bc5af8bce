//! Condition matching over daily series.

use crate::types::{Condition, DailySeries};
use chrono::NaiveDate;

/// Day-over-day percentage change between two consecutive bars.
fn day_over_day_change(prev_close: f64, close: f64) -> f64 {
    (close - prev_close) / prev_close * 100.0
}

/// All dates where the condition holds, in ascending order.
///
/// Percentage-change conditions are evaluated from the second bar onward;
/// the first bar has no defined change and is never a match. Absolute
/// conditions apply to every bar including the first. A series with fewer
/// than 2 bars yields no percentage-change matches.
pub fn matching_dates(series: &DailySeries, condition: &Condition) -> Vec<NaiveDate> {
    let bars = series.bars();
    match condition {
        Condition::PercentageChange {
            threshold,
            operator,
        } => bars
            .windows(2)
            .filter(|w| operator.compare(day_over_day_change(w[0].close, w[1].close), *threshold))
            .map(|w| w[1].date)
            .collect(),
        Condition::AbsoluteThreshold {
            threshold,
            operator,
        } => bars
            .iter()
            .filter(|bar| operator.compare(bar.close, *threshold))
            .map(|bar| bar.date)
            .collect(),
    }
}
