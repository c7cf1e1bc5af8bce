//! Forward-return computation at fixed horizons.

use crate::error::{AppError, Result};
use crate::types::{DailySeries, Horizon};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Forward returns from `date` at each requested horizon.
///
/// Offsets are positional within the supplied series ("trading days
/// actually present"), not calendar days: non-trading days are implicitly
/// skipped, and gaps inside the series shift horizon alignment. Every
/// requested horizon appears in the result; one whose target lies past the
/// end of the series maps to `None`, never a numeric extrapolation.
///
/// Fails with `DateNotFound` when `date` is absent from the series. Dates
/// produced by condition matching come from the same series, so this is an
/// internal defect, not a recoverable condition.
pub fn forward_returns(
    series: &DailySeries,
    date: NaiveDate,
    horizons: &[Horizon],
) -> Result<BTreeMap<Horizon, Option<f64>>> {
    let position = series
        .position(date)
        .ok_or_else(|| AppError::DateNotFound(format!("{date} ({})", series.ticker())))?;

    let bars = series.bars();
    let base = bars[position].close;

    let mut returns = BTreeMap::new();
    for &horizon in horizons {
        let value = bars
            .get(position + horizon.offset())
            .map(|target| (target.close - base) / base * 100.0);
        returns.insert(horizon, value);
    }
    Ok(returns)
}
