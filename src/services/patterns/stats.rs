//! Per-horizon summary statistics over pattern instances.

use crate::types::{Horizon, HorizonStats, PatternInstance};
use std::collections::BTreeMap;

/// Descriptive statistics for one horizon's collected values.
///
/// Sample standard deviation (denominator n-1); with a single value it is
/// defined as 0.0 rather than propagating NaN, for API stability.
fn stats_for(values: &[f64]) -> HorizonStats {
    let count = values.len();
    if count == 0 {
        return HorizonStats::zero();
    }

    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    let std = if count < 2 {
        0.0
    } else {
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    };

    let wins = values.iter().filter(|v| **v > 0.0).count();

    HorizonStats {
        mean,
        median,
        std,
        min: sorted[0],
        max: sorted[count - 1],
        win_rate: wins as f64 / n,
        count,
    }
}

/// Aggregate forward returns across all instances, independently per
/// horizon. Every requested horizon gets an entry; horizons with no
/// resolvable value get all-zero statistics with count 0 rather than being
/// omitted.
pub fn aggregate(
    instances: &[PatternInstance],
    horizons: &[Horizon],
) -> BTreeMap<Horizon, HorizonStats> {
    horizons
        .iter()
        .map(|&horizon| {
            let values: Vec<f64> = instances
                .iter()
                .filter_map(|instance| instance.forward_returns.get(&horizon).copied().flatten())
                .collect();
            (horizon, stats_for(&values))
        })
        .collect()
}
