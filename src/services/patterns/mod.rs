//! The pattern engine: condition matching, forward returns, and summary
//! statistics over a ticker's daily series.

pub mod condition;
pub mod returns;
pub mod stats;

pub use condition::matching_dates;
pub use returns::forward_returns;
pub use stats::aggregate;

use crate::config::IndicatorConfig;
use crate::error::{AppError, Result};
use crate::services::provider::{FetchSpan, SeriesProvider};
use crate::types::{Condition, ConditionType, Horizon, HorizonStats, Operator, PatternInstance};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A historical pattern query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub ticker: String,
    pub condition_type: ConditionType,
    pub threshold: f64,
    pub operator: Operator,
    #[serde(default = "Horizon::all_vec")]
    pub time_horizons: Vec<Horizon>,
}

impl QueryRequest {
    pub fn condition(&self) -> Condition {
        match self.condition_type {
            ConditionType::PercentageChange => Condition::PercentageChange {
                threshold: self.threshold,
                operator: self.operator,
            },
            ConditionType::AbsoluteThreshold => Condition::AbsoluteThreshold {
                threshold: self.threshold,
                operator: self.operator,
            },
        }
    }
}

/// Result of a historical pattern query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub ticker: String,
    /// Human-readable condition description, e.g. "NVDA changed < -3%".
    pub condition: String,
    /// Reference ticker when the queried symbol is a registered indicator.
    /// Display-only; the analyzed series is the queried symbol's own.
    pub reference_ticker: Option<String>,
    pub instances: Vec<PatternInstance>,
    pub summary_statistics: BTreeMap<Horizon, HorizonStats>,
    pub total_occurrences: usize,
}

/// Executes pattern queries: fetches the series, matches the condition,
/// computes per-instance forward returns, and aggregates statistics.
///
/// Pure computation over an already-materialized series apart from the
/// provider call; holds no mutable state, safe to share across concurrent
/// queries.
pub struct QueryService {
    provider: Arc<SeriesProvider>,
    indicators: IndicatorConfig,
    span: FetchSpan,
}

impl QueryService {
    pub fn new(provider: Arc<SeriesProvider>, indicators: IndicatorConfig, span: FetchSpan) -> Self {
        Self {
            provider,
            indicators,
            span,
        }
    }

    pub async fn execute(&self, request: &QueryRequest) -> Result<QueryResponse> {
        if request.time_horizons.is_empty() {
            return Err(AppError::InvalidQuery(
                "at least one time horizon is required".to_string(),
            ));
        }
        let mut horizons = request.time_horizons.clone();
        horizons.sort();
        horizons.dedup();

        let series = self.provider.get_series(&request.ticker, self.span).await?;
        let ticker = series.ticker().to_string();

        let condition = request.condition();
        let dates = matching_dates(&series, &condition);
        debug!(
            "{} matches for {} over {} bars",
            dates.len(),
            ticker,
            series.len()
        );

        let mut instances = Vec::with_capacity(dates.len());
        for date in dates {
            instances.push(PatternInstance {
                date,
                forward_returns: forward_returns(&series, date, &horizons)?,
            });
        }

        let summary_statistics = aggregate(&instances, &horizons);

        Ok(QueryResponse {
            condition: condition.describe(&ticker),
            reference_ticker: self.indicators.reference_for(&ticker),
            total_occurrences: instances.len(),
            instances,
            summary_statistics,
            ticker,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_all_horizons() {
        let json = r#"{
            "ticker": "NVDA",
            "condition_type": "percentage_change",
            "threshold": -3.0,
            "operator": "lt"
        }"#;
        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.time_horizons, Horizon::all_vec());
    }

    #[test]
    fn test_request_rejects_unknown_operator() {
        let json = r#"{
            "ticker": "NVDA",
            "condition_type": "percentage_change",
            "threshold": -3.0,
            "operator": "between"
        }"#;
        assert!(serde_json::from_str::<QueryRequest>(json).is_err());
    }

    #[test]
    fn test_request_rejects_unknown_horizon() {
        let json = r#"{
            "ticker": "NVDA",
            "condition_type": "percentage_change",
            "threshold": -3.0,
            "operator": "lt",
            "time_horizons": ["1d", "2w"]
        }"#;
        assert!(serde_json::from_str::<QueryRequest>(json).is_err());
    }

    #[test]
    fn test_request_builds_condition() {
        let request = QueryRequest {
            ticker: "VIX".to_string(),
            condition_type: ConditionType::AbsoluteThreshold,
            threshold: 30.0,
            operator: Operator::Gt,
            time_horizons: vec![Horizon::OneDay],
        };
        assert_eq!(
            request.condition(),
            Condition::AbsoluteThreshold {
                threshold: 30.0,
                operator: Operator::Gt,
            }
        );
    }

    #[test]
    fn test_response_serializes_null_reference_ticker() {
        let response = QueryResponse {
            ticker: "SPY".to_string(),
            condition: "SPY changed > 1%".to_string(),
            reference_ticker: None,
            instances: vec![],
            summary_statistics: BTreeMap::new(),
            total_occurrences: 0,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"reference_ticker\":null"));
        assert!(json.contains("\"total_occurrences\":0"));
    }
}
