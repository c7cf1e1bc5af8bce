use crate::error::{AppError, Result};
use crate::services::{QueryRequest, QueryResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

/// POST /api/query
///
/// Malformed request shapes (bad JSON, unknown enum values, wrong types)
/// are caught here at the extraction layer and reported as validation
/// errors; business-rule faults come from the query service.
async fn query_patterns(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let response = state.query_service.execute(&request).await?;
    Ok(Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/query", post(query_patterns))
}

#[cfg(test)]
mod tests {
    use crate::services::QueryRequest;
    use crate::types::{ConditionType, Horizon, Operator};

    #[test]
    fn test_example_request_deserializes() {
        let json = r#"{
            "ticker": "VIX",
            "condition_type": "absolute_threshold",
            "threshold": 30,
            "operator": "gt",
            "time_horizons": ["1w", "1m"]
        }"#;
        let request: QueryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.ticker, "VIX");
        assert_eq!(request.condition_type, ConditionType::AbsoluteThreshold);
        assert_eq!(request.operator, Operator::Gt);
        assert_eq!(
            request.time_horizons,
            vec![Horizon::OneWeek, Horizon::OneMonth]
        );
    }

    #[test]
    fn test_malformed_request_shape_is_rejected() {
        let json = r#"{"ticker": "VIX", "condition_type": "moving_average"}"#;
        assert!(serde_json::from_str::<QueryRequest>(json).is_err());
    }
}
