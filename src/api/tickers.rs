use crate::error::Result;
use crate::services::names::{
    Suggestion, COMMODITIES, MARKET_INDICES, SECTOR_ETFS, SENTIMENT_INDICATORS,
    VOLATILITY_INDICATORS,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Curated ticker categories for the query picker.
#[derive(Debug, Serialize)]
pub struct TickerListResponse {
    pub market_indices: Vec<String>,
    pub sector_etfs: Vec<String>,
    pub volatility_indicators: Vec<String>,
    pub sentiment_indicators: Vec<String>,
    pub commodities: Vec<String>,
    pub top_stocks: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// GET /api/tickers
async fn list_tickers(State(state): State<AppState>) -> Result<Json<TickerListResponse>> {
    Ok(Json(TickerListResponse {
        market_indices: owned(MARKET_INDICES),
        sector_etfs: owned(SECTOR_ETFS),
        volatility_indicators: owned(VOLATILITY_INDICATORS),
        sentiment_indicators: owned(SENTIMENT_INDICATORS),
        commodities: owned(COMMODITIES),
        top_stocks: state.store.known_tickers()?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestions: Vec<Suggestion>,
}

/// GET /api/tickers/suggest?q=
async fn suggest_tickers(
    State(state): State<AppState>,
    Query(query): Query<SuggestQuery>,
) -> Result<Json<SuggestResponse>> {
    let known = state.store.known_tickers()?;
    Ok(Json(SuggestResponse {
        suggestions: state.names.suggest(&query.q, &known),
    }))
}

#[derive(Debug, Serialize)]
pub struct ConstituentsResponse {
    pub etf: String,
    pub holdings: Vec<String>,
}

/// GET /api/constituents/:etf
async fn etf_constituents(
    State(state): State<AppState>,
    Path(etf): Path<String>,
) -> Json<ConstituentsResponse> {
    let etf = etf.to_uppercase();
    let holdings = state.names.constituents(&etf);
    Json(ConstituentsResponse { etf, holdings })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tickers))
        .route("/suggest", get(suggest_tickers))
}

pub fn constituents_router() -> Router<AppState> {
    Router::new().route("/:etf", get(etf_constituents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_list_serialization() {
        let response = TickerListResponse {
            market_indices: owned(MARKET_INDICES),
            sector_etfs: owned(SECTOR_ETFS),
            volatility_indicators: owned(VOLATILITY_INDICATORS),
            sentiment_indicators: owned(SENTIMENT_INDICATORS),
            commodities: owned(COMMODITIES),
            top_stocks: vec![],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"market_indices\":[\"SPY\",\"QQQ\",\"DIA\"]"));
        assert!(json.contains("\"sentiment_indicators\":[\"PCR\"]"));
        assert!(json.contains("\"top_stocks\":[]"));
    }

    #[test]
    fn test_suggest_query_defaults_to_empty() {
        let query: SuggestQuery = serde_json::from_str("{}").unwrap();
        assert!(query.q.is_empty());
    }

    #[test]
    fn test_suggest_response_serialization() {
        let response = SuggestResponse {
            suggestions: vec![Suggestion {
                ticker: "AAPL".to_string(),
                name: "Apple Inc.".to_string(),
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"ticker\":\"AAPL\""));
        assert!(json.contains("\"name\":\"Apple Inc.\""));
    }
}
