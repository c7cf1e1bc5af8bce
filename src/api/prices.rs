use crate::error::Result;
use crate::types::Bar;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// The raw daily series the engine would analyze for a ticker.
#[derive(Debug, Serialize)]
pub struct PriceHistoryResponse {
    pub ticker: String,
    pub prices: Vec<Bar>,
}

/// GET /api/prices/:ticker
async fn price_history(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<PriceHistoryResponse>> {
    let span = crate::services::FetchSpan::years(state.config.fetch_span_years);
    let series = state.provider.get_series(&ticker, span).await?;

    Ok(Json(PriceHistoryResponse {
        ticker: series.ticker().to_string(),
        prices: series.bars().to_vec(),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:ticker", get(price_history))
}
