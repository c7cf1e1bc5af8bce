pub mod auth;
pub mod health;
pub mod prices;
pub mod query;
pub mod rate_limit;
pub mod tickers;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api", query::router())
        .nest("/api/tickers", tickers::router())
        .nest("/api/prices", prices::router())
        .nest("/api/constituents", tickers::constituents_router())
}
