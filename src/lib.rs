//! Hindsight - historical pattern analysis server for daily market data.
//!
//! Answers one question: after a ticker's price met a condition (a
//! percentage move or an absolute level crossing), what happened over the
//! following trading days?

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use api::rate_limit::ApiRateLimiter;
use axum::{http::HeaderValue, middleware, Router};
use config::Config;
use services::{
    FetchSpan, NameDirectory, QueryService, SeriesCache, SeriesProvider, SeriesSource, SqliteStore,
};
use sources::YahooFinanceClient;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub provider: Arc<SeriesProvider>,
    pub query_service: Arc<QueryService>,
    pub store: Arc<SqliteStore>,
    pub names: Arc<NameDirectory>,
    pub rate_limiter: Arc<ApiRateLimiter>,
}

/// Build application state with the default source chain:
/// memory cache, then SQLite store, then live Yahoo Finance fetch.
pub fn build_state(config: Config) -> anyhow::Result<AppState> {
    let config = Arc::new(config);

    let cache = Arc::new(SeriesCache::new(Duration::from_secs(
        config.series_cache_ttl_secs,
    )));
    let store = Arc::new(SqliteStore::new(&config.database_path)?);
    let fetcher = Arc::new(YahooFinanceClient::new());

    let provider = Arc::new(SeriesProvider::new(vec![
        cache as Arc<dyn SeriesSource>,
        store.clone() as Arc<dyn SeriesSource>,
        fetcher as Arc<dyn SeriesSource>,
    ]));

    let query_service = Arc::new(QueryService::new(
        provider.clone(),
        config.indicators.clone(),
        FetchSpan::years(config.fetch_span_years),
    ));

    let names = Arc::new(match &config.ticker_names_csv {
        Some(path) => NameDirectory::with_csv(path),
        None => NameDirectory::new(),
    });

    let rate_limiter = Arc::new(ApiRateLimiter::new(&config.rate_limit));

    Ok(AppState {
        config,
        provider,
        query_service,
        store,
        names,
        rate_limiter,
    })
}

/// Build the router with CORS, tracing, auth, and rate-limit layers.
pub fn app(state: AppState) -> Router {
    let cors = if state.config.cors_allow_all {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(api::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth::require_api_key,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::rate_limit::enforce_rate_limit,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
