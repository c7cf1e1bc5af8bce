//! Optional X-API-Key authentication middleware.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests without a valid API key when auth is required.
///
/// Auth disabled (the default) passes everything through. Auth required
/// with no keys configured rejects everything with 503 rather than
/// silently opening the service.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth = &state.config.auth;
    if !auth.require_auth {
        return next.run(request).await;
    }

    if auth.api_keys.is_empty() {
        let body = Json(json!({
            "error": "Authentication required but no API keys configured",
            "status": StatusCode::SERVICE_UNAVAILABLE.as_u16(),
        }));
        return (StatusCode::SERVICE_UNAVAILABLE, body).into_response();
    }

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        None => AppError::Unauthorized(
            "API key is missing. Please provide X-API-Key header.".to_string(),
        )
        .into_response(),
        Some(key) if auth.api_keys.iter().any(|k| k == key) => next.run(request).await,
        Some(_) => AppError::Unauthorized("Invalid API key".to_string()).into_response(),
    }
}
