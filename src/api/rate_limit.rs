//! Per-client rate limiting middleware backed by a keyed governor limiter.

use crate::config::RateLimitConfig;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use tracing::warn;

type KeyedLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

/// Keyed token-bucket limiter, one bucket per client address.
pub struct ApiRateLimiter {
    limiter: KeyedLimiter,
}

impl ApiRateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let per_minute = NonZeroU32::new(config.per_minute).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.burst).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_minute(per_minute).allow_burst(burst);

        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    pub fn check(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }
}

/// Client address for rate-limit keying: first X-Forwarded-For hop when
/// present (reverse-proxy deployments), else the socket peer.
fn client_addr(request: &Request, peer: Option<SocketAddr>) -> IpAddr {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .and_then(|value| value.trim().parse().ok())
        .or(peer.map(|addr| addr.ip()))
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Enforce the per-client limit. OPTIONS preflight requests are part of
/// the CORS handshake, not API usage, and bypass the limiter.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.rate_limit.enabled || request.method() == Method::OPTIONS {
        return next.run(request).await;
    }

    let client = client_addr(&request, peer.map(|ConnectInfo(addr)| addr));
    if state.rate_limiter.check(client) {
        next.run(request).await
    } else {
        warn!("rate limit exceeded for {}", client);
        AppError::RateLimited.into_response()
    }
}
