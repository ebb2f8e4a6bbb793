use axum::{
    Json,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::{net::SocketAddr, sync::Arc};

use crate::auth::dtos::ErrorResponse;

#[derive(Clone)]
pub struct RateLimit {
    store: Arc<DashMap<String, RateLimitData>>,
    max_requests: u32,
    window_seconds: i64,
}

#[derive(Debug, Clone)]
struct RateLimitData {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            store: Arc::new(DashMap::new()),
            max_requests,
            window_seconds,
        }
    }

    /// Fixed-window check, keyed per caller. Returns false once the caller
    /// has exceeded the window's budget.
    pub fn allow(&self, key: &str) -> bool {
        let now = Utc::now();

        let mut entry = self
            .store
            .entry(key.to_string())
            .or_insert_with(|| RateLimitData {
                count: 0,
                window_start: now,
            });

        let data = entry.value_mut();

        if now.signed_duration_since(data.window_start) >= Duration::seconds(self.window_seconds) {
            data.count = 0;
            data.window_start = now;
        }

        data.count += 1;
        data.count <= self.max_requests
    }
}

/// Rate limiting middleware. Authenticated callers are keyed by their bearer
/// token so rapid duplicate submissions from one session are throttled even
/// behind a shared NAT; anonymous callers fall back to the client IP.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    axum::extract::State(rate_limit): axum::extract::State<RateLimit>,
    req: Request,
    next: Next,
) -> Response {
    let key = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .unwrap_or_else(|| addr.ip().to_string());

    if !rate_limit.allow(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse {
                error: "Rate limit exceeded".to_string(),
            }),
        )
            .into_response();
    }

    next.run(req).await
}
