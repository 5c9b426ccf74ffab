//! HTTP Surface
//!
//! Direct query endpoint for the rate limiter plus health and admin status.
//! The rate-limit response contract (status 200/429, JSON body, and the
//! `X-RateLimit-Remaining` / `X-RateLimit-Reset` headers) is parsed by
//! dependents and must stay bit-exact.

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::{info, warn};

use crate::crypto::secure_compare;
use crate::rate_limit::{RateLimitError, RateLimiter};

/// Shared state behind the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The admission actor pool
    pub limiter: RateLimiter,

    /// Bearer token for admin endpoints
    pub admin_token: String,

    /// Default limit when the query omits one
    pub default_limit: u32,

    /// Default window (ms) when the query omits one
    pub default_window_ms: i64,
}

/// Query parameters for the rate-limit check endpoint
#[derive(Debug, Deserialize)]
pub struct CheckParams {
    /// Admissions per window; falls back to the configured default
    pub limit: Option<u32>,

    /// Window length in milliseconds; falls back to the configured default
    pub window: Option<i64>,

    /// Identity when the `X-Client-Id` header is absent
    pub client: Option<String>,
}

/// Admin status payload
#[derive(Debug, Serialize)]
struct AdminStatus {
    tracked_identities: usize,
    default_limit: u32,
    default_window_ms: i64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the router for the gateway core surface.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ratelimit/check", get(check_handler))
        .route("/health", get(health_handler))
        .route("/admin/status", get(admin_status_handler))
        .with_state(state)
}

/// Start the HTTP server on `port`.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("Starting searchgate server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind server")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Rate-limit check endpoint.
///
/// Identity comes from the `X-Client-Id` header, then the `client` query
/// parameter, then the literal `anonymous` — real partitioning belongs to
/// the fronting router.
async fn check_handler(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
    headers: HeaderMap,
) -> Response {
    let identity = headers
        .get("x-client-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or(params.client)
        .unwrap_or_else(|| "anonymous".to_string());

    let limit = params.limit.unwrap_or(state.default_limit);
    let window_ms = params.window.unwrap_or(state.default_window_ms);

    let decision = match state.limiter.check_limit(&identity, limit, window_ms).await {
        Ok(decision) => decision,
        Err(RateLimitError::InvalidParams { .. }) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "limit and window must be positive".to_string(),
                }),
            )
                .into_response();
        }
        Err(RateLimitError::Store(e)) => {
            warn!(identity, error = %e, "rate state store failure");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "rate state unavailable".to_string(),
                }),
            )
                .into_response();
        }
    };

    let status = if decision.allowed {
        StatusCode::OK
    } else {
        StatusCode::TOO_MANY_REQUESTS
    };

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&decision.remaining.to_string()) {
        response_headers.insert("X-RateLimit-Remaining", value);
    }
    if let Ok(value) = HeaderValue::from_str(&decision.reset_at.to_string()) {
        response_headers.insert("X-RateLimit-Reset", value);
    }

    (status, response_headers, Json(decision)).into_response()
}

/// Health check endpoint
async fn health_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Admin status endpoint, guarded by a bearer token compared in constant
/// time.
async fn admin_status_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(auth_header) = headers.get("authorization").and_then(|v| v.to_str().ok()) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "Authorization header required".to_string(),
            }),
        )
            .into_response();
    };

    let token = auth_header.strip_prefix("Bearer ").unwrap_or(auth_header);
    if !secure_compare(token, &state.admin_token) {
        warn!("admin status request with invalid token");
        return (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "Invalid admin token".to_string(),
            }),
        )
            .into_response();
    }

    let status = AdminStatus {
        tracked_identities: state.limiter.tracked_identities().await,
        default_limit: state.default_limit,
        default_window_ms: state.default_window_ms,
    };
    (StatusCode::OK, Json(status)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::MemoryRateStore;
    use std::sync::Arc;

    #[test]
    fn test_router_builds() {
        let state = AppState {
            limiter: RateLimiter::new(Arc::new(MemoryRateStore::new())),
            admin_token: "secret".to_string(),
            default_limit: 60,
            default_window_ms: 60_000,
        };
        let _ = router(state);
    }
}
