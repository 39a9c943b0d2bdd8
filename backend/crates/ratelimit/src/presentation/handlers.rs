//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, State};
use chrono::SecondsFormat;
use kernel::error::app_error::{AppError, AppResult};
use platform::rate_limit::{Clock, RateLimitPolicy};
use std::sync::Arc;
use std::time::Instant;

use crate::domain::repository::CounterStore;
use crate::domain::value_objects::{BackendKind, Identity};
use crate::presentation::dto::{BackendHealth, HealthResponse, LimitsDto, ProtectedResponse};

/// Shared state for the rate limit endpoints
pub struct AppState<P, R> {
    pub postgres: Arc<P>,
    pub redis: Arc<R>,
    pub policy: Arc<RateLimitPolicy>,
    pub clock: Arc<dyn Clock>,
}

impl<P, R> Clone for AppState<P, R> {
    fn clone(&self) -> Self {
        Self {
            postgres: self.postgres.clone(),
            redis: self.redis.clone(),
            policy: self.policy.clone(),
            clock: self.clock.clone(),
        }
    }
}

/// GET /api/postgres-protected
pub async fn postgres_protected<P, R>(
    State(state): State<AppState<P, R>>,
    Extension(identity): Extension<Identity>,
) -> Json<ProtectedResponse>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    Json(protected_response(BackendKind::Postgres, &identity, &state))
}

/// GET /api/redis-protected
pub async fn redis_protected<P, R>(
    State(state): State<AppState<P, R>>,
    Extension(identity): Extension<Identity>,
) -> Json<ProtectedResponse>
where
    P: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    Json(protected_response(BackendKind::Redis, &identity, &state))
}

fn protected_response<P, R>(
    backend: BackendKind,
    identity: &Identity,
    state: &AppState<P, R>,
) -> ProtectedResponse {
    ProtectedResponse {
        message: format!("This endpoint is protected by {backend} rate limiting"),
        rate_limit_type: backend,
        client_ip: identity.to_string(),
        timestamp: state
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        limits: LimitsDto::from(state.policy.as_ref()),
    }
}

/// GET /health
///
/// 200 while at least one backend answers; 503 once none do.
pub async fn health<P, R>(State(state): State<AppState<P, R>>) -> AppResult<Json<HealthResponse>>
where
    P: CounterStore + Send + Sync + 'static,
    R: CounterStore + Send + Sync + 'static,
{
    let backends = vec![
        probe(state.postgres.as_ref()).await,
        probe(state.redis.as_ref()).await,
    ];

    let healthy = backends.iter().filter(|b| b.is_healthy()).count();
    if healthy == 0 {
        return Err(
            AppError::service_unavailable("All rate limit backends are unavailable")
                .with_action("Protected endpoints are serving without rate limits"),
        );
    }

    let status = if healthy == backends.len() {
        "healthy"
    } else {
        "degraded"
    };

    Ok(Json(HealthResponse {
        status,
        backends,
        limits: LimitsDto::from(state.policy.as_ref()),
    }))
}

async fn probe<S>(store: &S) -> BackendHealth
where
    S: CounterStore + Send + Sync,
{
    let started = Instant::now();

    match store.ping().await {
        Ok(()) => BackendHealth {
            backend: store.backend(),
            status: "healthy",
            latency_ms: Some(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, backend = %store.backend(), "Health check failed");
            let app_err = AppError::from(e);
            BackendHealth {
                backend: store.backend(),
                status: "error",
                latency_ms: None,
                message: Some(app_err.message().to_string()),
            }
        }
    }
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::not_found("Route not found")
}
