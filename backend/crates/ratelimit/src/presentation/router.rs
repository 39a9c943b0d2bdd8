//! Rate Limit Router

use axum::{Router, middleware::from_fn_with_state, routing::get};
use platform::rate_limit::{Clock, RateLimitPolicy};
use std::sync::Arc;

use crate::domain::repository::CounterStore;
use crate::infra::{PgCounterStore, RedisCounterStore};
use crate::presentation::handlers::{self, AppState};
use crate::presentation::middleware::{RateLimitState, rate_limit};

/// Create the router with the PostgreSQL and Redis stores
pub fn rate_limit_router(
    postgres: PgCounterStore,
    redis: RedisCounterStore,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
) -> Router {
    rate_limit_router_generic(postgres, redis, policy, clock)
}

/// Create the router for any pair of counter stores
///
/// `P` gates `/api/postgres-protected`, `R` gates `/api/redis-protected`.
pub fn rate_limit_router_generic<P, R>(
    postgres: P,
    redis: R,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
) -> Router
where
    P: CounterStore + Send + Sync + 'static,
    R: CounterStore + Send + Sync + 'static,
{
    let state = AppState {
        postgres: Arc::new(postgres),
        redis: Arc::new(redis),
        policy: Arc::new(policy),
        clock,
    };

    let postgres_gate = RateLimitState::new(
        state.postgres.clone(),
        state.policy.clone(),
        state.clock.clone(),
    );
    let redis_gate = RateLimitState::new(
        state.redis.clone(),
        state.policy.clone(),
        state.clock.clone(),
    );

    Router::new()
        .route(
            "/api/postgres-protected",
            get(handlers::postgres_protected::<P, R>)
                .route_layer(from_fn_with_state(postgres_gate, rate_limit::<P>)),
        )
        .route(
            "/api/redis-protected",
            get(handlers::redis_protected::<P, R>)
                .route_layer(from_fn_with_state(redis_gate, rate_limit::<R>)),
        )
        .route("/health", get(handlers::health::<P, R>))
        .fallback(handlers::not_found)
        .with_state(state)
}
