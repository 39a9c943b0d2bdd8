//! Rate Limit Gate
//!
//! Per request: extract identity, record it in the counter store, decide,
//! then either forward with rate limit headers or answer 429. A store
//! failure lets the request through without headers.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::client::extract_client_identity;
use platform::rate_limit::{Clock, RateLimitPolicy};
use std::sync::Arc;

use crate::application::CheckRateLimitUseCase;
use crate::domain::entities::Decision;
use crate::domain::repository::CounterStore;
use crate::domain::value_objects::Identity;
use crate::error::StoreError;
use crate::presentation::dto::RateLimitExceededResponse;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
pub const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
pub const X_RATELIMIT_TYPE: HeaderName = HeaderName::from_static("x-ratelimit-type");
pub const X_RATELIMIT_WINDOW: HeaderName = HeaderName::from_static("x-ratelimit-window");

/// Gate state
pub struct RateLimitState<S> {
    pub store: Arc<S>,
    pub policy: Arc<RateLimitPolicy>,
    pub clock: Arc<dyn Clock>,
}

impl<S> RateLimitState<S> {
    pub fn new(store: Arc<S>, policy: Arc<RateLimitPolicy>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }
}

impl<S> Clone for RateLimitState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            policy: self.policy.clone(),
            clock: self.clock.clone(),
        }
    }
}

/// Middleware that enforces the rate limit policy
///
/// The resolved [`Identity`] is stored in the request extensions for
/// downstream handlers.
pub async fn rate_limit<S>(
    State(state): State<RateLimitState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: CounterStore + Send + Sync + 'static,
{
    let identity =
        Identity::new(extract_client_identity(&req)).unwrap_or_else(Identity::fallback);
    req.extensions_mut().insert(identity.clone());

    let use_case = CheckRateLimitUseCase::new(
        state.store.clone(),
        state.policy.clone(),
        state.clock.clone(),
    );

    // The store mutation runs to completion even if the client goes away.
    let task_identity = identity.clone();
    let outcome = tokio::spawn(async move { use_case.execute(&task_identity).await })
        .await
        .unwrap_or_else(|e| Err(StoreError::Unavailable(format!("rate limit task: {e}"))));

    let decision = match outcome {
        Ok(decision) => decision,
        Err(e) => {
            tracing::error!(
                error = %e,
                identity = %identity,
                backend = %state.store.backend(),
                "Rate limit store failed, allowing request"
            );
            return next.run(req).await;
        }
    };

    if !decision.allowed {
        tracing::warn!(
            identity = %identity,
            backend = %decision.backend,
            limit = decision.limit,
            reset = %decision.reset_iso(),
            "Rate limit exceeded"
        );
        return rejection_response(&decision);
    }

    tracing::debug!(
        identity = %identity,
        backend = %decision.backend,
        remaining = decision.remaining,
        "Rate limit check passed"
    );

    let mut response = next.run(req).await;
    apply_headers(&decision, response.headers_mut());
    response
}

/// Headers for a decision, in a stable order
pub fn rate_limit_headers(decision: &Decision) -> [(HeaderName, HeaderValue); 5] {
    [
        (X_RATELIMIT_LIMIT, HeaderValue::from(decision.limit)),
        (X_RATELIMIT_REMAINING, HeaderValue::from(decision.remaining)),
        (X_RATELIMIT_RESET, ascii_value(decision.reset_iso())),
        (X_RATELIMIT_TYPE, HeaderValue::from_static(decision.backend.as_str())),
        (X_RATELIMIT_WINDOW, ascii_value(decision.window_label())),
    ]
}

pub fn apply_headers(decision: &Decision, headers: &mut HeaderMap) {
    for (name, value) in rate_limit_headers(decision) {
        headers.insert(name, value);
    }
}

fn rejection_response(decision: &Decision) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitExceededResponse::from(decision)),
    )
        .into_response();
    apply_headers(decision, response.headers_mut());
    response
}

// ISO-8601 timestamps and `<n>s` labels are plain ASCII.
fn ascii_value(value: String) -> HeaderValue {
    HeaderValue::try_from(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}
