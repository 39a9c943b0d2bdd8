//! Domain Services
//!
//! The decision rule. Backend-agnostic and pure.

use platform::rate_limit::RateLimitPolicy;

use crate::domain::entities::Decision;
use crate::domain::value_objects::{BackendKind, CounterSnapshot};

/// Decide whether the request that produced `snapshot` may proceed
///
/// The request bringing the count to exactly `max_requests` is still
/// allowed; only `count > max_requests` is rejected.
pub fn decide(
    snapshot: CounterSnapshot,
    policy: &RateLimitPolicy,
    backend: BackendKind,
) -> Decision {
    let limit = policy.max_requests;
    let remaining = u64::from(limit).saturating_sub(snapshot.count);

    Decision {
        allowed: snapshot.count <= u64::from(limit),
        limit,
        // remaining <= limit, so it always fits
        remaining: u32::try_from(remaining).unwrap_or(limit),
        reset_at: snapshot.reset_at,
        backend,
        window_secs: policy.window_secs(),
    }
}
