//! Atomic counter store
//!
//! One key per identity holding the request count, expired by the backend
//! when the window ends. Increment, expiry and TTL read go out as a single
//! pipeline, so the count is exact under concurrency.

use chrono::{DateTime, TimeDelta, Utc};
use platform::rate_limit::RateLimitPolicy;

use crate::domain::repository::{AtomicCounter, CounterStore};
use crate::domain::value_objects::{BackendKind, CounterSnapshot, Identity, KeyCounter};
use crate::error::StoreResult;

pub const KEY_PREFIX: &str = "rate_limit";

/// Backend key holding the counter for `identity`
pub fn counter_key(identity: &Identity) -> String {
    format!("{KEY_PREFIX}:{identity}")
}

/// Counter store over any [`AtomicCounter`]
#[derive(Clone)]
pub struct AtomicCounterStore<K> {
    counter: K,
}

impl<K> AtomicCounterStore<K> {
    pub fn new(counter: K) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &K {
        &self.counter
    }
}

impl<K> CounterStore for AtomicCounterStore<K>
where
    K: AtomicCounter + Send + Sync,
{
    fn backend(&self) -> BackendKind {
        BackendKind::Redis
    }

    async fn increment_and_read(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> StoreResult<CounterSnapshot> {
        let key = counter_key(identity);

        let KeyCounter { count, ttl_secs } = self
            .counter
            .increment_with_expiry(&key, policy.window)
            .await?;

        let reset_at = if ttl_secs > 0 {
            now.checked_add_signed(TimeDelta::seconds(ttl_secs))
                .unwrap_or_else(|| policy.window_end(now))
        } else {
            policy.window_end(now)
        };

        Ok(CounterSnapshot {
            count: u64::try_from(count).unwrap_or(0),
            reset_at,
        })
    }

    async fn ping(&self) -> StoreResult<()> {
        self.counter.ping().await
    }
}
