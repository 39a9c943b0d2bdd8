//! Relational counter store
//!
//! Counts live rows per identity. The read and the write are separate
//! statements, so two concurrent first requests can both see no row and
//! both insert one. The next read sums every live row, which absorbs the
//! duplicate; the count is exact again one request later.

use chrono::{DateTime, Utc};
use platform::rate_limit::RateLimitPolicy;

use crate::domain::repository::{CounterStore, CounterTable};
use crate::domain::value_objects::{BackendKind, CounterSnapshot, Identity};
use crate::error::StoreResult;

/// Counter store over any [`CounterTable`]
#[derive(Clone)]
pub struct RelationalCounterStore<T> {
    table: T,
}

impl<T> RelationalCounterStore<T> {
    pub fn new(table: T) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &T {
        &self.table
    }
}

impl<T> CounterStore for RelationalCounterStore<T>
where
    T: CounterTable + Send + Sync,
{
    fn backend(&self) -> BackendKind {
        BackendKind::Postgres
    }

    async fn increment_and_read(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> StoreResult<CounterSnapshot> {
        let boundary = policy.window_boundary(now);

        // Global, not identity-scoped: bounds table growth.
        let purged = self.table.purge_expired(boundary).await?;
        if purged > 0 {
            tracing::debug!(rows = purged, "Purged expired rate limit rows");
        }

        let live = self.table.live_window(identity, boundary).await?;
        if live.rows > 1 {
            tracing::debug!(
                identity = %identity,
                rows = live.rows,
                requests = live.requests,
                "Multiple live rate limit rows for identity"
            );
        }

        let snapshot = CounterSnapshot {
            count: live.requests + 1,
            reset_at: policy.window_end(now),
        };

        // Rejected requests are not recorded.
        if snapshot.count > u64::from(policy.max_requests) {
            return Ok(snapshot);
        }

        match self.table.latest_live(identity, boundary).await? {
            Some(record) => self.table.increment(record.id, now).await?,
            None => self.table.insert(identity, now).await?,
        }

        Ok(snapshot)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.table.ping().await
    }
}
