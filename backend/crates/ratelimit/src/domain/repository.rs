//! Repository Traits
//!
//! Interfaces for counter persistence. Implementations are in the
//! infrastructure layer.

use chrono::{DateTime, Utc};
use platform::rate_limit::RateLimitPolicy;
use std::time::Duration;

use crate::domain::entities::{CounterRecord, LiveWindow};
use crate::domain::value_objects::{BackendKind, CounterSnapshot, Identity, KeyCounter};
use crate::error::StoreResult;

/// Counter store consumed by the gate
///
/// Each backend hides its own atomicity and cleanup behaviour behind this
/// contract. Any backend fault surfaces as a `StoreError`.
#[trait_variant::make(CounterStore: Send)]
pub trait LocalCounterStore {
    /// Backend tag reported to clients
    fn backend(&self) -> BackendKind;

    /// Record one request for `identity` at `now` and report the count
    /// in the current window, this request included
    async fn increment_and_read(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
        policy: &RateLimitPolicy,
    ) -> StoreResult<CounterSnapshot>;

    /// Round-trip to the backend
    async fn ping(&self) -> StoreResult<()>;
}

/// Statements the relational counter store issues
///
/// Each call is a separate statement; nothing spans them.
#[trait_variant::make(CounterTable: Send)]
pub trait LocalCounterTable {
    /// Delete every row, for any identity, whose window started before
    /// `boundary`. Returns the number of rows removed.
    async fn purge_expired(&self, boundary: DateTime<Utc>) -> StoreResult<u64>;

    /// Row count and summed request count of live rows for `identity`
    async fn live_window(
        &self,
        identity: &Identity,
        boundary: DateTime<Utc>,
    ) -> StoreResult<LiveWindow>;

    /// Most recent live row for `identity`
    async fn latest_live(
        &self,
        identity: &Identity,
        boundary: DateTime<Utc>,
    ) -> StoreResult<Option<CounterRecord>>;

    /// Add one request to an existing row
    async fn increment(&self, record_id: i64, now: DateTime<Utc>) -> StoreResult<()>;

    /// Open a new row with a count of one
    async fn insert(&self, identity: &Identity, now: DateTime<Utc>) -> StoreResult<()>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Single-key atomic counter
#[trait_variant::make(AtomicCounter: Send)]
pub trait LocalAtomicCounter {
    /// Increment `key`, set its expiry to `window` only if it has none,
    /// and read the remaining TTL, all in one atomic pipeline
    async fn increment_with_expiry(&self, key: &str, window: Duration) -> StoreResult<KeyCounter>;

    async fn ping(&self) -> StoreResult<()>;
}
