//! PostgreSQL Counter Table

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::domain::entities::{CounterRecord, LiveWindow};
use crate::domain::repository::CounterTable;
use crate::domain::value_objects::Identity;
use crate::error::StoreResult;

/// PostgreSQL-backed `rate_limits` table
#[derive(Clone)]
pub struct PgCounterTable {
    pool: PgPool,
}

/// Upper bound on waiting for a pooled connection, connect included
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(1);

/// Build a pool that connects on first use
///
/// An unreachable database surfaces as an error within `ACQUIRE_TIMEOUT`
/// instead of holding the request.
pub fn lazy_pool(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy(database_url)?;

    Ok(pool)
}

impl PgCounterTable {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CounterTable for PgCounterTable {
    async fn purge_expired(&self, boundary: DateTime<Utc>) -> StoreResult<u64> {
        let deleted = sqlx::query("DELETE FROM rate_limits WHERE window_start < $1")
            .bind(boundary)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted)
    }

    async fn live_window(
        &self,
        identity: &Identity,
        boundary: DateTime<Utc>,
    ) -> StoreResult<LiveWindow> {
        let (rows, requests) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*), COALESCE(SUM(request_count), 0)::BIGINT
            FROM rate_limits
            WHERE identity = $1 AND window_start > $2
            "#,
        )
        .bind(identity.as_str())
        .bind(boundary)
        .fetch_one(&self.pool)
        .await?;

        Ok(LiveWindow {
            rows: u64::try_from(rows).unwrap_or(0),
            requests: u64::try_from(requests).unwrap_or(0),
        })
    }

    async fn latest_live(
        &self,
        identity: &Identity,
        boundary: DateTime<Utc>,
    ) -> StoreResult<Option<CounterRecord>> {
        let row = sqlx::query_as::<_, CounterRow>(
            r#"
            SELECT id, identity, request_count, window_start, updated_at
            FROM rate_limits
            WHERE identity = $1 AND window_start > $2
            ORDER BY window_start DESC
            LIMIT 1
            "#,
        )
        .bind(identity.as_str())
        .bind(boundary)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CounterRow::into_record))
    }

    async fn increment(&self, record_id: i64, now: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE rate_limits
            SET request_count = request_count + 1, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(record_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert(&self, identity: &Identity, now: DateTime<Utc>) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rate_limits (identity, request_count, window_start, updated_at)
            VALUES ($1, 1, $2, $2)
            "#,
        )
        .bind(identity.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(identity = %identity, "Opened rate limit window");

        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CounterRow {
    id: i64,
    identity: String,
    request_count: i32,
    window_start: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CounterRow {
    fn into_record(self) -> CounterRecord {
        CounterRecord {
            id: self.id,
            identity: self.identity,
            request_count: self.request_count,
            window_start: self.window_start,
            updated_at: self.updated_at,
        }
    }
}
