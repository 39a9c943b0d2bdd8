//! Redis Atomic Counter
//!
//! The connection is opened on first use with a single bounded attempt. A
//! failed connect is reported to the caller; further connects are skipped
//! until `RECONNECT_BACKOFF` has passed, so an outage fails requests open
//! immediately instead of queueing them behind connection attempts.

use redis::Client;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

use crate::domain::repository::AtomicCounter;
use crate::domain::value_objects::KeyCounter;
use crate::error::{StoreError, StoreResult};

/// Upper bound on one TCP connect and handshake
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Upper bound on one command round-trip
pub const RESPONSE_TIMEOUT: Duration = Duration::from_millis(500);

/// Quiet period after a failed connect
pub const RECONNECT_BACKOFF: Duration = Duration::from_secs(1);

/// Redis-backed counter
///
/// `EXPIRE ... NX` needs Redis 7.0 or newer.
#[derive(Clone)]
pub struct RedisCounter {
    client: Client,
    connection: Arc<OnceCell<ConnectionManager>>,
    last_failure: Arc<Mutex<Option<Instant>>>,
}

impl RedisCounter {
    /// Parse the connection URL; no network I/O happens here
    pub fn open(url: &str) -> StoreResult<Self> {
        Ok(Self {
            client: Client::open(url)?,
            connection: Arc::new(OnceCell::new()),
            last_failure: Arc::new(Mutex::new(None)),
        })
    }

    async fn connection(&self) -> StoreResult<ConnectionManager> {
        if let Some(manager) = self.connection.get() {
            return Ok(manager.clone());
        }
        self.check_backoff()?;

        // Waiters queued behind a failed attempt see the backoff and bail.
        let manager = self
            .connection
            .get_or_try_init(|| async {
                self.check_backoff()?;
                match ConnectionManager::new_with_config(self.client.clone(), manager_config())
                    .await
                {
                    Ok(manager) => {
                        tracing::info!("Redis connection established");
                        Ok::<_, StoreError>(manager)
                    }
                    Err(e) => {
                        self.record_failure();
                        Err(StoreError::Redis(e))
                    }
                }
            })
            .await?;

        Ok(manager.clone())
    }

    fn check_backoff(&self) -> StoreResult<()> {
        let last_failure = self.last_failure.lock().ok().and_then(|guard| *guard);
        match last_failure {
            Some(at) if at.elapsed() < RECONNECT_BACKOFF => Err(StoreError::Unavailable(
                "Redis reconnect backoff".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn record_failure(&self) {
        if let Ok(mut guard) = self.last_failure.lock() {
            *guard = Some(Instant::now());
        }
    }

    /// Whether a connection has been established
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }
}

fn manager_config() -> ConnectionManagerConfig {
    ConnectionManagerConfig::new()
        .set_number_of_retries(0)
        .set_connection_timeout(CONNECT_TIMEOUT)
        .set_response_timeout(RESPONSE_TIMEOUT)
}

impl AtomicCounter for RedisCounter {
    async fn increment_with_expiry(&self, key: &str, window: Duration) -> StoreResult<KeyCounter> {
        let mut conn = self.connection().await?;

        let (count, ttl_secs): (i64, i64) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .cmd("EXPIRE")
            .arg(key)
            .arg(window.as_secs())
            .arg("NX")
            .ignore()
            .ttl(key)
            .query_async(&mut conn)
            .await?;

        Ok(KeyCounter { count, ttl_secs })
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
