//! Rate Limit Error Types
//!
//! Counter store failures. The gate never surfaces these to clients; it
//! logs them and lets the request through. Health reporting converts them
//! into `kernel::error::AppError` so backend details are not leaked.

use kernel::error::app_error::AppError;
use thiserror::Error;

/// Counter store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Counter backend failure
#[derive(Debug, Error)]
pub enum StoreError {
    /// Relational backend error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Key-value backend error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Any other backend fault
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(e) => AppError::from(e),
            StoreError::Redis(e) => {
                if e.is_io_error() || e.is_connection_refusal() || e.is_timeout() {
                    AppError::service_unavailable("Redis connection error").with_source(e)
                } else {
                    AppError::internal("Redis command error").with_source(e)
                }
            }
            StoreError::Unavailable(msg) => {
                AppError::service_unavailable("Backend unavailable")
                    .with_source(std::io::Error::other(msg))
            }
        }
    }
}
