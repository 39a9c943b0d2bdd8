//! Rate Limiting Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Value objects, the decision rule, repository traits
//! - `application/` - Use cases
//! - `infra/` - Counter store algorithms, PostgreSQL and Redis backends
//! - `presentation/` - Gate middleware and HTTP handlers
//!
//! ## Enforcement Model
//! - Requests are counted per client identity over a window set by the policy
//! - A policy of N requests allows exactly N per window and rejects request N+1
//! - Any counter backend failure lets the request through (fail-open);
//!   availability of protected endpoints wins over strict enforcement
//! - The relational store may briefly hold two rows for one identity when
//!   first requests race; reads sum them so the count converges

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use domain::entities::Decision;
pub use domain::repository::CounterStore;
pub use domain::value_objects::{BackendKind, Identity};
pub use error::{StoreError, StoreResult};
pub use infra::{PgCounterStore, PgCounterTable, RedisCounter, RedisCounterStore};
pub use presentation::router::{rate_limit_router, rate_limit_router_generic};
