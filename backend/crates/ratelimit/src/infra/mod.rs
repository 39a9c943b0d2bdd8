//! Infrastructure Layer
//!
//! Counter store algorithms and the backends they drive.

pub mod atomic;
pub mod postgres;
pub mod redis;
pub mod relational;

pub use atomic::AtomicCounterStore;
pub use postgres::PgCounterTable;
pub use self::redis::RedisCounter;
pub use relational::RelationalCounterStore;

/// Relational store over PostgreSQL
pub type PgCounterStore = RelationalCounterStore<PgCounterTable>;

/// Atomic store over Redis
pub type RedisCounterStore = AtomicCounterStore<RedisCounter>;
