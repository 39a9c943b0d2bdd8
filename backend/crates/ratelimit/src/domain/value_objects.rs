//! Value Objects

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Key a request is counted against
///
/// Opaque, only guaranteed non-empty. Clients behind the same proxy
/// share an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Identity used when extraction produced nothing usable
    pub fn fallback() -> Self {
        Self(platform::client::FALLBACK_CLIENT_IP.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Counter backend tag, reported in headers and response bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BackendKind {
    #[serde(rename = "PostgreSQL")]
    Postgres,
    #[serde(rename = "Redis")]
    Redis,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Postgres => "PostgreSQL",
            BackendKind::Redis => "Redis",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a counter store reports after recording a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    /// Requests in the current window, including this one
    pub count: u64,
    /// When the current window ends
    pub reset_at: DateTime<Utc>,
}

/// Result of the atomic INCR / EXPIRE NX / TTL pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCounter {
    pub count: i64,
    /// Remaining time-to-live in seconds; `-1` no expiry, `-2` no key
    pub ttl_secs: i64,
}
