//! Domain Entities

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::value_objects::BackendKind;

/// A row of the relational counter table
///
/// Several live rows may exist for one identity; readers sum them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub id: i64,
    pub identity: String,
    pub request_count: i32,
    pub window_start: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CounterRecord {
    /// Row counts toward windows that started strictly after `boundary`
    pub fn is_live(&self, boundary: DateTime<Utc>) -> bool {
        self.window_start > boundary
    }
}

/// Aggregate over the live rows of one identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveWindow {
    pub rows: u64,
    pub requests: u64,
}

/// Outcome of evaluating one request against the policy
///
/// Computed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
    pub backend: BackendKind,
    pub window_secs: u64,
}

impl Decision {
    /// Reset time as ISO-8601 with millisecond precision, e.g.
    /// `2024-01-01T00:01:00.000Z`
    pub fn reset_iso(&self) -> String {
        self.reset_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn window_label(&self) -> String {
        format!("{}s", self.window_secs)
    }
}
